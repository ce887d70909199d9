//! Combatants - Player characters and enemies sharing one combat record

use super::summon::BossSummonState;
use crate::damage::{split_healing, HealingResult};
use crate::source::{Equipment, StatSource};
use crate::stat_block::{derive_stats, StatAccumulator, Stats};
use crate::status::{self, ApplyOutcome, StatusEffectInstance, TickResult};
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// The state every combatant carries, whichever side it fights for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub level: u32,
    /// Stats before equipment and status effects
    pub base_stats: Stats,
    /// Derived current stats, including current hp
    pub stats: Stats,
    pub current_ap: i32,
    pub max_ap: i32,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectInstance>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

impl Combatant {
    /// Create a combatant at full health
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: u32, base_stats: Stats, max_ap: i32) -> Self {
        let mut stats = base_stats;
        stats.hp = base_stats.max_hp;
        Combatant {
            id: id.into(),
            name: name.into(),
            level,
            base_stats,
            stats,
            current_ap: 0,
            max_ap,
            status_effects: Vec::new(),
            equipment: Vec::new(),
        }
    }

    /// Check if the combatant is alive
    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    /// Re-derive current stats from base stats, equipment and status effects
    ///
    /// A combatant at full health stays at full health when max hp changes;
    /// otherwise current hp is kept and clamped to the new max.
    pub fn refresh_stats(&mut self) {
        let was_full = self.stats.is_alive() && self.stats.is_full_health();
        let hp = self.stats.hp;

        let sources: Vec<&dyn StatSource> = self
            .equipment
            .iter()
            .map(|e| e as &dyn StatSource)
            .chain(self.status_effects.iter().map(|s| s as &dyn StatSource))
            .collect();
        let mut derived = derive_stats(&self.base_stats, &sources);

        derived.hp = if was_full { derived.max_hp } else { hp.clamp(0, derived.max_hp) };
        self.stats = derived;
    }

    /// Equip an item, automatically refreshing stats
    pub fn equip(&mut self, item: Equipment) {
        self.equipment.push(item);
        self.refresh_stats();
    }

    // === Status Effects ===

    /// Apply a status effect, refreshing stats if anything changed
    pub fn apply_status(&mut self, effect: &StatusEffectInstance) -> ApplyOutcome {
        let outcome = status::apply_effect(&mut self.status_effects, effect);
        if outcome != ApplyOutcome::Ignored {
            self.refresh_stats();
        }
        outcome
    }

    /// Damage/healing due from effects ticking in this phase
    pub fn status_tick(&self, at_turn_start: bool) -> TickResult {
        status::tick(&self.status_effects, at_turn_start)
    }

    /// Count down all effects; expired ones are removed and returned
    pub fn expire_statuses(&mut self) -> Vec<StatusEffectInstance> {
        let expired = status::decrement_durations(&mut self.status_effects);
        if !expired.is_empty() {
            self.refresh_stats();
        }
        expired
    }

    pub fn is_controlled(&self) -> bool {
        status::is_under_control_effect(&self.status_effects)
    }

    pub fn status_modifiers(&self) -> StatAccumulator {
        status::aggregate_modifiers(&self.status_effects)
    }

    // === Resources ===

    /// Lose hp, floored at 0. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.stats.hp;
        self.stats.hp = (self.stats.hp - amount.max(0)).max(0);
        before - self.stats.hp
    }

    /// Heal, capped at max hp
    pub fn heal(&mut self, requested: i32) -> HealingResult {
        let hp_before = self.stats.hp;
        let (applied, overheal) = split_healing(requested, &self.stats);
        self.stats.hp += applied;
        HealingResult {
            target_id: self.id.clone(),
            requested: requested.max(0),
            applied,
            overheal,
            hp_before,
            hp_after: self.stats.hp,
        }
    }

    /// Gain AP up to max. Returns the AP actually gained.
    pub fn gain_ap(&mut self, amount: i32) -> i32 {
        let before = self.current_ap;
        self.current_ap = (self.current_ap + amount.max(0)).clamp(0, self.max_ap.max(0));
        self.current_ap - before
    }

    /// Lose AP down to 0. Returns the AP actually lost.
    pub fn lose_ap(&mut self, amount: i32) -> i32 {
        let before = self.current_ap;
        self.current_ap = (self.current_ap - amount.max(0)).max(0);
        before - self.current_ap
    }

    /// Spend AP if there is enough of it
    pub fn spend_ap(&mut self, cost: i32) -> bool {
        if self.current_ap < cost {
            return false;
        }
        self.current_ap -= cost.max(0);
        true
    }
}

/// A member of the player's roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub combatant: Combatant,
    pub equipped_abilities: Vec<String>,
    #[serde(default)]
    pub xp: u64,
}

impl PlayerCharacter {
    pub fn new(combatant: Combatant, equipped_abilities: Vec<String>) -> Self {
        PlayerCharacter {
            combatant,
            equipped_abilities,
            xp: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.combatant.id
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }
}

/// An opponent, possibly a boss that can summon minions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub combatant: Combatant,
    pub abilities: Vec<String>,
    #[serde(default)]
    pub is_boss: bool,
    /// Spawned mid-battle by a boss
    #[serde(default)]
    pub is_summoned: bool,
    #[serde(default)]
    pub summon: Option<BossSummonState>,
}

impl Enemy {
    pub fn new(combatant: Combatant, abilities: Vec<String>) -> Self {
        Enemy {
            combatant,
            abilities,
            is_boss: false,
            is_summoned: false,
            summon: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.combatant.id
    }

    pub fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }
}

/// Borrowed view of either kind of combatant
#[derive(Debug, Clone, Copy)]
pub enum CombatantRef<'a> {
    Player(&'a PlayerCharacter),
    Enemy(&'a Enemy),
}

impl<'a> CombatantRef<'a> {
    pub fn combatant(&self) -> &'a Combatant {
        match self {
            CombatantRef::Player(p) => &p.combatant,
            CombatantRef::Enemy(e) => &e.combatant,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            CombatantRef::Player(_) => Side::Player,
            CombatantRef::Enemy(_) => Side::Enemy,
        }
    }

    /// Abilities this combatant is allowed to use
    pub fn ability_ids(&self) -> &'a [String] {
        match self {
            CombatantRef::Player(p) => &p.equipped_abilities,
            CombatantRef::Enemy(e) => &e.abilities,
        }
    }

    pub fn id(&self) -> &'a str {
        &self.combatant().id
    }

    pub fn is_alive(&self) -> bool {
        self.combatant().is_alive()
    }
}

/// Mutable view of either kind of combatant
#[derive(Debug)]
pub enum CombatantRefMut<'a> {
    Player(&'a mut PlayerCharacter),
    Enemy(&'a mut Enemy),
}

impl<'a> CombatantRefMut<'a> {
    pub fn combatant(&mut self) -> &mut Combatant {
        match self {
            CombatantRefMut::Player(p) => &mut p.combatant,
            CombatantRefMut::Enemy(e) => &mut e.combatant,
        }
    }

    pub fn into_combatant(self) -> &'a mut Combatant {
        match self {
            CombatantRefMut::Player(p) => &mut p.combatant,
            CombatantRefMut::Enemy(e) => &mut e.combatant,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            CombatantRefMut::Player(_) => Side::Player,
            CombatantRefMut::Enemy(_) => Side::Enemy,
        }
    }
}
