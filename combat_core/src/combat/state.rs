//! Combat state - The battle aggregate the caller owns and the engine mutates

use super::combatant::{Combatant, CombatantRef, CombatantRefMut, Enemy, PlayerCharacter};
use super::log::{CombatLogEntry, LogKind};
use crate::source::Equipment;
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a battle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    #[default]
    Setup,
    Active,
    /// Active team is down but reserves are alive; waiting for swap or accept
    TeamWipe,
    Victory,
    Defeat,
}

impl CombatPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatPhase::Victory | CombatPhase::Defeat)
    }
}

/// Initiative queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    pub combatants: Vec<String>,
    pub current_index: usize,
}

impl TurnOrder {
    /// Id of the combatant whose turn it is
    pub fn current(&self) -> Option<&str> {
        self.combatants.get(self.current_index).map(String::as_str)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.combatants.iter().position(|c| c == id)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

/// Everything about one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub phase: CombatPhase,
    pub player_team: Vec<PlayerCharacter>,
    pub reserve_team: Vec<PlayerCharacter>,
    pub enemy_team: Vec<Enemy>,
    pub turn_order: TurnOrder,
    /// Turns taken so far, across rounds
    pub current_turn: u32,
    pub round_number: u32,
    pub player_turn_order: Vec<String>,
    pub turn_order_locked: bool,
    pub combat_log: Vec<CombatLogEntry>,
    pub victory: bool,
    pub xp_earned: u64,
    pub loot_dropped: Vec<Equipment>,
    /// Counter for summoned minion ids
    #[serde(default)]
    pub summon_serial: u32,
}

impl CombatState {
    /// A battle in the setup phase
    pub fn new(player_team: Vec<PlayerCharacter>, reserve_team: Vec<PlayerCharacter>, enemy_team: Vec<Enemy>) -> Self {
        CombatState {
            phase: CombatPhase::Setup,
            player_team,
            reserve_team,
            enemy_team,
            turn_order: TurnOrder::default(),
            current_turn: 0,
            round_number: 0,
            player_turn_order: Vec::new(),
            turn_order_locked: false,
            combat_log: Vec::new(),
            victory: false,
            xp_earned: 0,
            loot_dropped: Vec::new(),
            summon_serial: 0,
        }
    }

    // === Log ===

    /// Append an entry to the combat log, stamped with the current round and turn
    pub fn log(&mut self, kind: LogKind, message: impl Into<String>) -> &mut CombatLogEntry {
        let entry = CombatLogEntry::new(self.round_number, self.current_turn, kind, message);
        self.combat_log.push(entry);
        let last = self.combat_log.len() - 1;
        &mut self.combat_log[last]
    }

    /// The last `n` log entries, oldest first
    pub fn recent_log(&self, n: usize) -> &[CombatLogEntry] {
        let start = self.combat_log.len().saturating_sub(n);
        &self.combat_log[start..]
    }

    // === Lookup ===

    /// Find a fielded combatant (active team or enemy team) by id
    pub fn combatant(&self, id: &str) -> Option<CombatantRef<'_>> {
        if let Some(p) = self.player_team.iter().find(|p| p.id() == id) {
            return Some(CombatantRef::Player(p));
        }
        self.enemy_team.iter().find(|e| e.id() == id).map(CombatantRef::Enemy)
    }

    pub fn combatant_mut(&mut self, id: &str) -> Option<CombatantRefMut<'_>> {
        if let Some(p) = self.player_team.iter_mut().find(|p| p.id() == id) {
            return Some(CombatantRefMut::Player(p));
        }
        self.enemy_team
            .iter_mut()
            .find(|e| e.id() == id)
            .map(CombatantRefMut::Enemy)
    }

    /// Shared combatant record by id
    pub fn unit(&self, id: &str) -> Option<&Combatant> {
        self.combatant(id).map(|c| c.combatant())
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.combatant_mut(id).map(CombatantRefMut::into_combatant)
    }

    pub fn side_of(&self, id: &str) -> Option<Side> {
        self.combatant(id).map(|c| c.side())
    }

    pub fn is_alive(&self, id: &str) -> bool {
        self.unit(id).is_some_and(Combatant::is_alive)
    }

    /// The combatant whose turn it is
    pub fn current_combatant(&self) -> Option<CombatantRef<'_>> {
        self.turn_order.current().and_then(|id| self.combatant(id))
    }

    /// Ids of living combatants on one side, in roster order
    pub fn living_ids(&self, side: Side) -> Vec<String> {
        match side {
            Side::Player => self
                .player_team
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| p.id().to_string())
                .collect(),
            Side::Enemy => self
                .enemy_team
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| e.id().to_string())
                .collect(),
        }
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemy_team.iter().all(|e| !e.is_alive())
    }

    pub fn all_players_dead(&self) -> bool {
        self.player_team.iter().all(|p| !p.is_alive())
    }

    pub fn any_reserve_alive(&self) -> bool {
        self.reserve_team.iter().any(|p| p.is_alive())
    }

    /// Every member of the roster, active and reserve
    pub fn roster_mut(&mut self) -> impl Iterator<Item = &mut PlayerCharacter> {
        self.player_team.iter_mut().chain(self.reserve_team.iter_mut())
    }
}
