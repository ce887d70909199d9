//! StatusEffectInstance - A status effect template or a live copy of one

use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{EffectKind, StatKind};
use serde::{Deserialize, Serialize};

/// One stat change carried by a status effect, per stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatKind,
    /// Flat amount added per stack
    #[serde(default)]
    pub value: f64,
    /// Multiplier for a single stack (1.0 = unchanged)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_stacks() -> u32 {
    1
}

impl StatModifier {
    pub fn flat(stat: StatKind, value: f64) -> Self {
        StatModifier {
            stat,
            value,
            multiplier: 1.0,
        }
    }

    pub fn multiplier(stat: StatKind, multiplier: f64) -> Self {
        StatModifier {
            stat,
            value: 0.0,
            multiplier,
        }
    }
}

/// A status effect on a combatant
///
/// Templates and live instances share this type. Magnitudes (`stat_modifiers`,
/// `damage_per_turn`, `heal_per_turn`) are stored per stack and never mutated
/// by stacking; the effective values are derived from `current_stacks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectInstance {
    pub id: String,
    pub name: String,
    pub kind: EffectKind,
    /// Turns remaining
    pub duration: i32,
    /// Tick phase: start of the holder's turn (true) or end (false)
    #[serde(default)]
    pub ticks_at_turn_start: bool,
    #[serde(default)]
    pub stat_modifiers: Vec<StatModifier>,
    #[serde(default)]
    pub damage_per_turn: i32,
    #[serde(default)]
    pub heal_per_turn: i32,
    #[serde(default)]
    pub prevent_actions: bool,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_stacks")]
    pub max_stacks: u32,
    #[serde(default = "default_stacks")]
    pub current_stacks: u32,
}

impl StatusEffectInstance {
    /// Create a new single-stack effect with no magnitudes
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EffectKind, duration: i32) -> Self {
        StatusEffectInstance {
            id: id.into(),
            name: name.into(),
            kind,
            duration,
            ticks_at_turn_start: false,
            stat_modifiers: Vec::new(),
            damage_per_turn: 0,
            heal_per_turn: 0,
            prevent_actions: false,
            stackable: false,
            max_stacks: 1,
            current_stacks: 1,
        }
    }

    pub fn with_damage_per_turn(mut self, damage: i32) -> Self {
        self.damage_per_turn = damage;
        self
    }

    pub fn with_heal_per_turn(mut self, healing: i32) -> Self {
        self.heal_per_turn = healing;
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.stat_modifiers.push(modifier);
        self
    }

    pub fn ticking_at_turn_start(mut self) -> Self {
        self.ticks_at_turn_start = true;
        self
    }

    pub fn preventing_actions(mut self) -> Self {
        self.prevent_actions = true;
        self
    }

    pub fn with_stacking(mut self, max_stacks: u32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks.max(1);
        self
    }

    /// Check if the effect is still active
    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Whether this effect stops its holder from acting
    pub fn is_control(&self) -> bool {
        self.kind == EffectKind::Control && self.prevent_actions
    }

    fn stack_factor(&self) -> i32 {
        self.current_stacks.max(1) as i32
    }

    /// Damage dealt per tick at the current stack count
    pub fn effective_damage_per_turn(&self) -> i32 {
        self.damage_per_turn * self.stack_factor()
    }

    /// Healing per tick at the current stack count
    pub fn effective_heal_per_turn(&self) -> i32 {
        self.heal_per_turn * self.stack_factor()
    }

    /// Stat modifiers scaled to the current stack count
    ///
    /// Flat values scale linearly. A multiplier above 1.0 scales its
    /// deviation linearly (x1.2 at three stacks is x1.6); one below 1.0
    /// compounds (x0.5 at three stacks is x0.125) and never reaches zero.
    pub fn effective_modifiers(&self) -> Vec<StatModifier> {
        let stacks = self.stack_factor();
        self.stat_modifiers
            .iter()
            .map(|m| StatModifier {
                stat: m.stat,
                value: m.value * stacks as f64,
                multiplier: stacked_multiplier(m.multiplier, stacks),
            })
            .collect()
    }
}

fn stacked_multiplier(multiplier: f64, stacks: i32) -> f64 {
    if multiplier >= 1.0 {
        1.0 + (multiplier - 1.0) * stacks as f64
    } else {
        multiplier.max(0.0).powi(stacks)
    }
}

impl StatSource for StatusEffectInstance {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        200 // Status effects apply after gear
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        if !self.is_active() {
            return;
        }

        for modifier in self.effective_modifiers() {
            if modifier.value != 0.0 {
                stats.add_flat(modifier.stat, modifier.value);
            }
            if (modifier.multiplier - 1.0).abs() > f64::EPSILON {
                stats.add_multiplier(modifier.stat, modifier.multiplier);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_magnitudes_scale_with_stacks() {
        let mut poison = StatusEffectInstance::new("poison", "Poison", EffectKind::Dot, 3)
            .with_damage_per_turn(10)
            .with_stacking(3);
        poison.current_stacks = 3;

        assert_eq!(poison.effective_damage_per_turn(), 30);
        // Base is untouched
        assert_eq!(poison.damage_per_turn, 10);
    }

    #[test]
    fn test_effective_modifiers_scale() {
        let mut sunder = StatusEffectInstance::new("sunder", "Sunder", EffectKind::Debuff, 2)
            .with_modifier(StatModifier::flat(StatKind::Def, -5.0))
            .with_modifier(StatModifier::multiplier(StatKind::Atk, 1.2))
            .with_stacking(5);
        sunder.current_stacks = 3;

        let mods = sunder.effective_modifiers();
        assert!((mods[0].value + 15.0).abs() < f64::EPSILON);
        assert!((mods[1].multiplier - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_stacked_debuff_multiplier_stays_positive() {
        let mut weaken = StatusEffectInstance::new("weaken", "Weaken", EffectKind::Debuff, 3)
            .with_modifier(StatModifier::multiplier(StatKind::Atk, 0.5))
            .with_modifier(StatModifier::multiplier(StatKind::MaxHp, 0.6))
            .with_stacking(3);
        weaken.current_stacks = 3;

        let mods = weaken.effective_modifiers();
        assert!((mods[0].multiplier - 0.125).abs() < 1e-9);
        assert!((mods[1].multiplier - 0.216).abs() < 1e-9);
        assert!(mods.iter().all(|m| m.multiplier > 0.0));
    }

    #[test]
    fn test_apply_as_stat_source() {
        let buff = StatusEffectInstance::new("rage", "Rage", EffectKind::Buff, 2)
            .with_modifier(StatModifier::multiplier(StatKind::Atk, 1.5))
            .with_modifier(StatModifier::flat(StatKind::Def, -4.0));

        let mut acc = StatAccumulator::new();
        buff.apply(&mut acc);

        assert!((acc.multiplier(StatKind::Atk) - 1.5).abs() < f64::EPSILON);
        assert!((acc.flat(StatKind::Def) + 4.0).abs() < f64::EPSILON);
        assert_eq!(buff.priority(), 200);
    }

    #[test]
    fn test_expired_effect_contributes_nothing() {
        let mut buff = StatusEffectInstance::new("rage", "Rage", EffectKind::Buff, 1)
            .with_modifier(StatModifier::flat(StatKind::Atk, 10.0));
        buff.duration = 0;

        let mut acc = StatAccumulator::new();
        buff.apply(&mut acc);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_control_requires_prevent_actions() {
        let daze = StatusEffectInstance::new("daze", "Daze", EffectKind::Control, 1);
        assert!(!daze.is_control());
        assert!(daze.clone().preventing_actions().is_control());
    }

    #[test]
    fn test_deserialize_defaults() {
        let toml = r#"
id = "burn"
name = "Burn"
kind = "dot"
duration = 2
damage_per_turn = 8
"#;
        let effect: StatusEffectInstance = toml::from_str(toml).unwrap();
        assert_eq!(effect.max_stacks, 1);
        assert_eq!(effect.current_stacks, 1);
        assert!(!effect.ticks_at_turn_start);
        assert!(!effect.stackable);
    }
}
