//! Combat constants configuration

use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub action_points: ApConstants,
    #[serde(default)]
    pub rewards: RewardConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Fraction of def/res subtracted from raw damage
    #[serde(default = "default_defense_factor")]
    pub defense_factor: f64,
    /// Fraction of evasion subtracted from accuracy for hit chance
    #[serde(default = "default_evasion_factor")]
    pub evasion_factor: f64,
    #[serde(default = "default_min_hit_chance")]
    pub min_hit_chance: f64,
    #[serde(default = "default_max_hit_chance")]
    pub max_hit_chance: f64,
    /// Applied to post-mitigation damage on a critical hit
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Roll a [variance_min, variance_max] multiplier on damage and healing
    #[serde(default)]
    pub variance_enabled: bool,
    #[serde(default = "default_variance_min")]
    pub variance_min: f64,
    #[serde(default = "default_variance_max")]
    pub variance_max: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            defense_factor: 0.5,
            evasion_factor: 0.5,
            min_hit_chance: 5.0,
            max_hit_chance: 95.0,
            crit_multiplier: 2.0,
            variance_enabled: false,
            variance_min: 0.9,
            variance_max: 1.1,
        }
    }
}

fn default_defense_factor() -> f64 {
    0.5
}
fn default_evasion_factor() -> f64 {
    0.5
}
fn default_min_hit_chance() -> f64 {
    5.0
}
fn default_max_hit_chance() -> f64 {
    95.0
}
fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_variance_min() -> f64 {
    0.9
}
fn default_variance_max() -> f64 {
    1.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApConstants {
    /// AP each combatant holds when combat is initialized
    #[serde(default = "default_starting_ap")]
    pub starting_ap: i32,
    /// AP gained at the start of the combatant's own turn
    #[serde(default = "default_regen_per_turn")]
    pub regen_per_turn: i32,
}

impl Default for ApConstants {
    fn default() -> Self {
        ApConstants {
            starting_ap: 2,
            regen_per_turn: 2,
        }
    }
}

fn default_starting_ap() -> i32 {
    2
}
fn default_regen_per_turn() -> i32 {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConstants {
    /// XP per defeated enemy = level² × base_xp × (boss multiplier)
    #[serde(default = "default_base_xp")]
    pub base_xp: u64,
    #[serde(default = "default_boss_xp_multiplier")]
    pub boss_xp_multiplier: u64,
}

impl Default for RewardConstants {
    fn default() -> Self {
        RewardConstants {
            base_xp: 10,
            boss_xp_multiplier: 5,
        }
    }
}

fn default_base_xp() -> u64 {
    10
}
fn default_boss_xp_multiplier() -> u64 {
    5
}

impl CombatConstants {
    /// Check the constants describe a usable configuration
    pub fn validate(&self) -> Result<(), String> {
        let d = &self.damage;
        if d.min_hit_chance > d.max_hit_chance {
            return Err(format!(
                "min_hit_chance ({}) exceeds max_hit_chance ({})",
                d.min_hit_chance, d.max_hit_chance
            ));
        }
        if d.variance_min > d.variance_max || d.variance_min <= 0.0 {
            return Err(format!(
                "invalid variance range [{}, {}]",
                d.variance_min, d.variance_max
            ));
        }
        if d.crit_multiplier < 1.0 {
            return Err(format!("crit_multiplier ({}) below 1.0", d.crit_multiplier));
        }
        if self.action_points.regen_per_turn < 0 || self.action_points.starting_ap < 0 {
            return Err("action point values must be non-negative".to_string());
        }
        Ok(())
    }
}
