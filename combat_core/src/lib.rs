//! combat_core - Turn-based combat simulation core
//!
//! This library provides:
//! - Stats: Combat attributes and the current-stats derivation pipeline
//! - Status effects: Stacking, ticking and expiry of buffs, debuffs and DoTs
//! - Damage: Hit, crit, mitigation, healing and lifesteal formulas
//! - Combat: Turn order, ability resolution, boss summons and the battle
//!   state machine driven through [`combat::CombatEngine`]

pub mod combat;
pub mod config;
pub mod damage;
pub mod error;
pub mod prelude;
pub mod source;
pub mod stat_block;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use combat::{
    Ability, AbilityLookup, AbilityRegistry, AbilityResult, CombatEngine, CombatPhase, CombatState, Enemy,
    EnemyTemplate, EnemyTemplateRegistry, PlayerCharacter,
};
pub use config::{CombatConstants, ConfigError, GameData};
pub use damage::{DamageResult, HealingResult};
pub use error::CombatError;
pub use source::{Equipment, StatBonus, StatSource};
pub use stat_block::{StatAccumulator, StatValue, Stats};
pub use status::{StatModifier, StatusEffectInstance, StatusEffectRegistry};
pub use types::{DamageType, EffectKind, Side, StatKind, TargetType};
