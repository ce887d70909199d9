//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::Stats;
pub use crate::types::{DamageType, EffectKind, Side, StatKind, TargetType};

// Combatants and templates
pub use crate::combat::{
    Ability, AbilityRegistry, Combatant, Enemy, EnemyTemplate, EnemyTemplateRegistry, PlayerCharacter,
};

// Engine
pub use crate::combat::{AbilityResult, CombatEngine, CombatLogEntry, CombatPhase, CombatState, LogKind};
pub use crate::error::CombatError;

// Status effects
pub use crate::status::{StatModifier, StatusEffectInstance, StatusEffectRegistry};

// Sources
pub use crate::source::{Equipment, StatBonus, StatSource};

// Rewards
pub use crate::combat::{BasicRewards, NoRewards, RewardProvider};

// Config
pub use crate::config::{CombatConstants, GameData};
