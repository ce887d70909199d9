//! AbilityResult - Everything one ability use did

use crate::damage::{DamageResult, HealingResult};
use crate::status::ApplyOutcome;
use serde::{Deserialize, Serialize};

/// A status effect that landed on a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub target_id: String,
    pub effect_id: String,
    pub outcome: ApplyOutcome,
}

/// AP drained from one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApDrain {
    pub target_id: String,
    pub amount: i32,
}

/// Result of executing an ability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityResult {
    pub actor_id: String,
    pub ability_id: String,
    pub ap_spent: i32,

    // === Targeting ===
    /// Resolved targets; empty when nothing valid was found
    pub targets: Vec<String>,

    // === Effects ===
    pub damage: Vec<DamageResult>,
    pub healing: Vec<HealingResult>,
    pub lifesteal: Option<HealingResult>,
    pub statuses_applied: Vec<StatusApplication>,
    /// Effect ids whose chance roll failed
    pub statuses_resisted: Vec<String>,
    pub ap_restored: i32,
    pub ap_drained: Vec<ApDrain>,

    // === Side Effects ===
    /// Targets this ability killed
    pub deaths: Vec<String>,
    /// Minions summoned in response to the damage
    pub summoned: Vec<String>,
}

impl AbilityResult {
    pub fn new(actor_id: impl Into<String>, ability_id: impl Into<String>, ap_spent: i32) -> Self {
        AbilityResult {
            actor_id: actor_id.into(),
            ability_id: ability_id.into(),
            ap_spent,
            ..Default::default()
        }
    }

    /// Whether target resolution came up empty
    pub fn had_no_targets(&self) -> bool {
        self.targets.is_empty()
    }

    /// Damage dealt across all targets
    pub fn total_damage(&self) -> i32 {
        self.damage.iter().map(|d| d.amount).sum()
    }

    /// Healing that landed across all targets (excluding lifesteal)
    pub fn total_healing(&self) -> i32 {
        self.healing.iter().map(|h| h.applied).sum()
    }

    pub fn hits(&self) -> usize {
        self.damage.iter().filter(|d| !d.is_miss).count()
    }

    pub fn misses(&self) -> usize {
        self.damage.iter().filter(|d| d.is_miss).count()
    }
}
