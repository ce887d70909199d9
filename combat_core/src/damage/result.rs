//! DamageResult / HealingResult - What one hit or heal did to a combatant

use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// Result of applying one hit to a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub target_id: String,
    pub damage_type: DamageType,
    /// Damage actually dealt (0 on a miss)
    pub amount: i32,
    pub is_critical: bool,
    pub is_miss: bool,
    pub hp_before: i32,
    pub hp_after: i32,
    /// Whether this hit took the target from alive to dead
    pub is_killing_blow: bool,
}

impl DamageResult {
    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.is_miss {
            return format!("missed {}", self.target_id);
        }

        let mut parts = vec![format!("{} damage to {}", self.amount, self.target_id)];
        if self.is_critical {
            parts.push("CRITICAL".to_string());
        }
        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }
        parts.join(", ")
    }

    /// Get hp change (negative or zero)
    pub fn hp_change(&self) -> i32 {
        self.hp_after - self.hp_before
    }
}

/// Result of applying healing to a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingResult {
    pub target_id: String,
    /// Healing before the max-hp cap
    pub requested: i32,
    /// Healing that landed
    pub applied: i32,
    /// requested − applied
    pub overheal: i32,
    pub hp_before: i32,
    pub hp_after: i32,
}

impl HealingResult {
    pub fn summary(&self) -> String {
        if self.overheal > 0 {
            format!("{} healed for {} ({} overheal)", self.target_id, self.applied, self.overheal)
        } else {
            format!("{} healed for {}", self.target_id, self.applied)
        }
    }
}
