//! Combat log - Structured, caller-visible battle history

use serde::{Deserialize, Serialize};

/// Category of a combat log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    CombatStart,
    RoundStart,
    TurnStart,
    TurnSkipped,
    AbilityUsed,
    NoTargets,
    Damage,
    Miss,
    Death,
    Healing,
    Lifesteal,
    StatusApplied,
    StatusResisted,
    StatusTick,
    StatusExpired,
    ApRestore,
    ApDrain,
    Summon,
    TeamWipe,
    ReserveSwap,
    Victory,
    Defeat,
    Reward,
}

/// One entry of the combat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub round: u32,
    pub turn: u32,
    pub kind: LogKind,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    pub message: String,
    /// Amount involved (damage, healing, AP, xp), if any
    #[serde(default)]
    pub value: Option<i64>,
}

impl CombatLogEntry {
    pub fn new(round: u32, turn: u32, kind: LogKind, message: impl Into<String>) -> Self {
        CombatLogEntry {
            round,
            turn,
            kind,
            actor_id: None,
            target_id: None,
            message: message.into(),
            value: None,
        }
    }

    pub fn actor(&mut self, id: &str) -> &mut Self {
        self.actor_id = Some(id.to_string());
        self
    }

    pub fn target(&mut self, id: &str) -> &mut Self {
        self.target_id = Some(id.to_string());
        self
    }

    pub fn value(&mut self, value: impl Into<i64>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Whether the entry involves the combatant as actor or target
    pub fn involves(&self, id: &str) -> bool {
        self.actor_id.as_deref() == Some(id) || self.target_id.as_deref() == Some(id)
    }
}
