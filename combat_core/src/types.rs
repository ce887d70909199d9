//! Core enums shared across the combat core

use serde::{Deserialize, Serialize};

/// One of the derived combat attributes a modifier can target
///
/// Current hp is not a modifier target; it is carried across stat refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MaxHp,
    Atk,
    Def,
    Mag,
    Res,
    Spd,
    Crt,
    Eva,
    Acc,
}

impl StatKind {
    /// Get all modifiable stats
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::MaxHp,
            StatKind::Atk,
            StatKind::Def,
            StatKind::Mag,
            StatKind::Res,
            StatKind::Spd,
            StatKind::Crt,
            StatKind::Eva,
            StatKind::Acc,
        ]
    }
}

/// How an ability's damage is mitigated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// atk vs def
    #[default]
    Physical,
    /// mag vs res
    Magical,
    /// atk, ignores defense
    True,
}

/// Which combatants an ability resolves against, relative to the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    #[serde(rename = "self")]
    SelfOnly,
    SingleAlly,
    SingleEnemy,
    AllAllies,
    AoeAllies,
    AllEnemies,
    AoeEnemies,
}

impl TargetType {
    /// Whether the ability resolves against the actor's own side
    pub fn targets_allies(&self) -> bool {
        matches!(
            self,
            TargetType::SelfOnly | TargetType::SingleAlly | TargetType::AllAllies | TargetType::AoeAllies
        )
    }

    /// Whether every living member of the side is hit
    pub fn is_area(&self) -> bool {
        matches!(
            self,
            TargetType::AllAllies | TargetType::AoeAllies | TargetType::AllEnemies | TargetType::AoeEnemies
        )
    }
}

/// Which roster a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Category of a status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Buff,
    Debuff,
    Dot,
    Hot,
    Control,
    Regen,
}
