//! Equipment - Flat stat bonuses from equipped items

use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::StatKind;
use serde::{Deserialize, Serialize};

/// A flat bonus granted by an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: StatKind,
    pub value: i32,
}

impl StatBonus {
    pub fn new(stat: StatKind, value: i32) -> Self {
        StatBonus { stat, value }
    }
}

/// An equipped (or dropped) item
///
/// Generation and rarity rules live with the loot collaborator; the combat
/// core only reads the flat bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub bonuses: Vec<StatBonus>,
}

impl Equipment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Equipment {
            id: id.into(),
            name: name.into(),
            level,
            bonuses: Vec::new(),
        }
    }

    /// Add a bonus to this item
    pub fn with_bonus(mut self, bonus: StatBonus) -> Self {
        self.bonuses.push(bonus);
        self
    }

    /// Total bonus this item grants to a stat
    pub fn bonus(&self, stat: StatKind) -> i32 {
        self.bonuses
            .iter()
            .filter(|b| b.stat == stat)
            .map(|b| b.value)
            .sum()
    }
}

impl StatSource for Equipment {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        0 // Gear applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for bonus in &self.bonuses {
            stats.add_flat(bonus.stat, bonus.value as f64);
        }
    }
}
