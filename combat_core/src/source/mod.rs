//! StatSource - Trait and implementations for stat providers

mod gear;

pub use gear::{Equipment, StatBonus};

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a combatant's current stats
pub trait StatSource {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Equipment: 0
    /// - Status effects: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
