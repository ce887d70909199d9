//! Computed/derived helpers for Stats

use crate::stat_block::Stats;

impl Stats {
    /// Check if the owner is alive
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether current hp is at (or above) max
    pub fn is_full_health(&self) -> bool {
        self.hp >= self.max_hp
    }

    /// Calculate hp percentage remaining
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f64 / self.max_hp as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Room left before max hp
    pub fn missing_hp(&self) -> i32 {
        (self.max_hp - self.hp).max(0)
    }
}
