//! StatValue - The modifier container (Base + Flat → Multipliers)

use serde::{Deserialize, Serialize};

/// Represents a stat that follows the Flat → Multiplier model
///
/// Final value is calculated as:
/// `(base + flat) × Π(multipliers)`
///
/// - `base`: The base value (from the combatant's own stats)
/// - `flat`: Sum of all flat additions (equipment, status effects)
/// - `multipliers`: Every multiplicative source, each applied to the running product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatValue {
    /// Base value
    pub base: f64,
    /// Sum of all flat additions
    pub flat: f64,
    /// List of multipliers (1.0 = unchanged)
    pub multipliers: Vec<f64>,
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            flat: 0.0,
            multipliers: Vec::new(),
        }
    }

    /// Calculate final value: (base + flat) × Π(multipliers)
    pub fn compute(&self) -> f64 {
        self.total_flat() * self.total_multiplier()
    }

    /// Add a flat bonus (negative for penalties)
    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Add a multiplier (e.g., 1.25 for +25%, 0.5 for half)
    pub fn add_multiplier(&mut self, value: f64) {
        self.multipliers.push(value);
    }

    /// Reset to just the base value
    pub fn reset_to_base(&mut self) {
        self.flat = 0.0;
        self.multipliers.clear();
    }

    /// Get the total flat value (base + flat additions)
    pub fn total_flat(&self) -> f64 {
        self.base + self.flat
    }

    /// Get the product of all multipliers
    pub fn total_multiplier(&self) -> f64 {
        self.multipliers.iter().product()
    }
}
