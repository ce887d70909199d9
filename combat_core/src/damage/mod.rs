//! Damage system - hit, crit, mitigation and healing formulas

mod calculation;
mod result;

pub use calculation::{
    apply_critical, calculate_damage, calculate_healing, hit_chance, lifesteal_amount, mitigated_damage,
    roll_critical, roll_hit, roll_variance, split_healing, DamageInput, DamageRolls, HitOutcome,
};
pub use result::{DamageResult, HealingResult};
