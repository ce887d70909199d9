//! Damage calculation - attacker + defender stats into a final hit

use crate::config::DamageConstants;
use crate::stat_block::Stats;
use crate::types::DamageType;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The damage component of an ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInput {
    pub damage_type: DamageType,
    /// Scales atk (physical/true) or mag (magical)
    pub multiplier: f64,
    /// Added before mitigation
    pub flat: f64,
}

impl DamageInput {
    pub fn new(damage_type: DamageType, multiplier: f64) -> Self {
        DamageInput {
            damage_type,
            multiplier,
            flat: 0.0,
        }
    }
}

/// Call-level overrides for the random parts of a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageRolls {
    /// Skip the hit roll entirely
    pub guaranteed_hit: bool,
    /// Force the crit roll's result instead of rolling
    pub force_crit: Option<bool>,
}

/// Outcome of one damage calculation, before it touches any hp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub amount: i32,
    pub is_critical: bool,
    pub is_miss: bool,
}

impl HitOutcome {
    pub fn miss() -> Self {
        HitOutcome {
            amount: 0,
            is_critical: false,
            is_miss: true,
        }
    }
}

/// Post-mitigation damage for one hit, clamped to at least 1
///
/// - Physical: `(atk × mult + flat − def × factor) × variance`
/// - Magical: `(mag × mult + flat − res × factor) × variance`
/// - True: `atk × mult + flat`, no defense and no variance
pub fn mitigated_damage(
    attacker: &Stats,
    defender: &Stats,
    input: &DamageInput,
    variance: f64,
    constants: &DamageConstants,
) -> i32 {
    let raw = match input.damage_type {
        DamageType::Physical => {
            (attacker.atk as f64 * input.multiplier + input.flat - defender.def as f64 * constants.defense_factor)
                * variance
        }
        DamageType::Magical => {
            (attacker.mag as f64 * input.multiplier + input.flat - defender.res as f64 * constants.defense_factor)
                * variance
        }
        DamageType::True => attacker.atk as f64 * input.multiplier + input.flat,
    };

    (raw.floor() as i32).max(1)
}

/// Chance to hit in percent: `clamp(acc − eva × factor, min, max)`
pub fn hit_chance(accuracy: i32, evasion: i32, constants: &DamageConstants) -> f64 {
    (accuracy as f64 - evasion as f64 * constants.evasion_factor)
        .clamp(constants.min_hit_chance, constants.max_hit_chance)
}

/// Roll against a hit chance in percent
pub fn roll_hit(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() * 100.0 < chance
}

/// Roll against a crit chance in percent
pub fn roll_critical(crit_chance: i32, rng: &mut impl Rng) -> bool {
    crit_chance > 0 && rng.gen_range(0..100) < crit_chance
}

/// Critical hits multiply post-mitigation damage, floored once
pub fn apply_critical(damage: i32, constants: &DamageConstants) -> i32 {
    (damage as f64 * constants.crit_multiplier).floor() as i32
}

/// Damage/healing variance multiplier (1.0 when disabled)
pub fn roll_variance(constants: &DamageConstants, rng: &mut impl Rng) -> f64 {
    if !constants.variance_enabled || constants.variance_min >= constants.variance_max {
        return 1.0;
    }
    rng.gen_range(constants.variance_min..=constants.variance_max)
}

/// Calculate one hit from attacker to defender
///
/// RNG is consumed in a fixed order: hit roll (unless guaranteed), variance
/// (if enabled and the damage type uses it), crit roll (unless forced).
pub fn calculate_damage(
    attacker: &Stats,
    defender: &Stats,
    input: &DamageInput,
    rolls: DamageRolls,
    constants: &DamageConstants,
    rng: &mut impl Rng,
) -> HitOutcome {
    if !rolls.guaranteed_hit {
        let chance = hit_chance(attacker.acc, defender.eva, constants);
        if !roll_hit(chance, rng) {
            return HitOutcome::miss();
        }
    }

    let variance = match input.damage_type {
        DamageType::True => 1.0,
        _ => roll_variance(constants, rng),
    };
    let mut amount = mitigated_damage(attacker, defender, input, variance, constants);

    let is_critical = match rolls.force_crit {
        Some(forced) => forced,
        None => roll_critical(attacker.crt, rng),
    };
    if is_critical {
        amount = apply_critical(amount, constants);
    }

    HitOutcome {
        amount,
        is_critical,
        is_miss: false,
    }
}

/// Requested healing: `max(1, (mag × mult + flat) × variance)`
pub fn calculate_healing(caster: &Stats, multiplier: f64, flat: f64, variance: f64) -> i32 {
    let raw = (caster.mag as f64 * multiplier + flat) * variance;
    (raw.floor() as i32).max(1)
}

/// Split requested healing into (applied, overheal) against the target's true max hp
pub fn split_healing(requested: i32, target: &Stats) -> (i32, i32) {
    let requested = requested.max(0);
    let applied = requested.min(target.missing_hp());
    (applied, requested - applied)
}

/// Healing converted from damage dealt: `floor(total × pct / 100)`
pub fn lifesteal_amount(total_damage: i32, percent: f64) -> i32 {
    if total_damage <= 0 || percent <= 0.0 {
        return 0;
    }
    (total_damage as f64 * percent / 100.0).floor() as i32
}
