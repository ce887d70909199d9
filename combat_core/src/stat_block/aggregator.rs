//! StatAccumulator - Collects stat modifications before deriving current stats

use crate::stat_block::{limits, StatValue, Stats};
use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulates stat modifications from various sources
///
/// Flat values are summed per stat; multipliers are multiplied together per
/// stat, so two +50% sources give 2.25x rather than 2.0x.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatAccumulator {
    pub flat: HashMap<StatKind, f64>,
    pub multiplier: HashMap<StatKind, f64>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flat amount to a stat
    pub fn add_flat(&mut self, stat: StatKind, value: f64) {
        *self.flat.entry(stat).or_insert(0.0) += value;
    }

    /// Fold a multiplier into a stat's running product
    pub fn add_multiplier(&mut self, stat: StatKind, value: f64) {
        *self.multiplier.entry(stat).or_insert(1.0) *= value;
    }

    /// Total flat contribution for a stat (0 if none)
    pub fn flat(&self, stat: StatKind) -> f64 {
        self.flat.get(&stat).copied().unwrap_or(0.0)
    }

    /// Total multiplier for a stat (1 if none)
    pub fn multiplier(&self, stat: StatKind) -> f64 {
        self.multiplier.get(&stat).copied().unwrap_or(1.0)
    }

    /// Check if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.multiplier.is_empty()
    }

    /// Merge another accumulator into this one
    pub fn merge(&mut self, other: &StatAccumulator) {
        for (stat, value) in &other.flat {
            self.add_flat(*stat, *value);
        }
        for (stat, value) in &other.multiplier {
            self.add_multiplier(*stat, *value);
        }
    }

    /// Build the StatValue for one stat on top of a base value
    pub fn stat_value(&self, stat: StatKind, base: f64) -> StatValue {
        let mut value = StatValue::with_base(base);
        value.add_flat(self.flat(stat));
        if let Some(mult) = self.multiplier.get(&stat) {
            value.add_multiplier(*mult);
        }
        value
    }

    /// Derive current stats from base stats plus everything accumulated
    ///
    /// `hp` is copied from `base` unchanged (clamped at 0); callers decide how
    /// current hp follows a changed max hp.
    pub fn apply_to(&self, base: &Stats) -> Stats {
        let derive = |stat: StatKind| -> i32 {
            self.stat_value(stat, base.get(stat) as f64).compute().floor() as i32
        };

        Stats {
            hp: base.hp.max(0),
            max_hp: derive(StatKind::MaxHp).max(limits::MIN_MAX_HP),
            atk: derive(StatKind::Atk),
            def: derive(StatKind::Def),
            mag: derive(StatKind::Mag),
            res: derive(StatKind::Res),
            spd: derive(StatKind::Spd).max(limits::MIN_SPD),
            crt: derive(StatKind::Crt).clamp(limits::MIN_CRT, limits::MAX_CRT),
            eva: derive(StatKind::Eva).clamp(limits::MIN_EVA, limits::MAX_EVA),
            acc: derive(StatKind::Acc).clamp(limits::MIN_ACC, limits::MAX_ACC),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Stats {
        Stats {
            hp: 100,
            max_hp: 100,
            atk: 50,
            def: 20,
            mag: 10,
            res: 10,
            spd: 10,
            crt: 5,
            eva: 5,
            acc: 90,
        }
    }

    #[test]
    fn test_empty_accumulator_is_identity() {
        let acc = StatAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.apply_to(&base()), base());
    }

    #[test]
    fn test_flat_then_multiplier() {
        let mut acc = StatAccumulator::new();
        acc.add_flat(StatKind::Atk, 10.0);
        acc.add_multiplier(StatKind::Atk, 1.5);
        // (50 + 10) * 1.5 = 90
        assert_eq!(acc.apply_to(&base()).atk, 90);
    }

    #[test]
    fn test_multipliers_multiply_not_sum() {
        let mut acc = StatAccumulator::new();
        acc.add_multiplier(StatKind::Atk, 1.5);
        acc.add_multiplier(StatKind::Atk, 1.5);
        assert!((acc.multiplier(StatKind::Atk) - 2.25).abs() < 1e-9);
        // 50 * 2.25 = 112.5 -> 112
        assert_eq!(acc.apply_to(&base()).atk, 112);
    }

    #[test]
    fn test_clamps() {
        let mut acc = StatAccumulator::new();
        acc.add_flat(StatKind::MaxHp, -1000.0);
        acc.add_flat(StatKind::Spd, -1000.0);
        acc.add_flat(StatKind::Crt, 500.0);
        acc.add_flat(StatKind::Eva, 500.0);
        acc.add_flat(StatKind::Acc, -500.0);
        let stats = acc.apply_to(&base());
        assert_eq!(stats.max_hp, 1);
        assert_eq!(stats.spd, 1);
        assert_eq!(stats.crt, 100);
        assert_eq!(stats.eva, 95);
        assert_eq!(stats.acc, 5);
    }

    #[test]
    fn test_defense_may_go_negative() {
        let mut acc = StatAccumulator::new();
        acc.add_flat(StatKind::Def, -50.0);
        assert_eq!(acc.apply_to(&base()).def, -30);
    }

    #[test]
    fn test_merge() {
        let mut a = StatAccumulator::new();
        a.add_flat(StatKind::Def, 5.0);
        a.add_multiplier(StatKind::Spd, 2.0);

        let mut b = StatAccumulator::new();
        b.add_flat(StatKind::Def, 3.0);
        b.add_multiplier(StatKind::Spd, 0.5);

        a.merge(&b);
        assert!((a.flat(StatKind::Def) - 8.0).abs() < f64::EPSILON);
        assert!((a.multiplier(StatKind::Spd) - 1.0).abs() < f64::EPSILON);
    }
}
