//! Stats - Combat attributes and the current-stats derivation pipeline

mod aggregator;
mod computed;
mod stat_value;

pub use aggregator::StatAccumulator;
pub use stat_value::StatValue;

use crate::source::StatSource;
use crate::types::StatKind;
use serde::{Deserialize, Serialize};

/// Clamp bounds applied after derivation
pub mod limits {
    pub const MIN_MAX_HP: i32 = 1;
    pub const MIN_SPD: i32 = 1;
    pub const MIN_CRT: i32 = 0;
    pub const MAX_CRT: i32 = 100;
    pub const MIN_EVA: i32 = 0;
    pub const MAX_EVA: i32 = 95;
    pub const MIN_ACC: i32 = 5;
    pub const MAX_ACC: i32 = 100;
}

/// The combat attributes of one combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current hp; templates may omit it and start at max
    #[serde(default)]
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub mag: i32,
    pub res: i32,
    pub spd: i32,
    /// Critical chance in percent
    #[serde(default = "default_crt")]
    pub crt: i32,
    /// Evasion in percent
    #[serde(default = "default_eva")]
    pub eva: i32,
    /// Accuracy in percent
    #[serde(default = "default_acc")]
    pub acc: i32,
}

fn default_crt() -> i32 {
    5
}
fn default_eva() -> i32 {
    5
}
fn default_acc() -> i32 {
    95
}

impl Stats {
    /// Stats at full health with the given max hp
    pub fn new(max_hp: i32, atk: i32, def: i32, mag: i32, res: i32, spd: i32) -> Self {
        Stats {
            hp: max_hp,
            max_hp,
            atk,
            def,
            mag,
            res,
            spd,
            crt: default_crt(),
            eva: default_eva(),
            acc: default_acc(),
        }
    }

    /// Set crit/evasion/accuracy in one go
    pub fn with_precision(mut self, crt: i32, eva: i32, acc: i32) -> Self {
        self.crt = crt;
        self.eva = eva;
        self.acc = acc;
        self
    }

    /// Read a modifiable stat
    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::MaxHp => self.max_hp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mag => self.mag,
            StatKind::Res => self.res,
            StatKind::Spd => self.spd,
            StatKind::Crt => self.crt,
            StatKind::Eva => self.eva,
            StatKind::Acc => self.acc,
        }
    }

    /// Overwrite a modifiable stat
    pub fn set(&mut self, stat: StatKind, value: i32) {
        match stat {
            StatKind::MaxHp => self.max_hp = value,
            StatKind::Atk => self.atk = value,
            StatKind::Def => self.def = value,
            StatKind::Mag => self.mag = value,
            StatKind::Res => self.res = value,
            StatKind::Spd => self.spd = value,
            StatKind::Crt => self.crt = value,
            StatKind::Eva => self.eva = value,
            StatKind::Acc => self.acc = value,
        }
    }
}

/// Derive current stats from base stats and a set of stat sources
///
/// Sources are applied in priority order into one accumulator; flat bonuses
/// are summed, multipliers multiplied, then the result is floored and
/// clamped. `hp` is carried over from `base`.
pub fn derive_stats(base: &Stats, sources: &[&dyn StatSource]) -> Stats {
    let mut sorted: Vec<&&dyn StatSource> = sources.iter().collect();
    sorted.sort_by_key(|s| s.priority());

    let mut accumulator = StatAccumulator::new();
    for source in sorted {
        source.apply(&mut accumulator);
    }

    accumulator.apply_to(base)
}
