//! Status effect application, ticking and expiry

use super::StatusEffectInstance;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use serde::{Deserialize, Serialize};

/// What happened when an effect was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "stacks", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// A fresh instance was added
    Applied,
    /// An existing instance gained a stack (new stack count)
    Stacked(u32),
    /// An existing instance only had its duration refreshed
    Refreshed,
    /// The incoming effect had no duration and was dropped
    Ignored,
}

/// Aggregate damage/healing from one tick phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub damage: i32,
    pub healing: i32,
}

impl TickResult {
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.healing == 0
    }
}

/// Apply an effect to a list of active effects, respecting stacking rules
///
/// The incoming effect is cloned; the list never aliases a template.
pub fn apply_effect(effects: &mut Vec<StatusEffectInstance>, incoming: &StatusEffectInstance) -> ApplyOutcome {
    if incoming.duration <= 0 {
        return ApplyOutcome::Ignored;
    }

    match effects.iter_mut().find(|e| e.id == incoming.id) {
        None => {
            let mut instance = incoming.clone();
            instance.current_stacks = 1;
            effects.push(instance);
            ApplyOutcome::Applied
        }
        Some(existing) if existing.stackable && existing.current_stacks < existing.max_stacks => {
            existing.current_stacks += 1;
            existing.duration = incoming.duration;
            ApplyOutcome::Stacked(existing.current_stacks)
        }
        Some(existing) => {
            // At max stacks, or not stackable: duration only
            existing.duration = incoming.duration;
            ApplyOutcome::Refreshed
        }
    }
}

/// Sum damage/healing for every effect that ticks in this phase
///
/// Durations are not touched; see [`decrement_durations`].
pub fn tick(effects: &[StatusEffectInstance], at_turn_start: bool) -> TickResult {
    effects
        .iter()
        .filter(|e| e.is_active() && e.ticks_at_turn_start == at_turn_start)
        .fold(TickResult::default(), |mut acc, e| {
            acc.damage += e.effective_damage_per_turn().max(0);
            acc.healing += e.effective_heal_per_turn().max(0);
            acc
        })
}

/// Decrement every effect's duration by one turn and remove the expired ones
///
/// Runs regardless of tick phase. Returns the removed effects.
pub fn decrement_durations(effects: &mut Vec<StatusEffectInstance>) -> Vec<StatusEffectInstance> {
    for effect in effects.iter_mut() {
        effect.duration -= 1;
    }

    let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(effects)
        .into_iter()
        .partition(|e| e.duration <= 0);
    *effects = active;
    expired
}

/// Whether any active effect prevents actions
pub fn is_under_control_effect(effects: &[StatusEffectInstance]) -> bool {
    effects.iter().any(|e| e.is_active() && e.is_control())
}

/// Collect the flat/multiplicative stat contributions of all active effects
pub fn aggregate_modifiers(effects: &[StatusEffectInstance]) -> StatAccumulator {
    let mut accumulator = StatAccumulator::new();
    for effect in effects {
        effect.apply(&mut accumulator);
    }
    accumulator
}
