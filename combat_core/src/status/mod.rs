//! Status effect system

mod active;
pub mod engine;

pub use active::{StatModifier, StatusEffectInstance};
pub use engine::{
    aggregate_modifiers, apply_effect, decrement_durations, is_under_control_effect, tick, ApplyOutcome,
    TickResult,
};

use crate::types::{EffectKind, StatKind};
use std::collections::HashMap;

/// Status effect template registry
#[derive(Debug, Clone, Default)]
pub struct StatusEffectRegistry {
    /// Mapping from effect ID to template
    templates: HashMap<String, StatusEffectInstance>,
}

impl StatusEffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        StatusEffectRegistry {
            templates: HashMap::new(),
        }
    }

    /// Register a template
    pub fn register(&mut self, template: StatusEffectInstance) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> Option<&StatusEffectInstance> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load default status effects
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Poison - stacks up to 3, ticks as the holder's turn begins
        registry.register(
            StatusEffectInstance::new("poison", "Poison", EffectKind::Dot, 3)
                .with_damage_per_turn(10)
                .with_stacking(3)
                .ticking_at_turn_start(),
        );

        // Burn - single instance, ticks at end of turn
        registry.register(StatusEffectInstance::new("burn", "Burn", EffectKind::Dot, 2).with_damage_per_turn(12));

        registry.register(
            StatusEffectInstance::new("regen", "Regeneration", EffectKind::Regen, 3)
                .with_heal_per_turn(8)
                .ticking_at_turn_start(),
        );

        registry.register(StatusEffectInstance::new("renew", "Renew", EffectKind::Hot, 2).with_heal_per_turn(15));

        registry.register(StatusEffectInstance::new("stun", "Stun", EffectKind::Control, 1).preventing_actions());

        registry.register(
            StatusEffectInstance::new("attack_up", "Attack Up", EffectKind::Buff, 3)
                .with_modifier(StatModifier::multiplier(StatKind::Atk, 1.3)),
        );

        registry.register(
            StatusEffectInstance::new("haste", "Haste", EffectKind::Buff, 2)
                .with_modifier(StatModifier::flat(StatKind::Spd, 5.0)),
        );

        // Armor break - stacking flat defense shred
        registry.register(
            StatusEffectInstance::new("armor_break", "Armor Break", EffectKind::Debuff, 3)
                .with_modifier(StatModifier::flat(StatKind::Def, -8.0))
                .with_stacking(3),
        );

        registry.register(
            StatusEffectInstance::new("blind", "Blind", EffectKind::Debuff, 2)
                .with_modifier(StatModifier::flat(StatKind::Acc, -30.0)),
        );

        registry
    }
}
