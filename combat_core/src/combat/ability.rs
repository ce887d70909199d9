//! Ability - Read-only ability templates and their lookup

use crate::damage::DamageInput;
use crate::status::StatusEffectInstance;
use crate::types::{DamageType, TargetType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A status effect an ability may apply, with its chance in percent (1–100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectChance {
    pub effect: StatusEffectInstance,
    pub chance: u32,
}

/// Everything an ability does once its targets are resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityEffects {
    #[serde(default)]
    pub damage_multiplier: f64,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub flat_damage: f64,
    #[serde(default)]
    pub healing_multiplier: f64,
    #[serde(default)]
    pub flat_healing: f64,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectChance>,
    /// Percent of total damage dealt returned to the actor as healing
    #[serde(default)]
    pub lifesteal: f64,
    #[serde(default)]
    pub ap_restore: i32,
    #[serde(default)]
    pub ap_drain: i32,
}

impl AbilityEffects {
    /// Whether the ability deals damage
    pub fn has_damage(&self) -> bool {
        self.damage_multiplier > 0.0 || self.flat_damage > 0.0
    }

    /// Whether the ability heals its targets
    pub fn has_healing(&self) -> bool {
        self.healing_multiplier > 0.0 || self.flat_healing > 0.0
    }

    pub fn damage_input(&self) -> DamageInput {
        DamageInput {
            damage_type: self.damage_type,
            multiplier: self.damage_multiplier,
            flat: self.flat_damage,
        }
    }
}

/// Describes one ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Unique ability identifier
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub ap_cost: i32,
    pub target_type: TargetType,
    /// Skip the hit roll
    #[serde(default)]
    pub guaranteed_hit: bool,
    #[serde(default)]
    pub effects: AbilityEffects,
}

impl Ability {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ap_cost: i32, target_type: TargetType) -> Self {
        Ability {
            id: id.into(),
            name: name.into(),
            ap_cost,
            target_type,
            guaranteed_hit: false,
            effects: AbilityEffects::default(),
        }
    }

    /// Add a damage component
    pub fn with_damage(mut self, damage_type: DamageType, multiplier: f64) -> Self {
        self.effects.damage_type = damage_type;
        self.effects.damage_multiplier = multiplier;
        self
    }

    /// Add a healing component
    pub fn with_healing(mut self, multiplier: f64, flat: f64) -> Self {
        self.effects.healing_multiplier = multiplier;
        self.effects.flat_healing = flat;
        self
    }

    pub fn with_status(mut self, effect: StatusEffectInstance, chance: u32) -> Self {
        self.effects.status_effects.push(StatusEffectChance { effect, chance });
        self
    }

    pub fn with_lifesteal(mut self, percent: f64) -> Self {
        self.effects.lifesteal = percent;
        self
    }

    pub fn with_ap(mut self, restore: i32, drain: i32) -> Self {
        self.effects.ap_restore = restore;
        self.effects.ap_drain = drain;
        self
    }

    pub fn always_hits(mut self) -> Self {
        self.guaranteed_hit = true;
        self
    }
}

/// Template lookup for abilities
pub trait AbilityLookup {
    fn get_ability(&self, id: &str) -> Option<&Ability>;
}

/// Ability template registry
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    abilities: HashMap<String, Ability>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        AbilityRegistry {
            abilities: HashMap::new(),
        }
    }

    /// Register an ability, replacing any with the same id
    pub fn register(&mut self, ability: Ability) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    pub fn get(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }
}

impl AbilityLookup for AbilityRegistry {
    fn get_ability(&self, id: &str) -> Option<&Ability> {
        self.get(id)
    }
}

impl FromIterator<Ability> for AbilityRegistry {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        let mut registry = AbilityRegistry::new();
        for ability in iter {
            registry.register(ability);
        }
        registry
    }
}
