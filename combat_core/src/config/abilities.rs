//! Ability configuration loading
//!
//! Abilities name their status effects by id; the ids are resolved against a
//! [`StatusEffectRegistry`] while loading.

use super::ConfigError;
use crate::combat::{Ability, AbilityEffects, AbilityRegistry, StatusEffectChance};
use crate::status::StatusEffectRegistry;
use crate::types::{DamageType, TargetType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A status effect reference inside an ability definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffectRef {
    pub effect: String,
    pub chance: u32,
    /// Replaces the template's duration
    #[serde(default)]
    pub duration: Option<i32>,
}

/// An ability as written in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ap_cost: i32,
    pub target_type: TargetType,
    #[serde(default)]
    pub guaranteed_hit: bool,
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
    pub lifesteal: f64,
    #[serde(default)]
    pub ap_restore: i32,
    #[serde(default)]
    pub ap_drain: i32,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectRef>,
}

impl AbilityConfig {
    /// Build the ability, resolving status effect ids
    pub fn resolve(&self, statuses: &StatusEffectRegistry) -> Result<Ability, ConfigError> {
        if self.ap_cost < 0 {
            return Err(ConfigError::ValidationError(format!(
                "ability '{}' has negative ap_cost",
                self.id
            )));
        }

        let mut status_effects = Vec::with_capacity(self.status_effects.len());
        for entry in &self.status_effects {
            if !(1..=100).contains(&entry.chance) {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}': chance {} for '{}' is outside 1..=100",
                    self.id, entry.chance, entry.effect
                )));
            }
            let mut effect = statuses.get(&entry.effect).cloned().ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "ability '{}' references unknown status effect '{}'",
                    self.id, entry.effect
                ))
            })?;
            if let Some(duration) = entry.duration {
                effect.duration = duration;
            }
            status_effects.push(StatusEffectChance {
                effect,
                chance: entry.chance,
            });
        }

        Ok(Ability {
            id: self.id.clone(),
            name: self.name.clone(),
            ap_cost: self.ap_cost,
            target_type: self.target_type,
            guaranteed_hit: self.guaranteed_hit,
            effects: AbilityEffects {
                damage_multiplier: self.damage_multiplier,
                damage_type: self.damage_type,
                flat_damage: self.flat_damage,
                healing_multiplier: self.healing_multiplier,
                flat_healing: self.flat_healing,
                status_effects,
                lifesteal: self.lifesteal,
                ap_restore: self.ap_restore,
                ap_drain: self.ap_drain,
            },
        })
    }
}

/// Container for ability configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    #[serde(rename = "abilities")]
    pub abilities: Vec<AbilityConfig>,
}

impl AbilitiesConfig {
    fn into_registry(self, statuses: &StatusEffectRegistry) -> Result<AbilityRegistry, ConfigError> {
        let mut registry = AbilityRegistry::new();
        for config in &self.abilities {
            registry.register(config.resolve(statuses)?);
        }
        Ok(registry)
    }
}

/// Load ability configurations from a TOML file
pub fn load_ability_configs(path: &Path, statuses: &StatusEffectRegistry) -> Result<AbilityRegistry, ConfigError> {
    let config: AbilitiesConfig = super::load_toml(path)?;
    config.into_registry(statuses)
}

/// Load ability configurations from a TOML string
pub fn parse_ability_configs(content: &str, statuses: &StatusEffectRegistry) -> Result<AbilityRegistry, ConfigError> {
    let config: AbilitiesConfig = super::parse_toml(content)?;
    config.into_registry(statuses)
}

/// Get the bundled abilities, resolved against the given effects
pub fn default_abilities(statuses: &StatusEffectRegistry) -> Result<AbilityRegistry, ConfigError> {
    parse_ability_configs(include_str!("../../config/abilities.toml"), statuses)
}
