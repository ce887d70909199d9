//! Status effect configuration loading

use super::ConfigError;
use crate::status::{StatusEffectInstance, StatusEffectRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for status effect templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffectsConfig {
    #[serde(rename = "status_effects")]
    pub status_effects: Vec<StatusEffectInstance>,
}

impl StatusEffectsConfig {
    fn into_registry(self) -> Result<StatusEffectRegistry, ConfigError> {
        let mut registry = StatusEffectRegistry::new();
        for effect in self.status_effects {
            validate_effect(&effect)?;
            registry.register(effect);
        }
        Ok(registry)
    }
}

fn validate_effect(effect: &StatusEffectInstance) -> Result<(), ConfigError> {
    if effect.duration <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "status effect '{}' has non-positive duration {}",
            effect.id, effect.duration
        )));
    }
    if effect.max_stacks == 0 {
        return Err(ConfigError::ValidationError(format!(
            "status effect '{}' has max_stacks = 0",
            effect.id
        )));
    }
    if let Some(modifier) = effect.stat_modifiers.iter().find(|m| m.multiplier <= 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "status effect '{}' has non-positive {:?} multiplier {}",
            effect.id, modifier.stat, modifier.multiplier
        )));
    }
    Ok(())
}

/// Load status effect templates from a TOML file
pub fn load_status_effect_configs(path: &Path) -> Result<StatusEffectRegistry, ConfigError> {
    let config: StatusEffectsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load status effect templates from a TOML string
pub fn parse_status_effect_configs(content: &str) -> Result<StatusEffectRegistry, ConfigError> {
    let config: StatusEffectsConfig = super::parse_toml(content)?;
    config.into_registry()
}

/// Get the bundled status effect templates
pub fn default_status_effects() -> StatusEffectRegistry {
    let toml = include_str!("../../config/status_effects.toml");
    parse_status_effect_configs(toml).unwrap_or_else(|_| StatusEffectRegistry::with_defaults())
}
