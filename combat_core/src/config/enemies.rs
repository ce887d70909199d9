//! Enemy template configuration loading

use super::ConfigError;
use crate::combat::{EnemyTemplate, EnemyTemplateRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for enemy templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemiesConfig {
    #[serde(rename = "enemies")]
    pub enemies: Vec<EnemyTemplate>,
}

impl EnemiesConfig {
    fn into_registry(self) -> Result<EnemyTemplateRegistry, ConfigError> {
        let registry: EnemyTemplateRegistry = self.enemies.into_iter().collect();
        for template in registry.iter() {
            validate_template(template, &registry)?;
        }
        Ok(registry)
    }
}

/// Check a template's stats and that its summon config points at known templates
fn validate_template(template: &EnemyTemplate, registry: &EnemyTemplateRegistry) -> Result<(), ConfigError> {
    if template.base_stats.max_hp <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "enemy '{}' has non-positive max_hp",
            template.id
        )));
    }
    if template.growth_per_level < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "enemy '{}' has negative growth_per_level",
            template.id
        )));
    }

    let Some(summon) = &template.summon else {
        return Ok(());
    };
    if !template.is_boss {
        return Err(ConfigError::ValidationError(format!(
            "enemy '{}' has a summon config but is not a boss",
            template.id
        )));
    }
    if summon.triggers.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "boss '{}' has a summon config without triggers",
            template.id
        )));
    }
    if let Some(trigger) = summon.triggers.iter().find(|t| !(0.0..=100.0).contains(&t.value)) {
        return Err(ConfigError::ValidationError(format!(
            "boss '{}' has trigger value {} outside 0..=100",
            template.id, trigger.value
        )));
    }
    for id in &summon.pool {
        if !registry.contains(id) {
            return Err(ConfigError::ValidationError(format!(
                "boss '{}' summons unknown enemy '{}'",
                template.id, id
            )));
        }
    }
    Ok(())
}

/// Load enemy templates from a TOML file
pub fn load_enemy_configs(path: &Path) -> Result<EnemyTemplateRegistry, ConfigError> {
    let config: EnemiesConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load enemy templates from a TOML string
pub fn parse_enemy_configs(content: &str) -> Result<EnemyTemplateRegistry, ConfigError> {
    let config: EnemiesConfig = super::parse_toml(content)?;
    config.into_registry()
}

/// Get the bundled enemy templates
pub fn default_enemies() -> Result<EnemyTemplateRegistry, ConfigError> {
    parse_enemy_configs(include_str!("../../config/enemies.toml"))
}
