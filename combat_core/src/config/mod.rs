//! Configuration loading from TOML files

mod abilities;
mod constants;
mod enemies;
mod status_effects;

pub use abilities::{default_abilities, load_ability_configs, parse_ability_configs, AbilityConfig, StatusEffectRef};
pub use constants::{ApConstants, CombatConstants, DamageConstants, RewardConstants};
pub use enemies::{default_enemies, load_enemy_configs, parse_enemy_configs};
pub use status_effects::{default_status_effects, load_status_effect_configs, parse_status_effect_configs};

use crate::combat::{AbilityRegistry, EnemyTemplateRegistry};
use crate::status::StatusEffectRegistry;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load and validate combat constants from a TOML file
pub fn load_constants(path: &Path) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = load_toml(path)?;
    constants.validate().map_err(ConfigError::ValidationError)?;
    Ok(constants)
}

/// Every template table the engine reads, plus the tunable constants
#[derive(Debug, Clone)]
pub struct GameData {
    pub status_effects: StatusEffectRegistry,
    pub abilities: AbilityRegistry,
    pub enemies: EnemyTemplateRegistry,
    pub constants: CombatConstants,
}

impl GameData {
    /// The bundled templates with default constants
    pub fn defaults() -> Result<Self, ConfigError> {
        let status_effects = default_status_effects();
        let abilities = default_abilities(&status_effects)?;
        let enemies = default_enemies()?;
        let data = GameData {
            status_effects,
            abilities,
            enemies,
            constants: CombatConstants::default(),
        };
        data.validate()?;
        Ok(data)
    }

    /// Load `status_effects.toml`, `abilities.toml` and `enemies.toml` from a
    /// directory; `constants.toml` is optional
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let status_effects = load_status_effect_configs(&dir.join("status_effects.toml"))?;
        let abilities = load_ability_configs(&dir.join("abilities.toml"), &status_effects)?;
        let enemies = load_enemy_configs(&dir.join("enemies.toml"))?;

        let constants_path = dir.join("constants.toml");
        let constants = if constants_path.exists() {
            load_constants(&constants_path)?
        } else {
            CombatConstants::default()
        };

        let data = GameData {
            status_effects,
            abilities,
            enemies,
            constants,
        };
        data.validate()?;
        debug!(
            dir = %dir.display(),
            abilities = data.abilities.len(),
            enemies = data.enemies.len(),
            "game data loaded"
        );
        Ok(data)
    }

    /// Cross-table checks: every enemy ability must exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants.validate().map_err(ConfigError::ValidationError)?;
        for template in self.enemies.iter() {
            if let Some(missing) = template.abilities.iter().find(|a| self.abilities.get(a).is_none()) {
                return Err(ConfigError::ValidationError(format!(
                    "enemy '{}' uses unknown ability '{}'",
                    template.id, missing
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_game_data() {
        let data = GameData::defaults().unwrap();
        assert!(data.abilities.get("slash").is_some());
        assert!(data.enemies.get("goblin").is_some());
        assert!(data.status_effects.get("poison").is_some());
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let result = GameData::load_from_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_parse_constants_partial() {
        let toml = r#"
[damage]
variance_enabled = true
crit_multiplier = 1.5

[action_points]
regen_per_turn = 3
"#;
        let constants: CombatConstants = parse_toml(toml).unwrap();
        assert!(constants.damage.variance_enabled);
        assert!((constants.damage.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((constants.damage.defense_factor - 0.5).abs() < f64::EPSILON);
        assert_eq!(constants.action_points.regen_per_turn, 3);
        assert_eq!(constants.action_points.starting_ap, 2);
        assert_eq!(constants.rewards.base_xp, 10);
    }

    #[test]
    fn test_enemy_with_unknown_ability_rejected() {
        let mut data = GameData::defaults().unwrap();
        let mut template = data.enemies.get("goblin").cloned().unwrap();
        template.id = "odd_goblin".to_string();
        template.abilities.push("moonbeam".to_string());
        data.enemies.register(template);

        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("moonbeam"));
    }
}
