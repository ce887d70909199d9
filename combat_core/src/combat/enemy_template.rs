//! Enemy templates - Level-scaled blueprints for encounter and summoned enemies

use super::combatant::{Combatant, Enemy};
use super::summon::{BossSummonState, SummonConfig};
use crate::stat_block::Stats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blueprint for an enemy, with stats given at level 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub base_stats: Stats,
    /// Fractional increase of hp/atk/def/mag/res per level above 1
    #[serde(default = "default_growth")]
    pub growth_per_level: f64,
    #[serde(default = "default_max_ap")]
    pub max_ap: i32,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub summon: Option<SummonConfig>,
}

fn default_growth() -> f64 {
    0.1
}

fn default_max_ap() -> i32 {
    10
}

impl EnemyTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_stats: Stats) -> Self {
        EnemyTemplate {
            id: id.into(),
            name: name.into(),
            base_stats,
            growth_per_level: default_growth(),
            max_ap: default_max_ap(),
            abilities: Vec::new(),
            is_boss: false,
            summon: None,
        }
    }

    pub fn with_abilities(mut self, abilities: &[&str]) -> Self {
        self.abilities = abilities.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Mark as a boss that summons from the given config
    pub fn as_boss(mut self, summon: Option<SummonConfig>) -> Self {
        self.is_boss = true;
        self.summon = summon;
        self
    }

    /// Base stats scaled to a level
    ///
    /// Speed and the precision stats do not grow.
    pub fn stats_at_level(&self, level: u32) -> Stats {
        let scale = 1.0 + self.growth_per_level * (level.max(1) - 1) as f64;
        let grow = |value: i32| (value as f64 * scale).floor() as i32;

        let mut stats = self.base_stats;
        stats.max_hp = grow(self.base_stats.max_hp).max(1);
        stats.hp = stats.max_hp;
        stats.atk = grow(self.base_stats.atk);
        stats.def = grow(self.base_stats.def);
        stats.mag = grow(self.base_stats.mag);
        stats.res = grow(self.base_stats.res);
        stats
    }

    /// Create a combat-ready enemy with the given instance id
    pub fn instantiate(&self, id: impl Into<String>, level: u32) -> Enemy {
        let level = level.max(1);
        let mut combatant = Combatant::new(id, self.name.clone(), level, self.stats_at_level(level), self.max_ap);
        combatant.refresh_stats();

        let mut enemy = Enemy::new(combatant, self.abilities.clone());
        enemy.is_boss = self.is_boss;
        enemy.summon = self.summon.clone().map(BossSummonState::new);
        enemy
    }
}

/// Enemy template registry
#[derive(Debug, Clone, Default)]
pub struct EnemyTemplateRegistry {
    templates: HashMap<String, EnemyTemplate>,
}

impl EnemyTemplateRegistry {
    pub fn new() -> Self {
        EnemyTemplateRegistry {
            templates: HashMap::new(),
        }
    }

    pub fn register(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }
}

impl FromIterator<EnemyTemplate> for EnemyTemplateRegistry {
    fn from_iter<I: IntoIterator<Item = EnemyTemplate>>(iter: I) -> Self {
        let mut registry = EnemyTemplateRegistry::new();
        for template in iter {
            registry.register(template);
        }
        registry
    }
}
