//! Boss summons - HP-threshold triggers that spawn minions once each

use super::enemy_template::EnemyTemplateRegistry;
use super::log::LogKind;
use super::state::CombatState;
use super::turn_order;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What makes a summon trigger fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fires when hp percent drops to or below the trigger value
    #[default]
    HpThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummonTrigger {
    #[serde(default)]
    pub kind: TriggerKind,
    pub value: f64,
}

impl SummonTrigger {
    pub fn hp_threshold(percent: f64) -> Self {
        SummonTrigger {
            kind: TriggerKind::HpThreshold,
            value: percent,
        }
    }

    pub fn is_met(&self, hp_percent: f64) -> bool {
        match self.kind {
            TriggerKind::HpThreshold => hp_percent <= self.value,
        }
    }
}

/// How a boss summons: which templates, how many in total, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonConfig {
    pub max_summons: u32,
    /// Enemy template ids to pick minions from
    pub pool: Vec<String>,
    pub triggers: Vec<SummonTrigger>,
}

/// Per-boss trigger usage and spawned minions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSummonState {
    pub config: SummonConfig,
    /// Indexed like `config.triggers`
    pub has_used_summon: Vec<bool>,
    /// Every minion this boss has spawned, dead or alive
    pub current_summons: Vec<String>,
}

impl BossSummonState {
    pub fn new(config: SummonConfig) -> Self {
        let has_used_summon = vec![false; config.triggers.len()];
        BossSummonState {
            config,
            has_used_summon,
            current_summons: Vec::new(),
        }
    }

    /// Minions this boss may still spawn
    pub fn capacity(&self) -> u32 {
        self.config.max_summons.saturating_sub(self.current_summons.len() as u32)
    }

    /// Mark every unfired trigger met at this hp percent as fired, returning their indices
    pub fn fire_triggers(&mut self, hp_percent: f64) -> Vec<usize> {
        let mut fired = Vec::new();
        for (index, trigger) in self.config.triggers.iter().enumerate() {
            let used = self.has_used_summon.get(index).copied().unwrap_or(true);
            if !used && trigger.is_met(hp_percent) {
                fired.push(index);
            }
        }
        for &index in &fired {
            self.has_used_summon[index] = true;
        }
        fired
    }
}

/// Check every living boss's triggers and spawn minions for the ones that fire
///
/// Spawned minions are appended to the enemy team and the turn order is
/// rebuilt. Returns the ids of the spawned minions.
pub fn check_summon_triggers<R: Rng>(
    state: &mut CombatState,
    templates: &EnemyTemplateRegistry,
    starting_ap: i32,
    rng: &mut R,
) -> Vec<String> {
    let bosses: Vec<usize> = state
        .enemy_team
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_boss && e.is_alive() && e.summon.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut spawned = Vec::new();
    for index in bosses {
        spawned.extend(summon_for_boss(state, index, templates, starting_ap, rng));
    }

    if !spawned.is_empty() {
        turn_order::rebuild(state, rng);
    }
    spawned
}

fn summon_for_boss<R: Rng>(
    state: &mut CombatState,
    boss_index: usize,
    templates: &EnemyTemplateRegistry,
    starting_ap: i32,
    rng: &mut R,
) -> Vec<String> {
    let boss = &mut state.enemy_team[boss_index];
    let boss_id = boss.combatant.id.clone();
    let boss_level = boss.combatant.level;
    let hp_percent = boss.combatant.stats.hp_percent();
    let Some(summon) = boss.summon.as_mut() else {
        return Vec::new();
    };

    let fired = summon.fire_triggers(hp_percent);
    if fired.is_empty() {
        return Vec::new();
    }
    let pool = summon.config.pool.clone();

    let mut spawned = Vec::new();
    for trigger in fired {
        let capacity = state.enemy_team[boss_index]
            .summon
            .as_ref()
            .map_or(0, |s| s.capacity());
        if capacity == 0 || pool.is_empty() {
            debug!(boss = %boss_id, trigger, "summon trigger fired with no capacity");
            continue;
        }

        let count = capacity.min(rng.gen_range(1..=2));
        for _ in 0..count {
            let template_id = &pool[rng.gen_range(0..pool.len())];
            let level = (boss_level as i64 - rng.gen_range(0..=2)).max(1) as u32;

            let Some(template) = templates.get(template_id) else {
                warn!(boss = %boss_id, template = %template_id, "unknown summon template");
                continue;
            };

            state.summon_serial += 1;
            let minion_id = format!("{}_summon_{}", boss_id, state.summon_serial);
            let mut minion = template.instantiate(minion_id.clone(), level);
            minion.is_summoned = true;
            minion.combatant.current_ap = starting_ap.min(minion.combatant.max_ap);

            if let Some(summon) = state.enemy_team[boss_index].summon.as_mut() {
                summon.current_summons.push(minion_id.clone());
            }
            state
                .log(LogKind::Summon, format!("{} summons {} (level {})", boss_id, minion.combatant.name, level))
                .actor(&boss_id)
                .target(&minion_id);
            debug!(boss = %boss_id, minion = %minion_id, level, "minion summoned");

            state.enemy_team.push(minion);
            spawned.push(minion_id);
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::{Combatant, PlayerCharacter};
    use crate::combat::enemy_template::EnemyTemplate;
    use crate::stat_block::Stats;
    use rand::SeedableRng;

    fn make_test_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(12345)
    }

    fn templates() -> EnemyTemplateRegistry {
        let config = SummonConfig {
            max_summons: 3,
            pool: vec!["imp".to_string()],
            triggers: vec![SummonTrigger::hp_threshold(75.0), SummonTrigger::hp_threshold(25.0)],
        };
        vec![
            EnemyTemplate::new("imp", "Imp", Stats::new(30, 8, 2, 6, 2, 11)),
            EnemyTemplate::new("warlock", "Warlock", Stats::new(300, 20, 10, 30, 15, 6)).as_boss(Some(config)),
        ]
        .into_iter()
        .collect()
    }

    fn battle(templates: &EnemyTemplateRegistry) -> CombatState {
        let hero = PlayerCharacter::new(
            Combatant::new("hero", "Hero", 5, Stats::new(120, 25, 10, 5, 5, 10), 10),
            vec![],
        );
        let boss = templates.get("warlock").map(|t| t.instantiate("warlock", 4)).expect("boss template");
        let mut state = CombatState::new(vec![hero], vec![], vec![boss]);
        state.turn_order.combatants = vec!["hero".to_string(), "warlock".to_string()];
        state
    }

    #[test]
    fn test_trigger_fires_once() {
        let mut summon = BossSummonState::new(SummonConfig {
            max_summons: 2,
            pool: vec![],
            triggers: vec![SummonTrigger::hp_threshold(50.0)],
        });
        assert!(summon.fire_triggers(80.0).is_empty());
        assert_eq!(summon.fire_triggers(40.0), vec![0]);
        // Oscillating back over and under the threshold does nothing
        assert!(summon.fire_triggers(90.0).is_empty());
        assert!(summon.fire_triggers(10.0).is_empty());
    }

    #[test]
    fn test_no_summon_above_threshold() {
        let templates = templates();
        let mut state = battle(&templates);
        let spawned = check_summon_triggers(&mut state, &templates, 2, &mut make_test_rng());
        assert!(spawned.is_empty());
        assert_eq!(state.enemy_team.len(), 1);
    }

    #[test]
    fn test_summon_spawns_and_rebuilds_order() {
        let templates = templates();
        let mut state = battle(&templates);
        let boss_max = state.enemy_team[0].combatant.stats.max_hp;
        state.enemy_team[0].combatant.stats.hp = boss_max / 2;

        let mut rng = make_test_rng();
        let spawned = check_summon_triggers(&mut state, &templates, 2, &mut rng);
        assert!((1..=2).contains(&spawned.len()));
        assert_eq!(state.enemy_team.len(), 1 + spawned.len());

        for id in &spawned {
            assert!(id.starts_with("warlock_summon_"));
            assert!(state.turn_order.combatants.contains(id));
            let minion = state.enemy_team.iter().find(|e| e.id() == id).expect("minion");
            assert!(minion.is_summoned);
            assert!((2..=4).contains(&minion.combatant.level));
        }

        let summon = state.enemy_team[0].summon.as_ref().expect("summon state");
        assert_eq!(summon.has_used_summon, vec![true, false]);
        assert_eq!(summon.current_summons, spawned);

        // Same hp again: the fired trigger stays spent
        let again = check_summon_triggers(&mut state, &templates, 2, &mut rng);
        assert!(again.is_empty());
    }

    #[test]
    fn test_capacity_caps_total_summons() {
        let templates = templates();
        let mut state = battle(&templates);
        state.enemy_team[0].combatant.stats.hp = 1;

        let mut rng = make_test_rng();
        check_summon_triggers(&mut state, &templates, 2, &mut rng);
        let summon = state.enemy_team[0].summon.as_ref().expect("summon state");
        assert!(summon.current_summons.len() <= 3);
        assert_eq!(summon.has_used_summon, vec![true, true]);
    }
}
