//! Combat engine - Phase lifecycle, turn sequencing and battle-end detection

use super::ability::{Ability, AbilityLookup};
use super::combatant::{CombatantRef, Enemy, PlayerCharacter};
use super::enemy_template::EnemyTemplateRegistry;
use super::log::{CombatLogEntry, LogKind};
use super::resolver::{self, ResolveContext};
use super::result::AbilityResult;
use super::rewards::{xp_for_enemy, NoRewards, RewardProvider};
use super::state::{CombatPhase, CombatState};
use super::turn_order;
use crate::config::{CombatConstants, GameData};
use crate::error::CombatError;
use crate::status::TickResult;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, info};

/// Drives battles held in a caller-owned [`CombatState`]
///
/// The engine owns the read-only templates, the tunable constants, the
/// reward collaborator and the random source. Identical seeds and inputs
/// reproduce identical battles.
pub struct CombatEngine<R = ChaCha8Rng> {
    abilities: Box<dyn AbilityLookup>,
    templates: EnemyTemplateRegistry,
    constants: CombatConstants,
    rewards: Box<dyn RewardProvider>,
    rng: R,
}

impl CombatEngine<ChaCha8Rng> {
    /// Engine with a seeded ChaCha RNG
    pub fn seeded(abilities: impl AbilityLookup + 'static, seed: u64) -> Self {
        CombatEngine::new(abilities, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> CombatEngine<R> {
    pub fn new(abilities: impl AbilityLookup + 'static, rng: R) -> Self {
        CombatEngine {
            abilities: Box::new(abilities),
            templates: EnemyTemplateRegistry::new(),
            constants: CombatConstants::default(),
            rewards: Box::new(NoRewards),
            rng,
        }
    }

    /// Engine over loaded game data
    pub fn from_game_data(data: GameData, rng: R) -> Self {
        CombatEngine {
            abilities: Box::new(data.abilities),
            templates: data.enemies,
            constants: data.constants,
            rewards: Box::new(NoRewards),
            rng,
        }
    }

    pub fn with_templates(mut self, templates: EnemyTemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_constants(mut self, constants: CombatConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_rewards(mut self, rewards: impl RewardProvider + 'static) -> Self {
        self.rewards = Box::new(rewards);
        self
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn templates(&self) -> &EnemyTemplateRegistry {
        &self.templates
    }

    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.get_ability(id)
    }

    // === Setup ===

    /// Create a battle in the setup phase
    ///
    /// Every combatant has its stats refreshed and starts with the configured
    /// starting AP.
    pub fn initialize_combat(
        &self,
        active: Vec<PlayerCharacter>,
        reserve: Vec<PlayerCharacter>,
        enemies: Vec<Enemy>,
    ) -> CombatState {
        let starting_ap = self.constants.action_points.starting_ap;
        let mut state = CombatState::new(active, reserve, enemies);

        let units = state
            .player_team
            .iter_mut()
            .chain(state.reserve_team.iter_mut())
            .map(|p| &mut p.combatant)
            .chain(state.enemy_team.iter_mut().map(|e| &mut e.combatant));
        for unit in units {
            unit.refresh_stats();
            unit.current_ap = starting_ap.clamp(0, unit.max_ap.max(0));
        }

        debug!(
            players = state.player_team.len(),
            reserves = state.reserve_team.len(),
            enemies = state.enemy_team.len(),
            "combat initialized"
        );
        state
    }

    /// Move from setup to active and begin the first turn
    pub fn start_combat(&mut self, state: &mut CombatState) -> Result<(), CombatError> {
        if state.phase != CombatPhase::Setup {
            return Err(CombatError::AlreadyStarted(state.phase));
        }

        state.phase = CombatPhase::Active;
        state.round_number = 1;
        state.current_turn = 1;
        state.turn_order.combatants = turn_order::build(state, &mut self.rng);
        state.turn_order.current_index = 0;

        state.log(LogKind::CombatStart, "Combat begins");
        state.log(LogKind::RoundStart, "Round 1");
        info!(order = ?state.turn_order.combatants, "combat started");

        if self.check_battle_end(state) {
            return Ok(());
        }
        self.advance_until_actionable(state);
        Ok(())
    }

    /// Lock the order player characters act in, once per battle
    ///
    /// `ids` must name every active player character exactly once.
    pub fn set_player_turn_order(&mut self, state: &mut CombatState, ids: &[&str]) -> Result<(), CombatError> {
        if state.turn_order_locked {
            return Err(CombatError::TurnOrderLocked);
        }

        let mut seen = HashSet::new();
        for id in ids {
            if !state.player_team.iter().any(|p| p.id() == *id) {
                return Err(CombatError::UnknownCombatant(id.to_string()));
            }
            if !seen.insert(*id) {
                return Err(CombatError::DuplicateCombatant(id.to_string()));
            }
        }
        if ids.len() != state.player_team.len() {
            return Err(CombatError::IncompleteTurnOrder {
                expected: state.player_team.len(),
                got: ids.len(),
            });
        }

        state.player_turn_order = ids.iter().map(|id| id.to_string()).collect();
        state.turn_order_locked = true;
        if state.phase == CombatPhase::Active {
            turn_order::rebuild(state, &mut self.rng);
        }
        debug!(order = ?state.player_turn_order, "player turn order locked");
        Ok(())
    }

    // === Actions ===

    /// Use an ability as the current combatant
    ///
    /// `None` means the action was not possible and nothing changed, except
    /// for an ability with no valid targets, which still costs its AP.
    pub fn execute_ability(
        &mut self,
        state: &mut CombatState,
        ability_id: &str,
        target_ids: &[&str],
    ) -> Option<AbilityResult> {
        let ctx = ResolveContext {
            abilities: self.abilities.as_ref(),
            templates: &self.templates,
            constants: &self.constants,
        };
        resolver::execute_ability(state, ability_id, target_ids, &ctx, &mut self.rng)
    }

    /// Abilities the current combatant has equipped and can afford
    pub fn affordable_abilities(&self, state: &CombatState) -> Vec<&Ability> {
        let Some(actor) = state.current_combatant() else {
            return Vec::new();
        };
        let ap = actor.combatant().current_ap;
        actor
            .ability_ids()
            .iter()
            .filter_map(|id| self.abilities.get_ability(id))
            .filter(|a| a.ap_cost <= ap)
            .collect()
    }

    /// Finish the current combatant's turn and start the next actionable one
    pub fn end_turn(&mut self, state: &mut CombatState) -> Result<(), CombatError> {
        if state.phase != CombatPhase::Active {
            return Err(CombatError::NotActive(state.phase));
        }
        self.close_turn(state);
        self.advance_until_actionable(state);
        Ok(())
    }

    // === Team wipe ===

    /// Field the living reserves after a team wipe
    pub fn swap_reserve_team(&mut self, state: &mut CombatState) -> Result<(), CombatError> {
        if state.phase != CombatPhase::TeamWipe {
            return Err(CombatError::NotInTeamWipe(state.phase));
        }

        let reserves = std::mem::take(&mut state.reserve_team);
        state.player_team = reserves.into_iter().filter(|p| p.is_alive()).collect();
        state.phase = CombatPhase::Active;

        let names: Vec<&str> = state.player_team.iter().map(|p| p.combatant.name.as_str()).collect();
        let message = format!("Reserves take the field: {}", names.join(", "));
        state.log(LogKind::ReserveSwap, message);
        info!(players = state.player_team.len(), "reserve team swapped in");

        state.turn_order.combatants = turn_order::build(state, &mut self.rng);
        state.turn_order.current_index = 0;
        state.current_turn += 1;
        self.advance_until_actionable(state);
        Ok(())
    }

    /// Give up after a team wipe
    pub fn accept_defeat(&mut self, state: &mut CombatState) -> Result<(), CombatError> {
        if state.phase != CombatPhase::TeamWipe {
            return Err(CombatError::NotInTeamWipe(state.phase));
        }
        state.phase = CombatPhase::Defeat;
        state.victory = false;
        state.log(LogKind::Defeat, "The party accepts defeat");
        info!("defeat accepted");
        Ok(())
    }

    // === Queries ===

    pub fn current_combatant<'a>(&self, state: &'a CombatState) -> Option<CombatantRef<'a>> {
        state.current_combatant()
    }

    pub fn recent_log<'a>(&self, state: &'a CombatState, n: usize) -> &'a [CombatLogEntry] {
        state.recent_log(n)
    }

    // === Turn sequencing ===

    /// Start turns until one is actionable or the battle leaves the active phase
    fn advance_until_actionable(&mut self, state: &mut CombatState) {
        while state.phase == CombatPhase::Active {
            if self.begin_turn(state) {
                return;
            }
            self.close_turn(state);
        }
    }

    /// Start-of-turn hook. Returns false if the turn ends immediately.
    fn begin_turn(&mut self, state: &mut CombatState) -> bool {
        let Some(actor_id) = state.turn_order.current().map(str::to_string) else {
            return true;
        };
        let regen = self.constants.action_points.regen_per_turn;

        let Some(unit) = state.unit_mut(&actor_id) else {
            return true;
        };
        let name = unit.name.clone();
        let gained = unit.gain_ap(regen);
        let tick = unit.status_tick(true);

        state
            .log(LogKind::TurnStart, format!("{}'s turn", name))
            .actor(&actor_id)
            .value(gained);

        if !apply_tick(state, &actor_id, tick) {
            debug!(actor = %actor_id, "killed by start-of-turn effects");
            return false;
        }

        if state.unit(&actor_id).is_some_and(|u| u.is_controlled()) {
            state
                .log(LogKind::TurnSkipped, format!("{} cannot act", name))
                .actor(&actor_id);
            debug!(actor = %actor_id, "turn skipped by control effect");
            return false;
        }

        debug!(actor = %actor_id, round = state.round_number, turn = state.current_turn, "turn started");
        true
    }

    /// End-of-turn hook, queue advance, pruning and the battle-end check
    fn close_turn(&mut self, state: &mut CombatState) {
        if let Some(actor_id) = state.turn_order.current().map(str::to_string) {
            let tick = state
                .unit(&actor_id)
                .filter(|u| u.is_alive())
                .map(|u| u.status_tick(false))
                .unwrap_or_default();
            apply_tick(state, &actor_id, tick);

            let (name, expired) = state
                .unit_mut(&actor_id)
                .map(|u| (u.name.clone(), u.expire_statuses()))
                .unwrap_or_default();
            for effect in expired {
                state
                    .log(LogKind::StatusExpired, format!("{}'s {} wears off", name, effect.name))
                    .target(&actor_id);
            }
        }

        let order = &mut state.turn_order;
        order.current_index += 1;
        if order.current_index >= order.len() {
            order.current_index = 0;
            start_round(state);
        }

        let removed = turn_order::prune_dead(state);
        if !removed.is_empty() {
            debug!(removed = ?removed, "pruned dead from turn order");
        }
        if !state.turn_order.is_empty() && state.turn_order.current_index >= state.turn_order.len() {
            state.turn_order.current_index = 0;
            start_round(state);
        }

        state.current_turn += 1;
        self.check_battle_end(state);
    }

    /// Move to victory, team wipe or defeat if the battle is decided
    fn check_battle_end(&mut self, state: &mut CombatState) -> bool {
        if state.phase != CombatPhase::Active {
            return false;
        }

        if state.all_enemies_dead() {
            self.finish_victory(state);
            return true;
        }

        if state.all_players_dead() {
            if state.any_reserve_alive() {
                state.phase = CombatPhase::TeamWipe;
                state.log(LogKind::TeamWipe, "The active team has fallen; reserves stand ready");
                info!("team wipe");
            } else {
                state.phase = CombatPhase::Defeat;
                state.victory = false;
                state.log(LogKind::Defeat, "The party has been defeated");
                info!("defeat");
            }
            return true;
        }
        false
    }

    fn finish_victory(&mut self, state: &mut CombatState) {
        state.phase = CombatPhase::Victory;
        state.victory = true;

        let reward_constants = &self.constants.rewards;
        let xp: u64 = state
            .enemy_team
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| xp_for_enemy(e, reward_constants))
            .sum();
        state.xp_earned = xp;

        let mut level_ups = Vec::new();
        for member in state.roster_mut() {
            let levels = self.rewards.award_xp(member, xp);
            level_ups.push((member.id().to_string(), levels));
        }

        let mut drops = Vec::new();
        for enemy in state.enemy_team.iter().filter(|e| !e.is_alive()) {
            if self.rewards.roll_equipment_drop(enemy) {
                let item = self.rewards.generate_equipment(enemy.combatant.level);
                drops.push((enemy.id().to_string(), item));
            }
        }

        state.log(LogKind::Victory, "Victory!").value(xp as i64);
        for (id, levels) in level_ups {
            let entry = state.log(LogKind::Reward, format!("{} gains {} xp", id, xp));
            entry.target(&id).value(xp as i64);
            if levels > 0 {
                state
                    .log(LogKind::Reward, format!("{} gains {} level(s)", id, levels))
                    .target(&id)
                    .value(levels);
            }
        }
        for (enemy_id, item) in drops {
            state
                .log(LogKind::Reward, format!("{} dropped {}", enemy_id, item.name))
                .actor(&enemy_id);
            state.loot_dropped.push(item);
        }
        info!(xp, loot = state.loot_dropped.len(), "victory");
    }
}

fn start_round(state: &mut CombatState) {
    state.round_number += 1;
    let round = state.round_number;
    state.log(LogKind::RoundStart, format!("Round {}", round));
}

/// Apply tick damage then healing to a combatant. Returns whether it survived.
fn apply_tick(state: &mut CombatState, id: &str, tick: TickResult) -> bool {
    let Some(unit) = state.unit_mut(id) else {
        return false;
    };
    if !unit.is_alive() {
        return false;
    }

    if tick.damage > 0 {
        let lost = unit.take_damage(tick.damage);
        let alive = unit.is_alive();
        state
            .log(LogKind::StatusTick, format!("{} takes {} damage from effects", id, lost))
            .target(id)
            .value(lost);
        if !alive {
            state.log(LogKind::Death, format!("{} succumbs", id)).target(id);
            return false;
        }
    }

    if tick.healing > 0 {
        let Some(unit) = state.unit_mut(id) else {
            return false;
        };
        let healed = unit.heal(tick.healing);
        state
            .log(LogKind::StatusTick, format!("{} recovers {} hp from effects", id, healed.applied))
            .target(id)
            .value(healed.applied);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability::AbilityRegistry;
    use crate::combat::combatant::Combatant;
    use crate::stat_block::Stats;
    use crate::status::StatusEffectInstance;
    use crate::types::{DamageType, EffectKind, TargetType};

    fn abilities() -> AbilityRegistry {
        vec![
            Ability::new("strike", "Strike", 2, TargetType::SingleEnemy)
                .with_damage(DamageType::True, 1.0)
                .always_hits(),
            Ability::new("stun", "Stun", 1, TargetType::SingleEnemy).with_status(
                StatusEffectInstance::new("stun", "Stun", EffectKind::Control, 1).preventing_actions(),
                100,
            ),
        ]
        .into_iter()
        .collect()
    }

    fn hero(id: &str, atk: i32, spd: i32) -> PlayerCharacter {
        PlayerCharacter::new(
            Combatant::new(id, id, 1, Stats::new(100, atk, 5, 5, 5, spd).with_precision(0, 0, 95), 10),
            vec!["strike".to_string(), "stun".to_string()],
        )
    }

    fn goblin(id: &str, hp: i32, spd: i32) -> Enemy {
        Enemy::new(
            Combatant::new(id, "Goblin", 2, Stats::new(hp, 10, 0, 0, 0, spd).with_precision(0, 0, 95), 10),
            vec!["strike".to_string()],
        )
    }

    fn engine() -> CombatEngine {
        CombatEngine::seeded(abilities(), 42)
    }

    #[test]
    fn test_start_combat_once() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(vec![hero("hero", 30, 10)], vec![], vec![goblin("g", 50, 5)]);

        engine.start_combat(&mut state).expect("first start");
        assert_eq!(state.phase, CombatPhase::Active);
        assert_eq!(state.round_number, 1);
        assert_eq!(engine.current_combatant(&state).map(|c| c.id()), Some("hero"));
        // starting 2 + regen 2
        assert_eq!(state.unit("hero").map(|u| u.current_ap), Some(4));

        assert_eq!(
            engine.start_combat(&mut state),
            Err(CombatError::AlreadyStarted(CombatPhase::Active))
        );
    }

    #[test]
    fn test_end_turn_advances_and_wraps_round() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(vec![hero("hero", 30, 10)], vec![], vec![goblin("g", 500, 5)]);
        engine.start_combat(&mut state).expect("start");

        engine.end_turn(&mut state).expect("hero ends");
        assert_eq!(engine.current_combatant(&state).map(|c| c.id()), Some("g"));
        assert_eq!(state.round_number, 1);

        engine.end_turn(&mut state).expect("goblin ends");
        assert_eq!(engine.current_combatant(&state).map(|c| c.id()), Some("hero"));
        assert_eq!(state.round_number, 2);
        assert_eq!(state.current_turn, 3);
    }

    #[test]
    fn test_end_turn_outside_active() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(vec![hero("hero", 30, 10)], vec![], vec![goblin("g", 50, 5)]);
        assert_eq!(engine.end_turn(&mut state), Err(CombatError::NotActive(CombatPhase::Setup)));
    }

    #[test]
    fn test_stunned_enemy_loses_turn() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(vec![hero("hero", 30, 10)], vec![], vec![goblin("g", 500, 5)]);
        engine.start_combat(&mut state).expect("start");

        engine.execute_ability(&mut state, "stun", &["g"]).expect("stun resolves");
        engine.end_turn(&mut state).expect("hero ends");

        // Goblin's turn was skipped, the stun expired with it
        assert_eq!(engine.current_combatant(&state).map(|c| c.id()), Some("hero"));
        assert!(state.combat_log.iter().any(|e| e.kind == LogKind::TurnSkipped));
        assert!(state.unit("g").is_some_and(|u| u.status_effects.is_empty()));

        let expired = state
            .combat_log
            .iter()
            .find(|e| e.kind == LogKind::StatusExpired)
            .expect("expiry logged");
        assert_eq!(expired.message, "Goblin's Stun wears off");
        assert_eq!(expired.target_id.as_deref(), Some("g"));
    }

    #[test]
    fn test_victory_awards_xp_to_roster() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(
            vec![hero("hero", 100, 10)],
            vec![hero("bench", 10, 1)],
            vec![goblin("g", 50, 5)],
        );
        engine.start_combat(&mut state).expect("start");

        let result = engine.execute_ability(&mut state, "strike", &["g"]).expect("strike");
        assert_eq!(result.deaths, vec!["g"]);
        engine.end_turn(&mut state).expect("end");

        assert_eq!(state.phase, CombatPhase::Victory);
        assert!(state.victory);
        // level 2 goblin: 2² × 10
        assert_eq!(state.xp_earned, 40);
        assert_eq!(state.player_team[0].xp, 40);
        assert_eq!(state.reserve_team[0].xp, 40);
        assert!(engine.end_turn(&mut state).is_err());
    }

    #[test]
    fn test_turn_order_lock_validation() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(
            vec![hero("a", 10, 10), hero("b", 10, 20)],
            vec![],
            vec![goblin("g", 50, 5)],
        );

        assert_eq!(
            engine.set_player_turn_order(&mut state, &["a", "zed"]),
            Err(CombatError::UnknownCombatant("zed".to_string()))
        );
        assert_eq!(
            engine.set_player_turn_order(&mut state, &["a", "a"]),
            Err(CombatError::DuplicateCombatant("a".to_string()))
        );
        assert_eq!(
            engine.set_player_turn_order(&mut state, &["a"]),
            Err(CombatError::IncompleteTurnOrder { expected: 2, got: 1 })
        );

        engine.set_player_turn_order(&mut state, &["a", "b"]).expect("valid order");
        assert_eq!(
            engine.set_player_turn_order(&mut state, &["b", "a"]),
            Err(CombatError::TurnOrderLocked)
        );

        engine.start_combat(&mut state).expect("start");
        assert_eq!(state.turn_order.combatants, vec!["a", "b", "g"]);
    }

    #[test]
    fn test_affordable_abilities() {
        let mut engine = engine();
        let mut state = engine.initialize_combat(vec![hero("hero", 30, 10)], vec![], vec![goblin("g", 50, 5)]);
        engine.start_combat(&mut state).expect("start");

        assert_eq!(engine.affordable_abilities(&state).len(), 2);
        if let Some(hero) = state.unit_mut("hero") {
            hero.current_ap = 1;
        }
        let ids: Vec<&str> = engine.affordable_abilities(&state).into_iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["stun"]);
    }
}
