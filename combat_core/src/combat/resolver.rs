//! Ability resolution - One ability use from AP cost to AP drain

use super::ability::AbilityLookup;
use super::enemy_template::EnemyTemplateRegistry;
use super::log::LogKind;
use super::result::{AbilityResult, ApDrain, StatusApplication};
use super::state::{CombatPhase, CombatState};
use super::summon;
use crate::config::CombatConstants;
use crate::damage::{
    calculate_damage, calculate_healing, lifesteal_amount, roll_variance, DamageResult, DamageRolls,
};
use crate::types::{Side, TargetType};
use rand::Rng;
use tracing::debug;

/// Read-only collaborators an ability needs while resolving
pub struct ResolveContext<'a> {
    pub abilities: &'a dyn AbilityLookup,
    pub templates: &'a EnemyTemplateRegistry,
    pub constants: &'a CombatConstants,
}

/// Resolve the ids an ability will affect
///
/// Relative to the actor's side, dead combatants excluded. Single-target
/// abilities take the first requested id that is a living combatant on the
/// right side.
pub fn resolve_targets(
    state: &CombatState,
    actor_id: &str,
    actor_side: Side,
    target_type: TargetType,
    requested: &[&str],
) -> Vec<String> {
    let first_living_on = |side: Side| -> Vec<String> {
        requested
            .iter()
            .find(|id| state.side_of(id) == Some(side) && state.is_alive(id))
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    };

    match target_type {
        TargetType::SelfOnly => {
            if state.is_alive(actor_id) {
                vec![actor_id.to_string()]
            } else {
                Vec::new()
            }
        }
        TargetType::SingleAlly => first_living_on(actor_side),
        TargetType::SingleEnemy => first_living_on(actor_side.opposite()),
        TargetType::AllAllies | TargetType::AoeAllies => state.living_ids(actor_side),
        TargetType::AllEnemies | TargetType::AoeEnemies => state.living_ids(actor_side.opposite()),
    }
}

/// Execute an ability for the combatant whose turn it is
///
/// Returns `None` without touching the state when the action is not
/// possible: wrong phase, unknown or unequipped ability, or not enough AP.
/// An ability with no valid targets still spends its AP and returns an
/// empty result.
pub fn execute_ability<R: Rng>(
    state: &mut CombatState,
    ability_id: &str,
    target_ids: &[&str],
    ctx: &ResolveContext<'_>,
    rng: &mut R,
) -> Option<AbilityResult> {
    if state.phase != CombatPhase::Active {
        debug!(ability = ability_id, phase = ?state.phase, "ability rejected outside active phase");
        return None;
    }

    let actor = state.current_combatant()?;
    let actor_id = actor.id().to_string();
    let actor_side = actor.side();
    if !actor.is_alive() || !actor.ability_ids().iter().any(|a| a == ability_id) {
        debug!(actor = %actor_id, ability = ability_id, "ability not usable by actor");
        return None;
    }

    // Step 1: Look up the ability
    let Some(ability) = ctx.abilities.get_ability(ability_id).cloned() else {
        debug!(ability = ability_id, "unknown ability");
        return None;
    };

    // Step 2: Check AP
    let current_ap = actor.combatant().current_ap;
    if current_ap < ability.ap_cost {
        debug!(
            actor = %actor_id,
            ability = ability_id,
            current_ap,
            cost = ability.ap_cost,
            "insufficient AP"
        );
        return None;
    }

    // Step 3: Spend AP
    let actor_unit = state.unit_mut(&actor_id)?;
    actor_unit.spend_ap(ability.ap_cost);
    let attacker = actor_unit.stats;

    let mut result = AbilityResult::new(&actor_id, &ability.id, ability.ap_cost);
    state
        .log(LogKind::AbilityUsed, format!("{} uses {}", actor_id, ability.name))
        .actor(&actor_id)
        .value(ability.ap_cost);

    // Step 4: Resolve targets
    result.targets = resolve_targets(state, &actor_id, actor_side, ability.target_type, target_ids);
    if result.targets.is_empty() {
        state
            .log(LogKind::NoTargets, format!("{} has no valid targets", ability.name))
            .actor(&actor_id);
        return Some(result);
    }

    let effects = &ability.effects;

    // Step 5: Damage, then summon checks, then lifesteal
    if effects.has_damage() {
        let input = effects.damage_input();
        let rolls = DamageRolls {
            guaranteed_hit: ability.guaranteed_hit,
            force_crit: None,
        };
        let mut enemies_damaged = false;

        for target_id in &result.targets {
            let Some(defender) = state.unit(target_id).map(|u| u.stats) else {
                continue;
            };
            if !defender.is_alive() {
                continue;
            }

            let outcome = calculate_damage(&attacker, &defender, &input, rolls, &ctx.constants.damage, rng);
            let Some(unit) = state.unit_mut(target_id) else {
                continue;
            };
            let hp_before = unit.stats.hp;
            if !outcome.is_miss {
                unit.take_damage(outcome.amount);
            }
            let hp_after = unit.stats.hp;

            let damage = DamageResult {
                target_id: target_id.clone(),
                damage_type: input.damage_type,
                amount: outcome.amount,
                is_critical: outcome.is_critical,
                is_miss: outcome.is_miss,
                hp_before,
                hp_after,
                is_killing_blow: hp_before > 0 && hp_after == 0,
            };

            let kind = if damage.is_miss { LogKind::Miss } else { LogKind::Damage };
            state
                .log(kind, format!("{} {}", actor_id, damage.summary()))
                .actor(&actor_id)
                .target(target_id)
                .value(damage.amount);

            if damage.is_killing_blow {
                state
                    .log(LogKind::Death, format!("{} is defeated", target_id))
                    .actor(&actor_id)
                    .target(target_id);
                result.deaths.push(target_id.clone());
            }
            if !damage.is_miss && state.side_of(target_id) == Some(Side::Enemy) {
                enemies_damaged = true;
            }
            result.damage.push(damage);
        }

        if enemies_damaged {
            result.summoned = summon::check_summon_triggers(
                state,
                ctx.templates,
                ctx.constants.action_points.starting_ap,
                rng,
            );
        }

        let stolen = lifesteal_amount(result.total_damage(), effects.lifesteal);
        if stolen > 0 {
            if let Some(unit) = state.unit_mut(&actor_id).filter(|u| u.is_alive()) {
                let healed = unit.heal(stolen);
                state
                    .log(LogKind::Lifesteal, format!("{} drains {} hp", actor_id, healed.applied))
                    .actor(&actor_id)
                    .value(healed.applied);
                result.lifesteal = Some(healed);
            }
        }
    }

    // Step 6: Healing
    if effects.has_healing() {
        for target_id in &result.targets {
            let variance = roll_variance(&ctx.constants.damage, rng);
            let requested = calculate_healing(&attacker, effects.healing_multiplier, effects.flat_healing, variance);
            let Some(unit) = state.unit_mut(target_id).filter(|u| u.is_alive()) else {
                continue;
            };
            let healed = unit.heal(requested);
            state
                .log(LogKind::Healing, healed.summary())
                .actor(&actor_id)
                .target(target_id)
                .value(healed.applied);
            result.healing.push(healed);
        }
    }

    // Step 7: Status effects, one roll per entry for all targets
    for entry in &effects.status_effects {
        let roll: u32 = rng.gen_range(1..=100);
        if roll > entry.chance {
            state
                .log(LogKind::StatusResisted, format!("{} did not take hold", entry.effect.name))
                .actor(&actor_id);
            result.statuses_resisted.push(entry.effect.id.clone());
            continue;
        }

        for target_id in &result.targets {
            let Some(unit) = state.unit_mut(target_id).filter(|u| u.is_alive()) else {
                continue;
            };
            let outcome = unit.apply_status(&entry.effect);
            state
                .log(LogKind::StatusApplied, format!("{} gains {}", target_id, entry.effect.name))
                .actor(&actor_id)
                .target(target_id);
            result.statuses_applied.push(StatusApplication {
                target_id: target_id.clone(),
                effect_id: entry.effect.id.clone(),
                outcome,
            });
        }
    }

    // Step 8: AP restore and drain
    if effects.ap_restore > 0 {
        if let Some(unit) = state.unit_mut(&actor_id) {
            result.ap_restored = unit.gain_ap(effects.ap_restore);
            state
                .log(LogKind::ApRestore, format!("{} restores {} AP", actor_id, result.ap_restored))
                .actor(&actor_id)
                .value(result.ap_restored);
        }
    }
    if effects.ap_drain > 0 {
        for target_id in &result.targets {
            let Some(unit) = state.unit_mut(target_id).filter(|u| u.is_alive()) else {
                continue;
            };
            let amount = unit.lose_ap(effects.ap_drain);
            state
                .log(LogKind::ApDrain, format!("{} loses {} AP", target_id, amount))
                .actor(&actor_id)
                .target(target_id)
                .value(amount);
            result.ap_drained.push(ApDrain {
                target_id: target_id.clone(),
                amount,
            });
        }
    }

    debug!(
        actor = %actor_id,
        ability = %ability.id,
        targets = result.targets.len(),
        damage = result.total_damage(),
        "ability resolved"
    );
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability::{Ability, AbilityRegistry};
    use crate::combat::combatant::{Combatant, Enemy, PlayerCharacter};
    use crate::stat_block::Stats;
    use crate::status::{ApplyOutcome, StatusEffectInstance};
    use crate::types::{DamageType, EffectKind};
    use rand::SeedableRng;

    fn make_test_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(12345)
    }

    fn abilities() -> AbilityRegistry {
        let poison = StatusEffectInstance::new("poison", "Poison", EffectKind::Dot, 3)
            .with_damage_per_turn(10)
            .with_stacking(3)
            .ticking_at_turn_start();
        vec![
            Ability::new("strike", "Strike", 2, TargetType::SingleEnemy)
                .with_damage(DamageType::Physical, 1.2)
                .always_hits(),
            Ability::new("drain", "Drain", 1, TargetType::SingleEnemy)
                .with_damage(DamageType::True, 1.0)
                .with_lifesteal(50.0)
                .always_hits(),
            Ability::new("mend", "Mend", 1, TargetType::AllAllies).with_healing(1.0, 10.0),
            Ability::new("venom", "Venom", 1, TargetType::AllEnemies).with_status(poison, 100),
            Ability::new("siphon", "Siphon", 0, TargetType::SingleEnemy).with_ap(2, 3),
            Ability::new("hex", "Hex", 0, TargetType::AllEnemies).with_status(
                StatusEffectInstance::new("hex", "Hex", EffectKind::Debuff, 2),
                50,
            ),
        ]
        .into_iter()
        .collect()
    }

    fn state() -> CombatState {
        let mut hero = PlayerCharacter::new(
            Combatant::new("hero", "Hero", 3, Stats::new(100, 50, 10, 20, 10, 12).with_precision(0, 0, 95), 10),
            vec!["strike", "drain", "mend", "venom", "siphon", "hex"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        hero.combatant.current_ap = 4;
        let mut cleric = PlayerCharacter::new(
            Combatant::new("cleric", "Cleric", 3, Stats::new(80, 10, 10, 20, 10, 8), 10),
            vec![],
        );
        cleric.combatant.take_damage(30);

        let goblin = |id: &str| {
            let mut e = Enemy::new(
                Combatant::new(id, "Goblin", 2, Stats::new(200, 10, 20, 0, 5, 6).with_precision(0, 0, 95), 10),
                vec![],
            );
            e.combatant.current_ap = 5;
            e
        };

        let mut state = CombatState::new(vec![hero, cleric], vec![], vec![goblin("g1"), goblin("g2")]);
        state.phase = CombatPhase::Active;
        state.turn_order.combatants = ["hero", "g1", "cleric", "g2"].iter().map(|s| s.to_string()).collect();
        state
    }

    fn run(state: &mut CombatState, ability: &str, targets: &[&str]) -> Option<AbilityResult> {
        run_with(state, ability, targets, &mut make_test_rng())
    }

    fn run_with(
        state: &mut CombatState,
        ability: &str,
        targets: &[&str],
        rng: &mut rand::rngs::StdRng,
    ) -> Option<AbilityResult> {
        let abilities = abilities();
        let templates = EnemyTemplateRegistry::new();
        let constants = CombatConstants::default();
        let ctx = ResolveContext {
            abilities: &abilities,
            templates: &templates,
            constants: &constants,
        };
        execute_ability(state, ability, targets, &ctx, rng)
    }

    #[test]
    fn test_strike_deals_damage_and_spends_ap() {
        let mut state = state();
        let result = run(&mut state, "strike", &["g1"]).expect("strike resolves");

        // floor(50 * 1.2 - 20 * 0.5) = 50
        assert_eq!(result.total_damage(), 50);
        assert_eq!(state.unit("g1").map(|u| u.stats.hp), Some(150));
        assert_eq!(state.unit("hero").map(|u| u.current_ap), Some(2));
    }

    #[test]
    fn test_insufficient_ap_is_a_no_op() {
        let mut state = state();
        if let Some(hero) = state.unit_mut("hero") {
            hero.current_ap = 0;
        }
        let before = state.clone();

        assert!(run(&mut state, "strike", &["g1"]).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_unknown_or_unequipped_ability() {
        let mut state = state();
        let before = state.clone();
        assert!(run(&mut state, "meteor", &["g1"]).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_no_valid_targets_still_spends_ap() {
        let mut state = state();
        let result = run(&mut state, "strike", &["cleric", "nobody"]).expect("strike resolves");

        assert!(result.had_no_targets());
        assert_eq!(state.unit("hero").map(|u| u.current_ap), Some(2));
        assert_eq!(state.combat_log.last().map(|e| e.kind), Some(LogKind::NoTargets));
    }

    #[test]
    fn test_single_target_takes_first_valid() {
        let mut state = state();
        let result = run(&mut state, "strike", &["cleric", "g2", "g1"]).expect("strike resolves");
        assert_eq!(result.targets, vec!["g2"]);
    }

    #[test]
    fn test_lifesteal_heals_actor() {
        let mut state = state();
        if let Some(hero) = state.unit_mut("hero") {
            hero.take_damage(40);
        }
        let result = run(&mut state, "drain", &["g1"]).expect("drain resolves");

        // True damage: 50, half returned
        assert_eq!(result.total_damage(), 50);
        assert_eq!(result.lifesteal.as_ref().map(|h| h.applied), Some(25));
        assert_eq!(state.unit("hero").map(|u| u.stats.hp), Some(85));
    }

    #[test]
    fn test_lifesteal_respects_overheal_cap() {
        let mut state = state();
        if let Some(hero) = state.unit_mut("hero") {
            hero.take_damage(5);
        }
        let result = run(&mut state, "drain", &["g1"]).expect("drain resolves");
        let lifesteal = result.lifesteal.expect("lifesteal");
        assert_eq!(lifesteal.applied, 5);
        assert_eq!(lifesteal.overheal, 20);
        assert_eq!(state.unit("hero").map(|u| u.stats.hp), Some(100));
    }

    #[test]
    fn test_group_heal_with_overheal() {
        let mut state = state();
        let result = run(&mut state, "mend", &[]).expect("mend resolves");

        // 20 * 1.0 + 10 = 30 each; hero is full, cleric missing 30
        assert_eq!(result.healing.len(), 2);
        let hero = &result.healing[0];
        assert_eq!((hero.applied, hero.overheal), (0, 30));
        let cleric = &result.healing[1];
        assert_eq!((cleric.applied, cleric.overheal), (30, 0));
    }

    #[test]
    fn test_status_applies_to_every_target() {
        let mut state = state();
        let result = run(&mut state, "venom", &[]).expect("venom resolves");

        assert_eq!(result.statuses_applied.len(), 2);
        assert!(result.statuses_applied.iter().all(|s| s.outcome == ApplyOutcome::Applied));
        for id in ["g1", "g2"] {
            let unit = state.unit(id).expect("goblin");
            assert_eq!(unit.status_effects.len(), 1);
        }
    }

    #[test]
    fn test_one_status_roll_covers_all_targets() {
        let mut landed = 0;
        let mut resisted = 0;

        for seed in 0..40 {
            let mut state = state();
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let result = run_with(&mut state, "hex", &[], &mut rng).expect("hex resolves");
            assert_eq!(result.targets.len(), 2);

            let hexed = ["g1", "g2"]
                .iter()
                .filter(|id| state.unit(id).is_some_and(|u| !u.status_effects.is_empty()))
                .count();
            match hexed {
                2 => {
                    assert_eq!(result.statuses_applied.len(), 2);
                    assert!(result.statuses_resisted.is_empty());
                    landed += 1;
                }
                0 => {
                    assert!(result.statuses_applied.is_empty());
                    assert_eq!(result.statuses_resisted, vec!["hex"]);
                    resisted += 1;
                }
                _ => panic!("seed {}: hex landed on only some targets", seed),
            }
        }

        // Both branches show up at 50%
        assert!(landed > 0);
        assert!(resisted > 0);
    }

    #[test]
    fn test_ap_restore_and_drain() {
        let mut state = state();
        let result = run(&mut state, "siphon", &["g1"]).expect("siphon resolves");

        assert_eq!(result.ap_restored, 2);
        assert_eq!(result.ap_drained, vec![ApDrain { target_id: "g1".to_string(), amount: 3 }]);
        assert_eq!(state.unit("hero").map(|u| u.current_ap), Some(6));
        assert_eq!(state.unit("g1").map(|u| u.current_ap), Some(2));
    }

    #[test]
    fn test_rejected_outside_active_phase() {
        let mut state = state();
        state.phase = CombatPhase::TeamWipe;
        assert!(run(&mut state, "strike", &["g1"]).is_none());
    }

    #[test]
    fn test_killing_blow_recorded() {
        let mut state = state();
        if let Some(g1) = state.unit_mut("g1") {
            g1.take_damage(190);
        }
        let result = run(&mut state, "strike", &["g1"]).expect("strike resolves");
        assert_eq!(result.deaths, vec!["g1"]);
        assert!(result.damage[0].is_killing_blow);
        assert!(state.combat_log.iter().any(|e| e.kind == LogKind::Death));
    }
}
