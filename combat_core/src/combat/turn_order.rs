//! Turn order - Speed-sorted initiative over both teams

use super::state::CombatState;
use crate::types::Side;
use rand::seq::SliceRandom;
use rand::Rng;

struct Entry {
    id: String,
    side: Side,
    spd: i32,
}

/// Build the initiative queue from every living fielded combatant
///
/// Sorted by descending current speed. Ties are broken randomly by shuffling
/// before a stable sort. With a locked player order, the player slots of the
/// queue are refilled in the locked order.
pub fn build<R: Rng>(state: &CombatState, rng: &mut R) -> Vec<String> {
    let mut entries: Vec<Entry> = state
        .player_team
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| Entry {
            id: p.id().to_string(),
            side: Side::Player,
            spd: p.combatant.stats.spd,
        })
        .chain(state.enemy_team.iter().filter(|e| e.is_alive()).map(|e| Entry {
            id: e.id().to_string(),
            side: Side::Enemy,
            spd: e.combatant.stats.spd,
        }))
        .collect();

    entries.shuffle(rng);
    entries.sort_by(|a, b| b.spd.cmp(&a.spd));

    let mut order: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
    if state.turn_order_locked {
        apply_player_lock(&mut order, &entries, &state.player_turn_order);
    }
    order
}

fn apply_player_lock(order: &mut [String], entries: &[Entry], locked: &[String]) {
    let slots: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.side == Side::Player)
        .map(|(i, _)| i)
        .collect();
    let living: Vec<&String> = slots.iter().map(|&i| &entries[i].id).collect();

    // Locked ids first, then any living player the lock does not name
    let mut fill: Vec<String> = locked.iter().filter(|id| living.contains(id)).cloned().collect();
    for id in living {
        if !fill.contains(id) {
            fill.push(id.clone());
        }
    }

    for (slot, id) in slots.into_iter().zip(fill) {
        order[slot] = id;
    }
}

/// Rebuild the whole queue after a roster change
///
/// Ties may come out in a different order than before. The acting combatant
/// keeps its turn: the index is moved to its new position.
pub fn rebuild<R: Rng>(state: &mut CombatState, rng: &mut R) {
    let acting = state.turn_order.current().map(str::to_string);
    let order = build(state, rng);

    let index = acting
        .and_then(|id| order.iter().position(|c| *c == id))
        .unwrap_or_else(|| state.turn_order.current_index.min(order.len().saturating_sub(1)));

    state.turn_order.combatants = order;
    state.turn_order.current_index = index;
}

/// Remove dead combatants from the queue, keeping the index on the same
/// upcoming combatant (or its successor if that one was removed)
pub fn prune_dead(state: &mut CombatState) -> Vec<String> {
    let mut removed = Vec::new();
    let mut index = state.turn_order.current_index;
    let mut kept = Vec::with_capacity(state.turn_order.combatants.len());

    for (position, id) in std::mem::take(&mut state.turn_order.combatants).into_iter().enumerate() {
        if state.is_alive(&id) {
            kept.push(id);
        } else {
            if position < state.turn_order.current_index {
                index -= 1;
            }
            removed.push(id);
        }
    }

    state.turn_order.combatants = kept;
    state.turn_order.current_index = index;
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::{Combatant, Enemy, PlayerCharacter};
    use crate::stat_block::Stats;
    use rand::SeedableRng;

    fn make_test_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(12345)
    }

    fn player(id: &str, spd: i32) -> PlayerCharacter {
        PlayerCharacter::new(Combatant::new(id, id, 1, Stats::new(50, 10, 5, 5, 5, spd), 10), vec![])
    }

    fn enemy(id: &str, spd: i32) -> Enemy {
        Enemy::new(Combatant::new(id, id, 1, Stats::new(50, 10, 5, 5, 5, spd), 10), vec![])
    }

    #[test]
    fn test_sorted_by_speed() {
        let state = CombatState::new(
            vec![player("slow", 3), player("fast", 20)],
            vec![],
            vec![enemy("mid", 10), enemy("crawler", 1)],
        );
        let order = build(&state, &mut make_test_rng());
        assert_eq!(order, vec!["fast", "mid", "slow", "crawler"]);
    }

    #[test]
    fn test_dead_excluded() {
        let mut state = CombatState::new(vec![player("a", 5)], vec![], vec![enemy("b", 6)]);
        state.enemy_team[0].combatant.take_damage(1000);
        assert_eq!(build(&state, &mut make_test_rng()), vec!["a"]);
    }

    #[test]
    fn test_ties_are_shuffled() {
        let state = CombatState::new(
            vec![player("p1", 10), player("p2", 10), player("p3", 10)],
            vec![],
            vec![enemy("e1", 10), enemy("e2", 10), enemy("e3", 10)],
        );

        let mut rng = make_test_rng();
        let first = build(&state, &mut rng);
        let mut saw_different = false;
        for _ in 0..20 {
            let next = build(&state, &mut rng);
            assert_eq!(next.len(), 6);
            if next != first {
                saw_different = true;
            }
        }
        assert!(saw_different);
    }

    #[test]
    fn test_player_lock_refills_player_slots() {
        let mut state = CombatState::new(
            vec![player("fast", 20), player("slow", 3)],
            vec![],
            vec![enemy("mid", 10)],
        );
        state.player_turn_order = vec!["slow".to_string(), "fast".to_string()];
        state.turn_order_locked = true;

        let order = build(&state, &mut make_test_rng());
        assert_eq!(order, vec!["slow", "mid", "fast"]);
    }

    #[test]
    fn test_rebuild_keeps_acting_combatant() {
        let mut state = CombatState::new(vec![player("a", 10)], vec![], vec![enemy("b", 5)]);
        state.turn_order.combatants = vec!["a".to_string(), "b".to_string()];
        state.turn_order.current_index = 1;

        state.enemy_team.push(enemy("fresh", 50));
        rebuild(&mut state, &mut make_test_rng());

        assert_eq!(state.turn_order.combatants, vec!["fresh", "a", "b"]);
        assert_eq!(state.turn_order.current(), Some("b"));
    }

    #[test]
    fn test_prune_keeps_upcoming_combatant() {
        let mut state = CombatState::new(
            vec![player("a", 10), player("c", 6)],
            vec![],
            vec![enemy("b", 8), enemy("d", 4)],
        );
        state.turn_order.combatants = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        state.turn_order.current_index = 2;
        state.enemy_team[0].combatant.take_damage(1000);

        let removed = prune_dead(&mut state);
        assert_eq!(removed, vec!["b"]);
        assert_eq!(state.turn_order.current(), Some("c"));
        assert!(state.turn_order.combatants.iter().all(|id| state.is_alive(id)));
    }
}
