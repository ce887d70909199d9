//! Rewards - XP and equipment drops handed out at victory

use super::combatant::{Enemy, PlayerCharacter};
use crate::config::RewardConstants;
use crate::source::{Equipment, StatBonus};
use crate::types::StatKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// XP for defeating one enemy: `level² × base × (boss multiplier if boss)`
pub fn xp_for_enemy(enemy: &Enemy, constants: &RewardConstants) -> u64 {
    let level = enemy.combatant.level as u64;
    let boss = if enemy.is_boss { constants.boss_xp_multiplier } else { 1 };
    level * level * constants.base_xp * boss
}

/// Victory collaborators: leveling and loot live outside the combat core
pub trait RewardProvider {
    /// Grant xp to a roster member, returning levels gained
    fn award_xp(&mut self, character: &mut PlayerCharacter, amount: u64) -> u32;

    /// Whether a defeated enemy drops equipment
    fn roll_equipment_drop(&mut self, enemy: &Enemy) -> bool;

    fn generate_equipment(&mut self, level: u32) -> Equipment;
}

/// Hands out no levels and no loot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewards;

impl RewardProvider for NoRewards {
    fn award_xp(&mut self, character: &mut PlayerCharacter, amount: u64) -> u32 {
        character.xp += amount;
        0
    }

    fn roll_equipment_drop(&mut self, _enemy: &Enemy) -> bool {
        false
    }

    fn generate_equipment(&mut self, level: u32) -> Equipment {
        Equipment::new(format!("trinket_{}", level), "Trinket", level)
    }
}

/// Simple leveling curve and chance-based drops
///
/// Levels up every `xp_per_level × level` accumulated xp; drops are rolled
/// against `drop_chance` percent, bosses always drop.
#[derive(Debug, Clone)]
pub struct BasicRewards {
    pub xp_per_level: u64,
    pub drop_chance: u32,
    rng: ChaCha8Rng,
    serial: u32,
}

impl BasicRewards {
    pub fn new(seed: u64) -> Self {
        BasicRewards {
            xp_per_level: 100,
            drop_chance: 30,
            rng: ChaCha8Rng::seed_from_u64(seed),
            serial: 0,
        }
    }

    pub fn with_drop_chance(mut self, percent: u32) -> Self {
        self.drop_chance = percent.min(100);
        self
    }
}

impl RewardProvider for BasicRewards {
    fn award_xp(&mut self, character: &mut PlayerCharacter, amount: u64) -> u32 {
        character.xp += amount;

        let mut gained = 0;
        loop {
            let level = character.combatant.level.max(1);
            let needed = self.xp_per_level * level as u64;
            if character.xp < needed {
                break;
            }
            character.xp -= needed;
            character.combatant.level += 1;
            gained += 1;
        }
        gained
    }

    fn roll_equipment_drop(&mut self, enemy: &Enemy) -> bool {
        enemy.is_boss || self.rng.gen_range(1..=100) <= self.drop_chance
    }

    fn generate_equipment(&mut self, level: u32) -> Equipment {
        const KINDS: [(StatKind, &str); 4] = [
            (StatKind::Atk, "Blade"),
            (StatKind::Def, "Shield"),
            (StatKind::MaxHp, "Amulet"),
            (StatKind::Spd, "Boots"),
        ];
        let (stat, name) = KINDS[self.rng.gen_range(0..KINDS.len())];
        let value = match stat {
            StatKind::MaxHp => 10 * level as i32,
            StatKind::Spd => 1 + level as i32 / 5,
            _ => 2 + level as i32,
        };

        self.serial += 1;
        Equipment::new(format!("{}_{}", name.to_lowercase(), self.serial), name, level)
            .with_bonus(StatBonus::new(stat, value))
    }
}

/// Decides which stage clears count toward recruitment milestones
///
/// Consumed by callers around the engine, never by the engine itself.
pub trait ProgressionGate {
    fn should_count_for_recruitment(&self, stage_number: u32) -> bool;
}

/// Counts every `interval`-th stage
#[derive(Debug, Clone, Copy)]
pub struct MilestoneGate {
    pub interval: u32,
}

impl Default for MilestoneGate {
    fn default() -> Self {
        MilestoneGate { interval: 5 }
    }
}

impl ProgressionGate for MilestoneGate {
    fn should_count_for_recruitment(&self, stage_number: u32) -> bool {
        self.interval > 0 && stage_number > 0 && stage_number % self.interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::Combatant;
    use crate::stat_block::Stats;

    fn enemy(level: u32, is_boss: bool) -> Enemy {
        let mut enemy = Enemy::new(Combatant::new("e", "E", level, Stats::new(10, 1, 1, 1, 1, 1), 10), vec![]);
        enemy.is_boss = is_boss;
        enemy
    }

    fn hero() -> PlayerCharacter {
        PlayerCharacter::new(Combatant::new("hero", "Hero", 1, Stats::new(100, 10, 10, 10, 10, 10), 10), vec![])
    }

    #[test]
    fn test_xp_formula() {
        let constants = RewardConstants::default();
        assert_eq!(xp_for_enemy(&enemy(1, false), &constants), 10);
        assert_eq!(xp_for_enemy(&enemy(3, false), &constants), 90);
        assert_eq!(xp_for_enemy(&enemy(3, true), &constants), 450);
    }

    #[test]
    fn test_basic_rewards_levels_up() {
        let mut rewards = BasicRewards::new(7);
        let mut hero = hero();

        // 100 for level 2, 200 for level 3
        let gained = rewards.award_xp(&mut hero, 350);
        assert_eq!(gained, 2);
        assert_eq!(hero.combatant.level, 3);
        assert_eq!(hero.xp, 50);
    }

    #[test]
    fn test_no_rewards_keeps_level() {
        let mut hero = hero();
        assert_eq!(NoRewards.award_xp(&mut hero, 10_000), 0);
        assert_eq!(hero.combatant.level, 1);
        assert_eq!(hero.xp, 10_000);
        assert!(!NoRewards.roll_equipment_drop(&enemy(5, true)));
    }

    #[test]
    fn test_drop_chance_extremes() {
        let mut never = BasicRewards::new(1).with_drop_chance(0);
        let mut always = BasicRewards::new(1).with_drop_chance(100);
        for _ in 0..50 {
            assert!(!never.roll_equipment_drop(&enemy(2, false)));
            assert!(always.roll_equipment_drop(&enemy(2, false)));
        }
        assert!(never.roll_equipment_drop(&enemy(2, true)));
    }

    #[test]
    fn test_generated_equipment_has_bonus() {
        let mut rewards = BasicRewards::new(3);
        let first = rewards.generate_equipment(4);
        let second = rewards.generate_equipment(4);
        assert_eq!(first.level, 4);
        assert_eq!(first.bonuses.len(), 1);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_milestone_gate() {
        let gate = MilestoneGate::default();
        assert!(!gate.should_count_for_recruitment(0));
        assert!(!gate.should_count_for_recruitment(4));
        assert!(gate.should_count_for_recruitment(5));
        assert!(gate.should_count_for_recruitment(10));
    }
}
