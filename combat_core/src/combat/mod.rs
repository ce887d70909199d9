//! Combat - Combatants, ability resolution and the battle state machine

mod ability;
mod combatant;
mod engine;
mod enemy_template;
mod log;
mod resolver;
mod result;
mod rewards;
mod state;
pub mod summon;
pub mod turn_order;

pub use ability::{Ability, AbilityEffects, AbilityLookup, AbilityRegistry, StatusEffectChance};
pub use combatant::{Combatant, CombatantRef, CombatantRefMut, Enemy, PlayerCharacter};
pub use engine::CombatEngine;
pub use enemy_template::{EnemyTemplate, EnemyTemplateRegistry};
pub use log::{CombatLogEntry, LogKind};
pub use resolver::{execute_ability, resolve_targets, ResolveContext};
pub use result::{AbilityResult, ApDrain, StatusApplication};
pub use rewards::{xp_for_enemy, BasicRewards, MilestoneGate, NoRewards, ProgressionGate, RewardProvider};
pub use state::{CombatPhase, CombatState, TurnOrder};
pub use summon::{BossSummonState, SummonConfig, SummonTrigger, TriggerKind};
