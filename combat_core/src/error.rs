//! Engine misuse errors

use crate::combat::CombatPhase;
use thiserror::Error;

/// A caller broke the engine's contract
///
/// Game events (missing AP, no targets, unknown abilities) are not errors;
/// they come back as `None` from the action that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("combat already started (phase: {0:?})")]
    AlreadyStarted(CombatPhase),
    #[error("player turn order is already locked")]
    TurnOrderLocked,
    #[error("unknown combatant in turn order: {0}")]
    UnknownCombatant(String),
    #[error("combatant listed twice in turn order: {0}")]
    DuplicateCombatant(String),
    #[error("turn order names {got} of {expected} player characters")]
    IncompleteTurnOrder { expected: usize, got: usize },
    #[error("not in team wipe (phase: {0:?})")]
    NotInTeamWipe(CombatPhase),
    #[error("combat is not active (phase: {0:?})")]
    NotActive(CombatPhase),
}
