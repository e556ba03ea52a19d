//! Driver-layer rejections
//!
//! Returned by the engine when a caller submits something it may not do
//! right now. A rejected request never touches the battle state, so a
//! presentation layer is free to drop these on the floor.

use thiserror::Error;

use crate::battle::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("not accepting input during {phase}")]
    NotAcceptingInput { phase: Phase },

    #[error("battle is over")]
    BattleOver,

    #[error("it is not {0}'s turn")]
    NotCurrentUnit(String),

    #[error("unit not found: {0}")]
    UnitNotFound(String),

    #[error("unit {0} is defeated")]
    UnitDefeated(String),

    #[error("unit {0} is not a hero")]
    NotAHero(String),

    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    #[error("{unit} does not know {skill}")]
    SkillNotKnown { unit: String, skill: String },

    #[error("not enough SP for {skill} ({have} < {cost})")]
    InsufficientSp { skill: String, have: i32, cost: i32 },

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("no {0} left")]
    OutOfItem(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("all-out attack is not available")]
    AllOutUnavailable,

    #[error("invalid party: {0}")]
    InvalidParty(String),
}
