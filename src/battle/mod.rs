//! Battle state machine
//!
//! Turn scheduling, action resolution, the all-out finisher and outcome
//! detection as synchronous operations on a [`BattleState`], driven by
//! the async [`BattleEngine`].

mod action;
pub mod ai;
pub mod all_out;
mod engine;
mod events;
pub mod outcome;
mod pacing;
pub mod resolver;
mod scheduler;
mod state;

pub use action::{Action, ActionTarget};
pub use all_out::{AllOutResult, AllOutStage};
pub use engine::{BattleEngine, EVENT_CAPACITY};
pub use events::{Achievement, BattleEvent, EffectMarker, Notice};
pub use outcome::Verdict;
pub use pacing::{Cue, InstantPacer, Pacer, Pacing, RecordingPacer, TokioPacer};
pub use resolver::{Resolution, TurnEnd, MISS_CHANCE};
pub use state::{BattleState, Inventory, Phase, MAX_PARTY_SIZE, OPENING_LINE};
