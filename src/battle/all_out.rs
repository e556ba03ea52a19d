//! All-Out Attack sequencer
//!
//! Three cinematic stages then a guaranteed kill on every living enemy.
//! Stage pacing belongs to the engine; this module owns the ordering and
//! the final effect.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::events::{Achievement, BattleEvent};
use super::pacing::Cue;
use super::state::{BattleState, Phase};
use crate::content::NavEvent;

pub const FINISH_LINE: &str = "ALL-OUT ATTACK! It's over!";
pub const CONTINUE_LINE: &str = "ALL-OUT ATTACK!";

/// Cinematic stage of the finisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllOutStage {
    CutIn,
    Dust,
    Finish,
}

impl AllOutStage {
    pub fn first() -> Self {
        AllOutStage::CutIn
    }

    /// Stage that follows, None after the finisher
    pub fn next(&self) -> Option<Self> {
        match self {
            AllOutStage::CutIn => Some(AllOutStage::Dust),
            AllOutStage::Dust => Some(AllOutStage::Finish),
            AllOutStage::Finish => None,
        }
    }

    /// Pause held on this stage before moving on
    pub fn cue(&self) -> Cue {
        match self {
            AllOutStage::CutIn => Cue::AllOutCutIn,
            AllOutStage::Dust => Cue::AllOutDust,
            AllOutStage::Finish => Cue::AllOutFinish,
        }
    }
}

impl fmt::Display for AllOutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllOutStage::CutIn => write!(f, "cut-in"),
            AllOutStage::Dust => write!(f, "dust"),
            AllOutStage::Finish => write!(f, "finish"),
        }
    }
}

/// How the finisher ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllOutResult {
    Victory,
    /// Enemies remain; the next unit is up
    Continued,
}

/// Whether `actor_id` may launch an All-Out Attack right now
pub fn is_available(state: &BattleState, actor_id: &str) -> bool {
    state.phase() == Phase::PlayerInput
        && state
            .current_unit()
            .is_some_and(|u| u.id == actor_id && u.is_hero() && u.is_alive())
        && state.all_enemies_down()
}

/// Lock the battle into the sequence
pub fn begin(state: &mut BattleState) {
    info!("Battle {}: all-out attack", state.id);
    state.set_phase(Phase::Processing);
    state.cue(NavEvent::AllOutAttack);
}

pub fn enter_stage(state: &mut BattleState, stage: AllOutStage) {
    state.emit(BattleEvent::AllOutStage(stage));
}

/// Kill every living enemy and settle the battle
pub fn finish(state: &mut BattleState) -> AllOutResult {
    let targets: Vec<String> = state.living_enemies().iter().map(|u| u.id.clone()).collect();
    for id in &targets {
        if let Some(unit) = state.unit_mut(id) {
            unit.defeat();
        }
    }
    settle(state)
}

/// Victory if the enemy side is empty, otherwise play moves on to the
/// next unit with no bonus turn.
///
/// After [`finish`] the enemy side is always empty; the continue branch
/// covers a finisher that leaves someone standing.
fn settle(state: &mut BattleState) -> AllOutResult {
    if state.living_enemies().is_empty() {
        state.push_log(FINISH_LINE.to_string());
        state.set_phase(Phase::Victory);
        state.cue(NavEvent::Victory);
        state.unlock(Achievement::Overkill);
        info!("Battle {}: victory by all-out attack", state.id);
        AllOutResult::Victory
    } else {
        state.push_log(CONTINUE_LINE.to_string());
        state.advance_turn();
        AllOutResult::Continued
    }
}
