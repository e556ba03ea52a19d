//! Battle outcome monitor
//!
//! A pure check of living units, applied after every state change.
//! Victory goes through a pending window before it is declared; defeat
//! is immediate.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::{BattleState, Phase};
use crate::content::NavEvent;

/// What the monitor concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every enemy is dead; victory follows the hang time
    VictoryPending,
    /// Every hero is dead while enemies remain
    Defeat,
}

/// Evaluate the state without changing it
pub fn evaluate(state: &BattleState) -> Option<Verdict> {
    match state.phase() {
        Phase::Start | Phase::VictoryPending | Phase::Victory | Phase::Defeat => return None,
        _ => {}
    }

    if state.living_enemies().is_empty() {
        Some(Verdict::VictoryPending)
    } else if state.living_heroes().is_empty() {
        Some(Verdict::Defeat)
    } else {
        None
    }
}

/// Move to the phase a verdict calls for
pub fn apply(state: &mut BattleState, verdict: Verdict) {
    match verdict {
        Verdict::VictoryPending => {
            info!("Battle {}: all enemies defeated", state.id);
            state.set_phase(Phase::VictoryPending);
        }
        Verdict::Defeat => {
            info!("Battle {}: party wiped out", state.id);
            state.set_phase(Phase::Defeat);
        }
    }
}

/// Evaluate and apply in one step
pub fn check(state: &mut BattleState) -> Option<Verdict> {
    let verdict = evaluate(state)?;
    apply(state, verdict);
    Some(verdict)
}

/// End the victory hang: `VICTORY_PENDING -> VICTORY` with a closing line.
/// Returns false if the battle was not pending victory.
pub fn conclude_victory(state: &mut BattleState) -> bool {
    if state.phase() != Phase::VictoryPending {
        return false;
    }
    info!("Battle {}: victory", state.id);
    state.set_phase(Phase::Victory);
    state.cue(NavEvent::Victory);
    true
}
