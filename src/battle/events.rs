//! Notifications emitted while a battle runs
//!
//! The core queues these on the battle state as it mutates it; the engine
//! drains the queue after every step and broadcasts them to subscribers.
//! Presentation owns the lifetime of anything visual (effect markers
//! expire after `pacing.effect_ttl_ms`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::all_out::AllOutStage;
use super::state::Phase;
use crate::content::{Element, NavEvent};

/// Transient visual marker for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectMarker {
    Miss,
    Heal,
    Hit(Element),
    Critical,
    RestoreSp,
    Revive,
    Guard,
}

/// One-time battle accolades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// First weakness hit landed by a hero
    Tactician,
    /// Battle won by an All-Out Attack
    Overkill,
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Achievement::Tactician => write!(f, "TACTICIAN"),
            Achievement::Overkill => write!(f, "OVERKILL"),
        }
    }
}

/// Something observable happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    PhaseChanged { from: Phase, to: Phase },
    /// A unit's turn began (after dead units were skipped)
    TurnStarted { unit_id: String, one_more: bool },
    /// A line was appended to the battle log
    Log(String),
    Effect { unit_id: String, marker: EffectMarker },
    /// A canned navigator line was chosen for an event
    NavigatorLine { event: NavEvent, line: String },
    /// Advice text came back from the navigator provider
    NavigatorAdvice(String),
    AllOutStage(AllOutStage),
    Achievement(Achievement),
}

/// Queued output of a state mutation, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Event(BattleEvent),
    /// Navigator commentary wanted for this event; the engine picks the line
    Cue(NavEvent),
}
