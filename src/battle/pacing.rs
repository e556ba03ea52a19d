//! Pacing for player-visible feedback
//!
//! Provides:
//! - Cue: named pauses with a defined successor
//! - Pacing: configured delay per cue
//! - Pacer: the clock the engine waits on (real time, instant, or recorded)
//!
//! Pauses are cooperative and never cancelled once started.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A named pause in the battle flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// "Shadows appear" banner
    EntranceBanner,
    /// Units slide in
    EntranceUnits,
    /// Between committing an action and its result
    Resolve,
    AllOutCutIn,
    AllOutDust,
    AllOutFinish,
    /// Between the last enemy falling and victory
    VictoryHang,
}

impl Cue {
    /// Cue that follows in a fixed sequence, if any
    pub fn next(&self) -> Option<Cue> {
        match self {
            Cue::EntranceBanner => Some(Cue::EntranceUnits),
            Cue::AllOutCutIn => Some(Cue::AllOutDust),
            Cue::AllOutDust => Some(Cue::AllOutFinish),
            Cue::EntranceUnits | Cue::Resolve | Cue::AllOutFinish | Cue::VictoryHang => None,
        }
    }
}

/// Delay per cue in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub resolve_ms: u64,
    pub all_out_cut_in_ms: u64,
    pub all_out_dust_ms: u64,
    pub all_out_finish_ms: u64,
    pub victory_hang_ms: u64,
    pub entrance_banner_ms: u64,
    pub entrance_units_ms: u64,
    /// How long presentation keeps an effect marker
    pub effect_ttl_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            resolve_ms: 500,
            all_out_cut_in_ms: 1500,
            all_out_dust_ms: 2500,
            all_out_finish_ms: 2500,
            victory_hang_ms: 2000,
            entrance_banner_ms: 2000,
            entrance_units_ms: 1500,
            effect_ttl_ms: 1000,
        }
    }
}

impl Pacing {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            resolve_ms: 0,
            all_out_cut_in_ms: 0,
            all_out_dust_ms: 0,
            all_out_finish_ms: 0,
            victory_hang_ms: 0,
            entrance_banner_ms: 0,
            entrance_units_ms: 0,
            effect_ttl_ms: 0,
        }
    }

    pub fn delay(&self, cue: Cue) -> Duration {
        let ms = match cue {
            Cue::EntranceBanner => self.entrance_banner_ms,
            Cue::EntranceUnits => self.entrance_units_ms,
            Cue::Resolve => self.resolve_ms,
            Cue::AllOutCutIn => self.all_out_cut_in_ms,
            Cue::AllOutDust => self.all_out_dust_ms,
            Cue::AllOutFinish => self.all_out_finish_ms,
            Cue::VictoryHang => self.victory_hang_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn effect_ttl(&self) -> Duration {
        Duration::from_millis(self.effect_ttl_ms)
    }
}

/// Clock the engine waits on between steps
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, cue: Cue, delay: Duration);
}

/// Waits in real time
#[derive(Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, _cue: Cue, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Never waits
#[derive(Debug, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _cue: Cue, _delay: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Never waits, but remembers every pause it was asked for
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<(Cue, Duration)>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses so far, in order
    pub fn pauses(&self) -> Vec<(Cue, Duration)> {
        self.pauses.lock().clone()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.pauses.lock().iter().map(|(cue, _)| *cue).collect()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, cue: Cue, delay: Duration) {
        self.pauses.lock().push((cue, delay));
    }
}
