//! TestBattle - a running engine plus everything it emitted
//!
//! The event receiver is subscribed before the entrance plays, so the
//! whole battle is visible to `events()`.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use onemore::battle::{Action, BattleEngine, BattleEvent, BattleState, Cue, Phase, RecordingPacer};
use onemore::combat::Unit;
use onemore::BattleError;

pub struct TestBattle {
    pub engine: Arc<BattleEngine>,
    pub pacer: Arc<RecordingPacer>,
    events: broadcast::Receiver<BattleEvent>,
    seen: Vec<BattleEvent>,
}

impl TestBattle {
    pub(super) fn new(engine: Arc<BattleEngine>, pacer: Arc<RecordingPacer>) -> Self {
        let events = engine.subscribe();
        Self {
            engine,
            pacer,
            events,
            seen: Vec::new(),
        }
    }

    pub async fn start(&self) -> Result<(), BattleError> {
        self.engine.start().await
    }

    pub async fn submit(&self, unit_id: &str, action: Action) -> Result<(), BattleError> {
        self.engine.submit_action(unit_id, action).await
    }

    pub async fn state(&self) -> BattleState {
        self.engine.snapshot().await
    }

    /// Snapshot of one unit (panics if absent)
    pub async fn unit(&self, id: &str) -> Unit {
        self.engine
            .snapshot()
            .await
            .unit(id)
            .cloned()
            .unwrap_or_else(|| panic!("no unit {}", id))
    }

    pub async fn phase(&self) -> Phase {
        self.engine.phase().await
    }

    pub async fn log(&self) -> Vec<String> {
        self.engine.snapshot().await.log().to_vec()
    }

    pub async fn last_log(&self) -> String {
        self.log().await.last().cloned().unwrap_or_default()
    }

    /// Events received since the last call
    pub fn events(&mut self) -> Vec<BattleEvent> {
        let mut fresh = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => fresh.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        self.seen.extend(fresh.iter().cloned());
        fresh
    }

    /// Every event received so far
    pub fn history(&mut self) -> Vec<BattleEvent> {
        self.events();
        self.seen.clone()
    }

    /// Phases entered since the last call to `events()`
    pub fn phases(&mut self) -> Vec<Phase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BattleEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Discard anything pending
    pub fn clear_events(&mut self) {
        self.events();
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.pacer.cues()
    }
}
