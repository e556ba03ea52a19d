//! GatedPacer - pauses that only end when the test says so

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use onemore::battle::{Cue, Pacer};

/// Each pause consumes one permit; with none left it blocks
#[derive(Debug)]
pub struct GatedPacer {
    gate: Semaphore,
}

impl GatedPacer {
    pub fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
        }
    }

    /// Let `n` more pauses through
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl Pacer for GatedPacer {
    async fn pause(&self, _cue: Cue, _delay: Duration) {
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}
