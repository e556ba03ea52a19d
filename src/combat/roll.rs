//! Random rolls
//!
//! Every random decision in a battle (miss, damage variance, critical,
//! target and line picks) goes through [`BattleRng`] so a battle can be
//! replayed from a seed or driven by a fixed script.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound of the damage variance multiplier
pub const VARIANCE_MIN: f64 = 0.9;

/// Upper bound of the damage variance multiplier
pub const VARIANCE_MAX: f64 = 1.1;

const VARIANCE_SPAN: f64 = 0.2;

/// Source of uniform rolls for combat
pub trait BattleRng: Send {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Succeeds with probability `p`. Always consumes one roll.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Damage variance multiplier in `[0.9, 1.1]`
    fn variance(&mut self) -> f64 {
        VARIANCE_MIN + self.next_unit() * VARIANCE_SPAN
    }

    /// Uniform index into a collection of `len` elements
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

/// Seedable roller backed by `StdRng`
#[derive(Debug)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Deterministic roller for a given seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Roller seeded from the OS
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Seeded if a seed is given, OS entropy otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_os(),
        }
    }
}

impl BattleRng for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Replays a fixed list of rolls, then a constant fallback.
///
/// The default fallback of 0.5 never misses (miss needs < 0.1), never
/// crits (crit needs < 0.2) and gives a variance multiplier of exactly 1.0.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    fallback: f64,
}

/// Roll returned once a script runs out
pub const NEUTRAL_ROLL: f64 = 0.5;

impl ScriptedRng {
    /// Script the given rolls, falling back to [`NEUTRAL_ROLL`]
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: NEUTRAL_ROLL,
        }
    }

    /// Change the value returned once the script is exhausted
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Append more rolls to the script
    pub fn push(&mut self, roll: f64) {
        self.rolls.push_back(roll);
    }

    /// Rolls not yet consumed
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BattleRng for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
