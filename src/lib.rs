//! onemore - turn-based battle engine
//!
//! A Persona-style battle system: elemental weaknesses, knockdowns and
//! "one more" bonus turns, All-Out Attacks, and an optional navigator
//! that comments on the fight.

pub mod battle;
pub mod combat;
pub mod content;
pub mod error;
pub mod navigator;

use std::path::Path;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use battle::Pacing;
use navigator::NavigatorConfig;

pub use battle::{Action, ActionTarget, BattleEngine, BattleEvent, BattleState, Phase};
pub use error::BattleError;

/// Prefix for environment overrides, e.g. `ONEMORE_PACING__RESOLVE_MS`
pub const ENV_PREFIX: &str = "ONEMORE_";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pacing: Pacing,
    pub navigator: NavigatorConfig,
    /// Seed for reproducible battles
    pub seed: Option<u64>,
    /// Default party hero ids
    pub party: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            navigator: NavigatorConfig::default(),
            seed: None,
            party: vec![
                "hero_1".to_string(),
                "hero_2".to_string(),
                "hero_3".to_string(),
            ],
        }
    }
}

impl Config {
    /// Defaults, then the TOML file if given, then `ONEMORE_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }
}
