//! Combat system module
//!
//! Implements the numeric rules of a battle with:
//! - Random rolls behind a replaceable roller
//! - Damage scaling, variance and hit qualifiers
//! - Weakness, resistance, critical and guard
//! - Units with clamped HP/SP and knockdown state

mod damage;
mod roll;
mod unit;

pub use damage::{attacker_factor, base_damage, DamageProfile, DamageResult, DownCause, HitTag};
pub use roll::{BattleRng, ScriptedRng, SeededRng, NEUTRAL_ROLL, VARIANCE_MAX, VARIANCE_MIN};
pub use unit::Unit;
