//! Scenario Tests for onemore
//!
//! Battles played through the engine end to end:
//! - Weakness: knockdowns and the single bonus turn
//! - Guard: blocked hits and expiring stances
//! - Items: healing, SP and revival from the shared inventory
//! - Outcome: victory hang and defeat
//! - All-Out: the finisher against a fully downed enemy side
//! - Turns: order, skipped units and rejected input while busy
//! - Navigator: flavor lines and background advice
//! - Invariants: seeded autopilot battles

pub mod all_out;
pub mod items;
pub mod outcome;
pub mod turns;
