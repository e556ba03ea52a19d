//! Integration Test Harness
//!
//! Battle test infrastructure for onemore:
//! - `BattleSetup` - Arranges units, rolls and content before a battle starts
//! - `TestBattle` - A running engine with a recording pacer and an event tap
//! - `GatedPacer` - A pacer that holds every pause until the test releases it
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::BattleSetup;
//!
//! #[tokio::test]
//! async fn test_guard() {
//!     let mut battle = BattleSetup::new(&["hero_1"]).start().await;
//!
//!     battle.submit("hero_1", Action::Guard).await.unwrap();
//!     assert!(battle.log().await.contains(&"Yu is guarding!".to_string()));
//! }
//! ```

mod battle;
mod pacer;
mod setup;

pub use battle::TestBattle;
pub use pacer::GatedPacer;
pub use setup::BattleSetup;
