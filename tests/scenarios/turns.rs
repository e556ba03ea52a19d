//! Turn scenario tests
//!
//! Tests turn order, skipping the fallen, passing a turn, and the engine
//! refusing input while a turn plays out.

use std::sync::Arc;

use onemore::battle::{Action, BattleEngine, BattleEvent, Pacing, Phase};
use onemore::combat::ScriptedRng;
use onemore::content::Content;
use onemore::BattleError;

use crate::harness::{BattleSetup, GatedPacer};

/// Test: Heroes go first in roster order, then enemies
#[tokio::test]
async fn test_turn_order() {
    let battle = BattleSetup::new(&["hero_3", "hero_1"]).build();

    let state = battle.state().await;
    assert_eq!(
        state.turn_order(),
        ["hero_1", "hero_3", "enemy_1", "enemy_2", "enemy_3"]
    );
    assert_eq!(state.phase(), Phase::Start);
}

/// Test: A fallen hero's turn passes silently
#[tokio::test]
async fn test_fallen_hero_skipped() {
    let mut battle = BattleSetup::new(&["hero_1", "hero_2", "hero_3"])
        .hp("hero_2", 0)
        .start()
        .await;
    battle.clear_events();

    battle.submit("hero_1", Action::Guard).await.unwrap();

    let state = battle.state().await;
    assert_eq!(state.phase(), Phase::PlayerInput);
    assert_eq!(state.current_unit_id(), Some("hero_3"));
    assert_eq!(state.log().len(), 2);

    let started: Vec<String> = battle
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::TurnStarted { unit_id, .. } => Some(unit_id),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec!["hero_3".to_string()]);
}

/// Test: Passing a turn moves on without a log entry
#[tokio::test]
async fn test_advance_turn() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"]).start().await;

    battle.engine.advance_turn().await.unwrap();

    let state = battle.state().await;
    assert_eq!(state.current_unit_id(), Some("hero_2"));
    assert_eq!(state.phase(), Phase::PlayerInput);
    assert_eq!(state.log().len(), 1);
}

/// Test: Input is refused while a turn is playing out, reads are not
#[tokio::test]
async fn test_busy_engine_rejects_input() {
    let pacer = Arc::new(GatedPacer::closed());
    let engine = BattleEngine::initialize(Content::shared(), &["hero_1"])
        .unwrap()
        .with_pacing(Pacing::instant())
        .with_pacer(pacer.clone())
        .with_rng(ScriptedRng::default())
        .with_flavor_rng(ScriptedRng::default())
        .shared();

    // Entrance banner and units
    pacer.release(2);
    engine.start().await.unwrap();
    assert_eq!(engine.phase().await, Phase::PlayerInput);

    let worker = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit_action("hero_1", Action::Guard).await })
    };

    for _ in 0..100 {
        if engine.phase().await == Phase::Processing {
            break;
        }
        tokio::task::yield_now().await;
    }

    let busy = Err(BattleError::NotAcceptingInput {
        phase: Phase::Processing,
    });
    assert_eq!(engine.phase().await, Phase::Processing);
    assert_eq!(engine.submit_action("hero_1", Action::Guard).await, busy);
    assert_eq!(engine.advance_turn().await, busy);
    assert_eq!(engine.start().await, busy);
    assert_eq!(engine.snapshot().await.log().len(), 1);

    // Yu's resolve plus three enemy turns
    pacer.release(4);
    worker.await.unwrap().unwrap();

    let state = engine.snapshot().await;
    assert_eq!(state.phase(), Phase::PlayerInput);
    assert_eq!(state.log().len(), 5);
}

/// Test: Enemies spread their attacks by the target roll
#[tokio::test]
async fn test_enemy_target_pick() {
    // Beetle: target roll picks the second hero, attack roll
    let battle = BattleSetup::new(&["hero_1", "hero_3"])
        .enemies(&["enemy_1"])
        .rolls([0.9, 0.1])
        .start()
        .await;

    battle.submit("hero_1", Action::Guard).await.unwrap();
    battle.submit("hero_3", Action::Guard).await.unwrap();

    assert_eq!(battle.unit("hero_1").await.hp(), 250);
    assert_eq!(battle.unit("hero_3").await.hp(), 210 - 22);
}
