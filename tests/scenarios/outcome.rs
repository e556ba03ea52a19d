//! Outcome scenario tests
//!
//! Tests the victory hang after the last enemy falls, and defeat.

use std::time::Duration;

use onemore::battle::{Action, BattleEvent, Cue, Phase};
use onemore::content::NavEvent;
use onemore::BattleError;

use crate::harness::BattleSetup;

/// Test: Killing the last enemy goes through VICTORY_PENDING to VICTORY
#[tokio::test]
async fn test_last_enemy_falls() {
    let mut battle = BattleSetup::new(&["hero_1"])
        .hp("enemy_1", 10)
        .hp("enemy_2", 0)
        .hp("enemy_3", 0)
        .start()
        .await;
    battle.clear_events();

    battle
        .submit("hero_1", Action::attack("enemy_1"))
        .await
        .unwrap();

    let events = battle.events();
    let phases: Vec<Phase> = events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![Phase::Processing, Phase::VictoryPending, Phase::Victory]
    );
    assert!(events.iter().any(|e| matches!(
        e,
        BattleEvent::NavigatorLine {
            event: NavEvent::Victory,
            ..
        }
    )));

    let state = battle.state().await;
    assert_eq!(state.unit("enemy_1").unwrap().hp(), 0);
    assert!(state.living_enemies().is_empty());
    assert!(state.navigator_message().is_some());

    let pauses = battle.pacer.pauses();
    assert_eq!(
        pauses.last(),
        Some(&(Cue::VictoryHang, Duration::from_millis(2000)))
    );

    assert_eq!(
        battle.submit("hero_1", Action::Guard).await,
        Err(BattleError::BattleOver)
    );
    assert_eq!(battle.engine.advance_turn().await, Err(BattleError::BattleOver));
}

/// Test: A bonus turn is never granted on the killing blow that ends the battle
#[tokio::test]
async fn test_final_weakness_kill_has_no_bonus() {
    let battle = BattleSetup::new(&["hero_2"])
        .hp("enemy_2", 0)
        .hp("enemy_3", 0)
        .start()
        .await;

    battle
        .submit("hero_2", Action::skill("BUFU", "enemy_1"))
        .await
        .unwrap();

    let state = battle.state().await;
    assert_eq!(state.phase(), Phase::Victory);
    assert!(!state.is_one_more());
    assert_eq!(
        state.log().last().unwrap(),
        "Chie uses Bufu on Burning Beetle! 150 dmg! WEAKNESS!"
    );
}

/// Test: Losing the last hero ends the battle in DEFEAT
#[tokio::test]
async fn test_party_wiped() {
    let mut battle = BattleSetup::new(&["hero_1"])
        .hp("hero_1", 1)
        .enemies(&["enemy_1", "enemy_2"])
        .rolls([0.1])
        .start()
        .await;
    battle.clear_events();

    battle.submit("hero_1", Action::Skip).await.unwrap();

    let phases = battle.phases();
    assert_eq!(phases.last(), Some(&Phase::Defeat));
    assert!(!phases.contains(&Phase::Victory));
    assert!(!phases.contains(&Phase::VictoryPending));

    let state = battle.state().await;
    assert_eq!(state.unit("hero_1").unwrap().hp(), 0);
    // Voltaic Weights never got a turn
    assert_eq!(
        state.log().last().unwrap(),
        "Burning Beetle uses Attack on Yu! 45 dmg!"
    );
    assert_eq!(state.unit("enemy_2").unwrap().hp(), 200);

    assert_eq!(
        battle.submit("hero_1", Action::Guard).await,
        Err(BattleError::BattleOver)
    );
}
