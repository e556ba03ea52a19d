//! All-Out Attack scenario tests
//!
//! Tests the staged finisher and when it is offered.

use std::time::Duration;

use onemore::battle::{Achievement, Action, AllOutStage, BattleEvent, Cue, Phase};
use onemore::combat::DownCause;
use onemore::BattleError;

use crate::harness::BattleSetup;

/// Test: Every enemy down, the hero finishes the battle in three stages
#[tokio::test]
async fn test_all_out_attack_wins() {
    let mut battle = BattleSetup::new(&["hero_1", "hero_2"])
        .down("enemy_1", DownCause::Weak)
        .down("enemy_2", DownCause::Weak)
        .down("enemy_3", DownCause::Critical)
        .start()
        .await;
    assert!(battle.engine.can_all_out().await);
    battle.clear_events();

    battle.submit("hero_1", Action::AllOut).await.unwrap();

    let state = battle.state().await;
    assert_eq!(state.phase(), Phase::Victory);
    for id in ["enemy_1", "enemy_2", "enemy_3"] {
        let enemy = state.unit(id).unwrap();
        assert_eq!(enemy.hp(), 0);
        assert!(!enemy.is_down());
    }
    assert_eq!(state.log().last().unwrap(), "ALL-OUT ATTACK! It's over!");
    // Opening line and the finisher; Chie never acted
    assert_eq!(state.log().len(), 2);
    assert!(state.achievements().contains(&Achievement::Overkill));

    let stages: Vec<AllOutStage> = battle
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::AllOutStage(stage) => Some(stage),
            _ => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![AllOutStage::CutIn, AllOutStage::Dust, AllOutStage::Finish]
    );

    // Entrance, then the three stage pauses; no victory hang
    let pauses = battle.pacer.pauses();
    assert_eq!(
        pauses[2..],
        [
            (Cue::AllOutCutIn, Duration::from_millis(1500)),
            (Cue::AllOutDust, Duration::from_millis(2500)),
            (Cue::AllOutFinish, Duration::from_millis(2500)),
        ]
    );
}

/// Test: Defeated enemies don't block the finisher
#[tokio::test]
async fn test_all_out_ignores_defeated_enemies() {
    let battle = BattleSetup::new(&["hero_4"])
        .hp("enemy_1", 0)
        .down("enemy_2", DownCause::Weak)
        .down("enemy_3", DownCause::Weak)
        .start()
        .await;

    battle.submit("hero_4", Action::AllOut).await.unwrap();
    assert_eq!(battle.phase().await, Phase::Victory);
}

/// Test: One enemy still standing means no All-Out Attack
#[tokio::test]
async fn test_all_out_needs_every_enemy_down() {
    let battle = BattleSetup::new(&["hero_1"])
        .down("enemy_1", DownCause::Weak)
        .down("enemy_2", DownCause::Weak)
        .start()
        .await;

    assert!(!battle.engine.can_all_out().await);
    assert_eq!(
        battle.submit("hero_1", Action::AllOut).await,
        Err(BattleError::AllOutUnavailable)
    );
    assert_eq!(battle.phase().await, Phase::PlayerInput);
    assert_eq!(battle.unit("enemy_1").await.hp(), 150);
}

/// Test: Knocking the last standing enemy down offers the finisher on the bonus turn
#[tokio::test]
async fn test_knockdown_opens_all_out() {
    // Ice Cube resists ice, so a crit from a basic attack it is
    let battle = BattleSetup::new(&["hero_2"])
        .down("enemy_1", DownCause::Weak)
        .down("enemy_2", DownCause::Weak)
        .rolls([0.5, 0.5, 0.1])
        .start()
        .await;
    assert!(!battle.engine.can_all_out().await);

    battle
        .submit("hero_2", Action::attack("enemy_3"))
        .await
        .unwrap();

    let state = battle.state().await;
    assert!(state.is_one_more());
    assert_eq!(state.current_unit_id(), Some("hero_2"));
    assert!(battle.engine.can_all_out().await);

    battle.submit("hero_2", Action::AllOut).await.unwrap();
    assert_eq!(battle.phase().await, Phase::Victory);
}
