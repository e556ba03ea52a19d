//! Item scenario tests
//!
//! Tests the shared inventory: revival, healing, SP and running out.

use std::collections::BTreeMap;

use onemore::battle::{Action, Phase};
use onemore::BattleError;

use crate::harness::BattleSetup;

/// Test: Revival Bead brings a fallen hero back with half HP
#[tokio::test]
async fn test_revival_bead() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"])
        .hero_template("hero_2", |chie| chie.max_hp = 200)
        .hp("hero_2", 0)
        .start()
        .await;
    assert_eq!(battle.state().await.inventory().count("REVIVAL_BEAD"), 2);

    battle
        .submit("hero_1", Action::item("REVIVAL_BEAD", "hero_2"))
        .await
        .unwrap();

    let chie = battle.unit("hero_2").await;
    assert_eq!(chie.hp(), 100);
    assert!(chie.is_alive());
    assert!(!chie.is_down());

    let state = battle.state().await;
    assert_eq!(state.inventory().count("REVIVAL_BEAD"), 1);
    assert_eq!(
        state.log().last().unwrap(),
        "Yu used Revival Bead on Chie! Revived with 100 HP"
    );
    // Revived in time to take her own turn
    assert_eq!(state.phase(), Phase::PlayerInput);
    assert_eq!(state.current_unit_id(), Some("hero_2"));
}

/// Test: Reviving the living wastes the bead
#[tokio::test]
async fn test_revival_bead_on_living_hero() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"]).start().await;

    battle
        .submit("hero_1", Action::item("REVIVAL_BEAD", "hero_2"))
        .await
        .unwrap();

    let state = battle.state().await;
    assert_eq!(state.unit("hero_2").unwrap().hp(), 220);
    assert_eq!(state.inventory().count("REVIVAL_BEAD"), 1);
    assert_eq!(
        state.log().last().unwrap(),
        "Yu used Revival Bead on Chie! No effect..."
    );
}

/// Test: Medicine and Snuff Soul clamp at the maximum
#[tokio::test]
async fn test_restoratives_clamp() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"])
        .hp("hero_1", 200)
        .sp("hero_2", 20)
        .start()
        .await;

    battle
        .submit("hero_1", Action::item("MEDICINE", "hero_1"))
        .await
        .unwrap();
    battle
        .submit("hero_2", Action::item("SNUFF_SOUL", "hero_2"))
        .await
        .unwrap();

    let state = battle.state().await;
    assert_eq!(state.unit("hero_2").unwrap().sp(), 60);
    assert_eq!(state.inventory().count("MEDICINE"), 4);
    assert_eq!(state.inventory().count("SNUFF_SOUL"), 2);

    let log = state.log();
    assert!(log.contains(&"Yu used Medicine on Yu! Restored 50 HP".to_string()));
    assert!(log.contains(&"Chie used Snuff Soul on Chie! Restored 40 SP".to_string()));
}

/// Test: Items are rejected for bad targets and empty stock
#[tokio::test]
async fn test_item_rejections() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"])
        .hp("hero_2", 0)
        .content(|content| {
            content.with_inventory(BTreeMap::from([("REVIVAL_BEAD".to_string(), 1)]))
        })
        .start()
        .await;

    assert_eq!(
        battle.submit("hero_1", Action::item("MEDICINE", "hero_1")).await,
        Err(BattleError::OutOfItem("MEDICINE".to_string()))
    );
    assert_eq!(
        battle
            .submit("hero_1", Action::item("REVIVAL_BEAD", "enemy_1"))
            .await,
        Err(BattleError::InvalidTarget(
            "Burning Beetle is not an ally".to_string()
        ))
    );

    battle
        .submit("hero_1", Action::item("REVIVAL_BEAD", "hero_2"))
        .await
        .unwrap();
    assert_eq!(battle.state().await.inventory().count("REVIVAL_BEAD"), 0);
}

/// Test: Healing items cannot target the fallen
#[tokio::test]
async fn test_medicine_rejects_fallen_ally() {
    let battle = BattleSetup::new(&["hero_1", "hero_2"])
        .hp("hero_2", 0)
        .start()
        .await;

    assert_eq!(
        battle.submit("hero_1", Action::item("MEDICINE", "hero_2")).await,
        Err(BattleError::InvalidTarget("Chie is defeated".to_string()))
    );
    assert_eq!(battle.state().await.inventory().count("MEDICINE"), 5);
}
