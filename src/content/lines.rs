//! Navigator flavor-text pools keyed by battle event

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::BattleRng;

/// Battle moments the navigator has something to say about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavEvent {
    Start,
    Victory,
    WeaknessHit,
    CriticalHit,
    PlayerMiss,
    EnemyMiss,
    AllyDown,
    AllOutAttack,
}

impl NavEvent {
    pub fn all() -> &'static [NavEvent] {
        &[
            NavEvent::Start,
            NavEvent::Victory,
            NavEvent::WeaknessHit,
            NavEvent::CriticalHit,
            NavEvent::PlayerMiss,
            NavEvent::EnemyMiss,
            NavEvent::AllyDown,
            NavEvent::AllOutAttack,
        ]
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavEvent::Start => "START",
            NavEvent::Victory => "VICTORY",
            NavEvent::WeaknessHit => "WEAKNESS_HIT",
            NavEvent::CriticalHit => "CRITICAL_HIT",
            NavEvent::PlayerMiss => "PLAYER_MISS",
            NavEvent::EnemyMiss => "ENEMY_MISS",
            NavEvent::AllyDown => "ALLY_DOWN",
            NavEvent::AllOutAttack => "ALL_OUT_ATTACK",
        };
        write!(f, "{}", s)
    }
}

/// Registry of navigator lines
#[derive(Debug, Clone, Default)]
pub struct NavigatorLines {
    pools: HashMap<NavEvent, Vec<String>>,
}

impl NavigatorLines {
    /// The built-in pools
    pub fn builtin() -> Self {
        let mut lines = Self::default();

        lines.set(
            NavEvent::Start,
            &[
                "Here they come! Get ready, everyone!",
                "Shadows detected! Let's do this!",
                "Enemy reading confirmed! Be careful!",
            ],
        );
        lines.set(
            NavEvent::Victory,
            &[
                "All right! That was amazing!",
                "Enemy eliminated! Good job, Senpai!",
                "We did it! Is everyone okay?",
            ],
        );
        lines.set(
            NavEvent::WeaknessHit,
            &[
                "Yes! You hit them right where it hurts!",
                "Nice one! Their defenses are down!",
                "It's super effective! ...Wait, wrong game!",
                "That's it! Keep hitting their weakness!",
            ],
        );
        lines.set(
            NavEvent::CriticalHit,
            &[
                "Whoa! That was a massive hit!",
                "Critical hit! You're on fire!",
                "Amazing power! They didn't stand a chance!",
            ],
        );
        lines.set(
            NavEvent::PlayerMiss,
            &[
                "Oh no! You missed!",
                "Careful! It's moving fast!",
                "Don't let it get to you! Try again!",
            ],
        );
        lines.set(
            NavEvent::EnemyMiss,
            &[
                "Haha! They can't hit us!",
                "Looking cool, Senpai! You dodged it!",
                "Missed by a mile! Keep it up!",
            ],
        );
        lines.set(
            NavEvent::AllyDown,
            &[
                "Someone's down! We need healing, stat!",
                "Oh no! Senpai, help them!",
                "Critical damage to ally! Be careful!",
            ],
        );
        lines.set(
            NavEvent::AllOutAttack,
            &[
                "Get 'em! All-Out Attack!",
                "This is our chance! Finish them off!",
                "Go, everyone! Show them our power!",
            ],
        );

        lines
    }

    /// Replace the pool for an event
    pub fn set(&mut self, event: NavEvent, lines: &[&str]) {
        self.pools
            .insert(event, lines.iter().map(|l| l.to_string()).collect());
    }

    /// All lines for an event
    pub fn pool(&self, event: NavEvent) -> &[String] {
        self.pools.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Draw one line uniformly at random
    pub fn pick(&self, event: NavEvent, rng: &mut dyn BattleRng) -> Option<&str> {
        let pool = self.pool(event);
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.pick(pool.len())].as_str())
    }
}
