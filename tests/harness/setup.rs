//! BattleSetup - arrange a battle before the engine takes over
//!
//! Units always start at full HP/SP; the builder applies damage, SP
//! spending, knockdowns and extra skills on top of the fresh state.

#![allow(dead_code)]

use std::sync::Arc;

use onemore::battle::{BattleEngine, BattleState, Pacing, RecordingPacer};
use onemore::combat::{DownCause, ScriptedRng, NEUTRAL_ROLL};
use onemore::content::{Content, UnitTemplate};
use onemore::navigator::AdviceProvider;

use super::battle::TestBattle;

type Arrangement = Box<dyn FnOnce(&mut BattleState) + Send>;

/// Builder for a test battle
pub struct BattleSetup {
    content: Content,
    party: Vec<String>,
    rolls: Vec<f64>,
    fallback: f64,
    seed: Option<u64>,
    pacing: Pacing,
    navigator: Option<Arc<dyn AdviceProvider>>,
    arrangements: Vec<Arrangement>,
}

impl BattleSetup {
    /// Builtin content, the given party, neutral rolls
    pub fn new(party: &[&str]) -> Self {
        Self {
            content: Content::builtin(),
            party: party.iter().map(|s| s.to_string()).collect(),
            rolls: Vec::new(),
            fallback: NEUTRAL_ROLL,
            seed: None,
            pacing: Pacing::default(),
            navigator: None,
            arrangements: Vec::new(),
        }
    }

    /// Fight only the listed builtin enemies, in the given order
    pub fn enemies(mut self, ids: &[&str]) -> Self {
        let roster: Vec<UnitTemplate> = ids
            .iter()
            .filter_map(|id| self.content.enemies().iter().find(|e| e.id == *id).cloned())
            .collect();
        self.content = self.content.with_enemies(roster);
        self
    }

    /// Edit a hero template before the battle is built
    pub fn hero_template(mut self, id: &str, edit: impl FnOnce(&mut UnitTemplate)) -> Self {
        let mut heroes = self.content.heroes().to_vec();
        if let Some(hero) = heroes.iter_mut().find(|h| h.id == id) {
            edit(hero);
        }
        self.content = self.content.with_heroes(heroes);
        self
    }

    /// Replace the content tables outright
    pub fn content(mut self, edit: impl FnOnce(Content) -> Content) -> Self {
        self.content = edit(self.content);
        self
    }

    /// Scripted combat rolls, consumed in order
    pub fn rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Roll returned once the script runs out
    pub fn fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Use seeded rollers instead of a script
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn navigator(mut self, provider: Arc<dyn AdviceProvider>) -> Self {
        self.navigator = Some(provider);
        self
    }

    fn arrange(mut self, f: impl FnOnce(&mut BattleState) + Send + 'static) -> Self {
        self.arrangements.push(Box::new(f));
        self
    }

    /// Bring a unit down to the given HP (0 defeats it)
    pub fn hp(self, unit_id: &str, hp: i32) -> Self {
        let id = unit_id.to_string();
        self.arrange(move |state| {
            let unit = state.unit_mut(&id).expect("unknown unit");
            let loss = unit.hp() - hp;
            unit.take_damage(loss);
        })
    }

    /// Bring a unit's SP down to the given value
    pub fn sp(self, unit_id: &str, sp: i32) -> Self {
        let id = unit_id.to_string();
        self.arrange(move |state| {
            let unit = state.unit_mut(&id).expect("unknown unit");
            let spend = unit.sp() - sp;
            unit.spend_sp(spend);
        })
    }

    pub fn down(self, unit_id: &str, cause: DownCause) -> Self {
        let id = unit_id.to_string();
        self.arrange(move |state| {
            state.unit_mut(&id).expect("unknown unit").knock_down(cause);
        })
    }

    pub fn guarding(self, unit_id: &str) -> Self {
        let id = unit_id.to_string();
        self.arrange(move |state| {
            state.unit_mut(&id).expect("unknown unit").guard();
        })
    }

    /// Give a unit a skill it does not normally know
    pub fn teach(self, unit_id: &str, skill_id: &str) -> Self {
        let id = unit_id.to_string();
        let skill = skill_id.to_string();
        self.arrange(move |state| {
            state.unit_mut(&id).expect("unknown unit").skills.push(skill);
        })
    }

    /// Build the engine without starting the battle
    pub fn build(self) -> TestBattle {
        let content = Arc::new(self.content);
        let mut state = BattleState::new(&content, self.party.as_slice()).expect("invalid party");
        for arrangement in self.arrangements {
            arrangement(&mut state);
        }

        let pacer = Arc::new(RecordingPacer::new());
        let mut engine = BattleEngine::new(content, state)
            .with_pacing(self.pacing)
            .with_pacer(pacer.clone());
        engine = match self.seed {
            Some(seed) => engine.with_seed(Some(seed)),
            None => engine
                .with_rng(ScriptedRng::new(self.rolls).with_fallback(self.fallback))
                .with_flavor_rng(ScriptedRng::default()),
        };
        if let Some(provider) = self.navigator {
            engine = engine.with_navigator(provider);
        }

        TestBattle::new(engine.shared(), pacer)
    }

    /// Build the engine and play the entrance
    pub async fn start(self) -> TestBattle {
        let battle = self.build();
        battle.engine.start().await.expect("battle failed to start");
        battle
    }
}
