//! Battle engine
//!
//! The single writer of a battle. Presentation reads snapshots, listens
//! to events, and submits hero actions; everything else (enemy turns,
//! dead-unit skips, bonus turns, the all-out finisher, the victory hang)
//! is driven here.
//!
//! The state lock is never held across a pause, so reads stay available
//! while a turn plays out. A turn lock keeps sequences from overlapping:
//! anything submitted while one runs is rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::action::{Action, ActionTarget};
use super::ai;
use super::all_out::{self, AllOutStage};
use super::events::{BattleEvent, Notice};
use super::outcome;
use super::pacing::{Cue, Pacer, Pacing, TokioPacer};
use super::resolver;
use super::state::{BattleState, Phase};
use crate::combat::{BattleRng, SeededRng, Unit};
use crate::content::{Content, ItemEffect, NavEvent, TargetMode, BASIC_ATTACK_ID};
use crate::error::BattleError;
use crate::navigator::AdviceProvider;

/// Events buffered per subscriber before it starts lagging
pub const EVENT_CAPACITY: usize = 1024;

/// What the driver does next
enum Step {
    /// Waiting on a hero, or the battle is over
    Wait,
    Enemy { unit_id: String, action: Action },
    VictoryHang,
}

/// Owner and driver of one battle
pub struct BattleEngine {
    state: RwLock<BattleState>,
    content: Arc<Content>,
    /// Combat rolls and enemy choices
    rng: Mutex<Box<dyn BattleRng>>,
    /// Navigator line picks
    flavor: Mutex<Box<dyn BattleRng>>,
    pacing: Pacing,
    pacer: Arc<dyn Pacer>,
    navigator: Option<Arc<dyn AdviceProvider>>,
    /// An advice request is out, whichever battle asked
    advising: AtomicBool,
    events: broadcast::Sender<BattleEvent>,
    turn: tokio::sync::Mutex<()>,
}

impl BattleEngine {
    /// Create a new engine around a prepared battle
    pub fn new(content: Arc<Content>, state: BattleState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(state),
            content,
            rng: Mutex::new(Box::new(SeededRng::from_os())),
            flavor: Mutex::new(Box::new(SeededRng::from_os())),
            pacing: Pacing::default(),
            pacer: Arc::new(TokioPacer),
            navigator: None,
            advising: AtomicBool::new(false),
            events,
            turn: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a new engine for a party against the enemy roster
    pub fn initialize<S: AsRef<str>>(content: Arc<Content>, party: &[S]) -> Result<Self, BattleError> {
        let state = BattleState::new(&content, party)?;
        info!("Battle {} initialized", state.id);
        Ok(Self::new(content, state))
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_rng(mut self, rng: impl BattleRng + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn with_flavor_rng(mut self, rng: impl BattleRng + 'static) -> Self {
        self.flavor = Mutex::new(Box::new(rng));
        self
    }

    /// Seed both rollers (OS entropy when None)
    pub fn with_seed(self, seed: Option<u64>) -> Self {
        self.with_rng(SeededRng::new(seed))
            .with_flavor_rng(SeededRng::new(seed.map(|s| s.wrapping_add(1))))
    }

    pub fn with_navigator(mut self, provider: Arc<dyn AdviceProvider>) -> Self {
        self.navigator = Some(provider);
        self
    }

    /// Create a shared instance
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Listen to battle events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.events.subscribe()
    }

    /// Read-only copy of the battle
    pub async fn snapshot(&self) -> BattleState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase()
    }

    pub async fn current_unit(&self) -> Option<Unit> {
        self.state.read().await.current_unit().cloned()
    }

    pub async fn living_enemies(&self) -> Vec<Unit> {
        let state = self.state.read().await;
        state.living_enemies().into_iter().cloned().collect()
    }

    pub async fn living_heroes(&self) -> Vec<Unit> {
        let state = self.state.read().await;
        state.living_heroes().into_iter().cloned().collect()
    }

    /// The hero up right now may launch an All-Out Attack
    pub async fn can_all_out(&self) -> bool {
        let state = self.state.read().await;
        state
            .current_unit_id()
            .is_some_and(|id| all_out::is_available(&state, id))
    }

    fn busy() -> BattleError {
        BattleError::NotAcceptingInput {
            phase: Phase::Processing,
        }
    }

    /// Replace the battle with a fresh one for a new party
    pub async fn initialize_battle<S: AsRef<str>>(&self, party: &[S]) -> Result<(), BattleError> {
        let _turn = self.turn.try_lock().map_err(|_| Self::busy())?;
        let mut fresh = BattleState::new(&self.content, party)?;
        fresh.set_navigating(self.advising.load(Ordering::Acquire));
        info!("Battle {} initialized", fresh.id);
        *self.state.write().await = fresh;
        Ok(())
    }

    /// Play the entrance and run turns until a hero needs input
    pub async fn start(&self) -> Result<(), BattleError> {
        let _turn = self.turn.try_lock().map_err(|_| Self::busy())?;
        {
            let state = self.state.read().await;
            if state.phase() != Phase::Start {
                return Err(BattleError::NotAcceptingInput {
                    phase: state.phase(),
                });
            }
        }

        let mut cue = Some(Cue::EntranceBanner);
        while let Some(current) = cue {
            self.pause(current).await;
            cue = current.next();
        }

        {
            let mut state = self.state.write().await;
            info!("Battle {} started", state.id);
            state.cue(NavEvent::Start);
            state.set_phase(Phase::TurnStart);
            self.flush(&mut state);
        }

        self.drive().await;
        Ok(())
    }

    /// Commit a hero's action and play the battle forward.
    ///
    /// Returns once a hero needs input again or the battle is over.
    /// Rejected actions leave the battle untouched.
    pub async fn submit_action(&self, unit_id: &str, action: Action) -> Result<(), BattleError> {
        let _turn = self.turn.try_lock().map_err(|_| Self::busy())?;
        {
            let mut state = self.state.write().await;
            validate(&state, &self.content, unit_id, &action)?;
            debug!("{} submits {}", unit_id, action);
            if action == Action::AllOut {
                all_out::begin(&mut state);
            } else {
                state.set_phase(Phase::Processing);
            }
            self.flush(&mut state);
        }

        if action == Action::AllOut {
            self.run_all_out().await;
        } else {
            self.pause(Cue::Resolve).await;
            self.resolve(unit_id, &action).await;
        }

        self.drive().await;
        Ok(())
    }

    /// Give up the current hero's turn
    pub async fn advance_turn(&self) -> Result<(), BattleError> {
        let _turn = self.turn.try_lock().map_err(|_| Self::busy())?;
        {
            let mut state = self.state.write().await;
            match state.phase() {
                Phase::PlayerInput | Phase::TurnStart => {}
                Phase::Victory | Phase::Defeat => return Err(BattleError::BattleOver),
                phase => return Err(BattleError::NotAcceptingInput { phase }),
            }
            state.advance_turn();
            self.flush(&mut state);
        }
        self.drive().await;
        Ok(())
    }

    /// Ask the navigator for advice in the background.
    ///
    /// Ignored (None) while a request is already out or with no navigator.
    /// Turns keep running while it is pending. Advice that comes back after
    /// the battle was replaced is dropped.
    pub async fn request_advice(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let provider = self.navigator.clone()?;
        let snapshot = {
            let mut state = self.state.write().await;
            if self
                .advising
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                debug!("Navigator busy, ignoring advice request");
                return None;
            }
            state.set_navigating(true);
            state.clone()
        };

        let engine = Arc::clone(self);
        Some(tokio::spawn(async move {
            let advice = provider.tactical_advice(&snapshot).await;
            let mut state = engine.state.write().await;
            engine.advising.store(false, Ordering::Release);
            state.set_navigating(false);
            if state.id != snapshot.id {
                debug!("Dropping advice for replaced battle {}", snapshot.id);
                return;
            }
            state.set_navigator_message(advice.clone());
            state.emit(BattleEvent::NavigatorAdvice(advice));
            engine.flush(&mut state);
        }))
    }

    async fn pause(&self, cue: Cue) {
        self.pacer.pause(cue, self.pacing.delay(cue)).await;
    }

    async fn resolve(&self, unit_id: &str, action: &Action) {
        let mut state = self.state.write().await;
        let end = {
            let mut rng = self.rng.lock();
            resolver::execute(&mut state, &self.content, unit_id, action, &mut **rng)
        };
        debug!("{} {} -> {:?}", unit_id, action, end);
        self.flush(&mut state);
    }

    async fn run_all_out(&self) {
        let mut stage = Some(AllOutStage::first());
        while let Some(current) = stage {
            {
                let mut state = self.state.write().await;
                all_out::enter_stage(&mut state, current);
                self.flush(&mut state);
            }
            self.pause(current.cue()).await;
            stage = current.next();
        }

        let mut state = self.state.write().await;
        all_out::finish(&mut state);
        self.flush(&mut state);
    }

    /// Run turns until a hero is up or the battle ends
    async fn drive(&self) {
        loop {
            let step = {
                let mut state = self.state.write().await;
                let step = self.next_step(&mut state);
                self.flush(&mut state);
                step
            };

            match step {
                Step::Wait => return,
                Step::Enemy { unit_id, action } => {
                    self.pause(Cue::Resolve).await;
                    self.resolve(&unit_id, &action).await;
                }
                Step::VictoryHang => {
                    self.pause(Cue::VictoryHang).await;
                    let mut state = self.state.write().await;
                    outcome::conclude_victory(&mut state);
                    self.flush(&mut state);
                }
            }
        }
    }

    fn next_step(&self, state: &mut BattleState) -> Step {
        outcome::check(state);

        match state.phase() {
            Phase::VictoryPending => Step::VictoryHang,
            Phase::TurnStart => {
                let Some(unit_id) = state.settle_turn() else {
                    return Step::Wait;
                };
                let is_hero = state.unit(&unit_id).is_some_and(|u| u.is_hero());
                if is_hero {
                    state.set_phase(Phase::PlayerInput);
                    return Step::Wait;
                }

                let action = {
                    let mut rng = self.rng.lock();
                    ai::choose_enemy_action(state, &self.content, &unit_id, &mut **rng)
                };
                state.set_phase(Phase::Processing);
                Step::Enemy { unit_id, action }
            }
            _ => Step::Wait,
        }
    }

    /// Broadcast queued notices, picking navigator lines as they come up
    fn flush(&self, state: &mut BattleState) {
        for notice in state.take_notices() {
            match notice {
                Notice::Event(event) => {
                    let _ = self.events.send(event);
                }
                Notice::Cue(event) => {
                    let line = {
                        let mut flavor = self.flavor.lock();
                        self.content
                            .lines()
                            .pick(event, &mut **flavor)
                            .map(str::to_string)
                    };
                    if let Some(line) = line {
                        state.set_navigator_message(line.clone());
                        let _ = self.events.send(BattleEvent::NavigatorLine { event, line });
                    }
                }
            }
        }
    }
}

/// Check a submitted action against the current state
fn validate(
    state: &BattleState,
    content: &Content,
    unit_id: &str,
    action: &Action,
) -> Result<(), BattleError> {
    match state.phase() {
        Phase::PlayerInput => {}
        Phase::Victory | Phase::Defeat => return Err(BattleError::BattleOver),
        phase => return Err(BattleError::NotAcceptingInput { phase }),
    }

    let unit = state
        .unit(unit_id)
        .ok_or_else(|| BattleError::UnitNotFound(unit_id.to_string()))?;
    if state.current_unit_id() != Some(unit_id) {
        return Err(BattleError::NotCurrentUnit(unit_id.to_string()));
    }
    if unit.is_dead() {
        return Err(BattleError::UnitDefeated(unit_id.to_string()));
    }
    if !unit.is_hero() {
        return Err(BattleError::NotAHero(unit_id.to_string()));
    }

    match action {
        Action::Attack { target } => foe_target(state, unit, target),
        Action::Skill { skill_id, target } => {
            let skill = content
                .skill(skill_id)
                .ok_or_else(|| BattleError::UnknownSkill(skill_id.clone()))?;
            if skill.id != BASIC_ATTACK_ID && !unit.knows(skill_id) {
                return Err(BattleError::SkillNotKnown {
                    unit: unit.id.clone(),
                    skill: skill_id.clone(),
                });
            }
            if unit.sp() < skill.cost {
                return Err(BattleError::InsufficientSp {
                    skill: skill_id.clone(),
                    have: unit.sp(),
                    cost: skill.cost,
                });
            }
            match (skill.target, target) {
                (TargetMode::All, _) => Ok(()),
                (TargetMode::Single, ActionTarget::All) => Err(BattleError::InvalidTarget(format!(
                    "{} needs a single target",
                    skill.name
                ))),
                (TargetMode::Single, ActionTarget::Unit(id)) if skill.is_healing() => {
                    ally_target(state, unit, id, false)
                }
                (TargetMode::Single, ActionTarget::Unit(id)) => foe_target(state, unit, id),
            }
        }
        Action::Item { item_id, target } => {
            let item = content
                .item(item_id)
                .ok_or_else(|| BattleError::UnknownItem(item_id.clone()))?;
            if state.inventory().count(item_id) == 0 {
                return Err(BattleError::OutOfItem(item_id.clone()));
            }
            let allow_dead = matches!(item.effect, ItemEffect::Revive { .. });
            ally_target(state, unit, target, allow_dead)
        }
        Action::AllOut => {
            if all_out::is_available(state, unit_id) {
                Ok(())
            } else {
                Err(BattleError::AllOutUnavailable)
            }
        }
        Action::Guard | Action::Skip => Ok(()),
    }
}

fn foe_target(state: &BattleState, actor: &Unit, target_id: &str) -> Result<(), BattleError> {
    match state.unit(target_id) {
        Some(target) if target.faction != actor.faction && target.is_alive() => Ok(()),
        Some(target) if target.faction == actor.faction => Err(BattleError::InvalidTarget(format!(
            "{} is an ally",
            target.name
        ))),
        Some(target) => Err(BattleError::InvalidTarget(format!("{} is already down for good", target.name))),
        None => Err(BattleError::InvalidTarget(target_id.to_string())),
    }
}

fn ally_target(
    state: &BattleState,
    actor: &Unit,
    target_id: &str,
    allow_dead: bool,
) -> Result<(), BattleError> {
    match state.unit(target_id) {
        Some(target) if target.faction != actor.faction => Err(BattleError::InvalidTarget(format!(
            "{} is not an ally",
            target.name
        ))),
        Some(target) if target.is_dead() && !allow_dead => Err(BattleError::InvalidTarget(format!(
            "{} is defeated",
            target.name
        ))),
        Some(_) => Ok(()),
        None => Err(BattleError::InvalidTarget(target_id.to_string())),
    }
}
