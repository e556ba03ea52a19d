//! Battle state
//!
//! The single mutable aggregate of an in-progress battle. Field access is
//! read-only from outside the crate; mutation goes through the resolver,
//! scheduler, outcome and all-out operations so the unit invariants stay
//! enforced in one place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::events::{Achievement, BattleEvent, Notice};
use crate::combat::Unit;
use crate::content::{Content, Faction, NavEvent};
use crate::error::BattleError;

/// Largest party the team screen allows
pub const MAX_PARTY_SIZE: usize = 3;

/// First log line of every battle
pub const OPENING_LINE: &str = "Battle Start! The Shadows approach!";

/// Battle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Start,
    TurnStart,
    PlayerInput,
    Processing,
    VictoryPending,
    Victory,
    Defeat,
}

impl Phase {
    /// No further turns run once terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Start => "START",
            Phase::TurnStart => "TURN_START",
            Phase::PlayerInput => "PLAYER_INPUT",
            Phase::Processing => "PROCESSING",
            Phase::VictoryPending => "VICTORY_PENDING",
            Phase::Victory => "VICTORY",
            Phase::Defeat => "DEFEAT",
        };
        write!(f, "{}", s)
    }
}

/// Remaining consumables by item id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new(counts: BTreeMap<String, u32>) -> Self {
        Self { counts }
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.counts.get(item_id).copied().unwrap_or(0)
    }

    /// Use one of an item. False (and no change) when none are left.
    pub fn take(&mut self, item_id: &str) -> bool {
        match self.counts.get_mut(item_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn add(&mut self, item_id: &str, amount: u32) {
        *self.counts.entry(item_id.to_string()).or_insert(0) += amount;
    }

    /// Items with at least one left
    pub fn available(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(id, c)| (id.as_str(), *c))
    }
}

/// Root aggregate of one battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub id: Uuid,
    units: Vec<Unit>,
    turn_order: Vec<String>,
    pub(crate) turn_index: usize,
    phase: Phase,
    pub(crate) one_more: bool,
    log: Vec<String>,
    pub(crate) inventory: Inventory,
    navigator_message: Option<String>,
    navigating: bool,
    achievements: BTreeSet<Achievement>,
    #[serde(skip)]
    outbox: Vec<Notice>,
}

impl BattleState {
    /// Build a fresh battle for the chosen party against the enemy roster.
    ///
    /// Party members keep roster order whatever order they were picked in,
    /// duplicates collapse, and the turn order is heroes then enemies.
    pub fn new<S: AsRef<str>>(content: &Content, party: &[S]) -> Result<Self, BattleError> {
        for id in party {
            if content.hero(id.as_ref()).is_none() {
                return Err(BattleError::InvalidParty(format!(
                    "unknown hero '{}'",
                    id.as_ref()
                )));
            }
        }

        let heroes: Vec<Unit> = content
            .heroes()
            .iter()
            .filter(|t| party.iter().any(|id| id.as_ref() == t.id))
            .map(Unit::from_template)
            .collect();

        if heroes.is_empty() {
            return Err(BattleError::InvalidParty("party is empty".to_string()));
        }
        if heroes.len() > MAX_PARTY_SIZE {
            return Err(BattleError::InvalidParty(format!(
                "party has {} members, at most {} allowed",
                heroes.len(),
                MAX_PARTY_SIZE
            )));
        }
        if content.enemies().is_empty() {
            return Err(BattleError::InvalidParty("no enemies to fight".to_string()));
        }

        let units: Vec<Unit> = heroes
            .into_iter()
            .chain(content.enemies().iter().map(Unit::from_template))
            .collect();
        let turn_order = units.iter().map(|u| u.id.clone()).collect();

        let id = Uuid::new_v4();
        debug!("Battle {} created with {} units", id, units.len());

        Ok(Self {
            id,
            units,
            turn_order,
            turn_index: 0,
            phase: Phase::Start,
            one_more: false,
            log: vec![OPENING_LINE.to_string()],
            inventory: Inventory::new(content.initial_inventory().clone()),
            navigator_message: None,
            navigating: false,
            achievements: BTreeSet::new(),
            outbox: Vec::new(),
        })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Mutable unit access for arranging a battle before it is handed to
    /// an engine. Unit mutators keep HP/SP clamped.
    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current unit is acting on a bonus turn
    pub fn is_one_more(&self) -> bool {
        self.one_more
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn navigator_message(&self) -> Option<&str> {
        self.navigator_message.as_deref()
    }

    /// An advice request is outstanding
    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn achievements(&self) -> &BTreeSet<Achievement> {
        &self.achievements
    }

    /// Living units of one side, in turn order
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.faction == faction && u.is_alive())
    }

    pub fn living_enemies(&self) -> Vec<&Unit> {
        self.living(Faction::Enemy).collect()
    }

    pub fn living_heroes(&self) -> Vec<&Unit> {
        self.living(Faction::Hero).collect()
    }

    /// At least one enemy lives and every living enemy is down
    pub fn all_enemies_down(&self) -> bool {
        let mut living = self.living(Faction::Enemy).peekable();
        living.peek().is_some() && living.all(|u| u.is_down())
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        let from = self.phase;
        self.phase = phase;
        debug!("Battle {} phase {} -> {}", self.id, from, phase);
        self.emit(BattleEvent::PhaseChanged { from, to: phase });
    }

    pub(crate) fn push_log(&mut self, line: String) {
        self.log.push(line.clone());
        self.emit(BattleEvent::Log(line));
    }

    pub(crate) fn set_navigator_message(&mut self, message: String) {
        self.navigator_message = Some(message);
    }

    pub(crate) fn set_navigating(&mut self, navigating: bool) {
        self.navigating = navigating;
    }

    /// Record an achievement, notifying only the first time
    pub(crate) fn unlock(&mut self, achievement: Achievement) {
        if self.achievements.insert(achievement) {
            self.emit(BattleEvent::Achievement(achievement));
        }
    }

    pub(crate) fn emit(&mut self, event: BattleEvent) {
        self.outbox.push(Notice::Event(event));
    }

    /// Ask for navigator commentary on an event
    pub(crate) fn cue(&mut self, event: NavEvent) {
        self.outbox.push(Notice::Cue(event));
    }

    /// Drain queued notifications in the order they happened
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.outbox)
    }
}
