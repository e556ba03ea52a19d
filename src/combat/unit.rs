//! Battle units
//!
//! A unit is a hero or enemy copied from a roster template. HP and SP
//! are private so every change goes through a clamping mutator:
//! `0 <= hp <= max_hp`, `0 <= sp <= max_sp`, and a dead unit is never
//! down.

use serde::{Deserialize, Serialize};

use super::damage::{DamageProfile, DownCause};
use crate::content::{Faction, UnitTemplate};

/// A combatant in an active battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    hp: i32,
    max_hp: i32,
    sp: i32,
    max_sp: i32,
    /// Weaknesses and resistances
    pub profile: DamageProfile,
    /// Known skill ids
    pub skills: Vec<String>,
    down: Option<DownCause>,
    guarding: bool,
    /// Presentation hints
    pub color: String,
    pub portrait: Option<String>,
}

impl Unit {
    /// Fresh unit at full HP/SP from a roster template
    pub fn from_template(template: &UnitTemplate) -> Self {
        let max_hp = template.max_hp.max(1);
        let max_sp = template.max_sp.max(0);

        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            faction: template.faction,
            hp: max_hp,
            max_hp,
            sp: max_sp,
            max_sp,
            profile: DamageProfile::from_lists(&template.weaknesses, &template.resistances),
            skills: template.skills.clone(),
            down: None,
            guarding: false,
            color: template.color.clone(),
            portrait: template.portrait.clone(),
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn sp(&self) -> i32 {
        self.sp
    }

    pub fn max_sp(&self) -> i32 {
        self.max_sp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_hero(&self) -> bool {
        self.faction == Faction::Hero
    }

    pub fn is_enemy(&self) -> bool {
        self.faction == Faction::Enemy
    }

    /// Knocked down (only ever true while alive)
    pub fn is_down(&self) -> bool {
        self.down.is_some()
    }

    /// Why the unit is down
    pub fn down_cause(&self) -> Option<DownCause> {
        self.down
    }

    pub fn is_guarding(&self) -> bool {
        self.guarding
    }

    /// Whether the unit knows a skill
    pub fn knows(&self, skill_id: &str) -> bool {
        self.skills.iter().any(|s| s == skill_id)
    }

    /// HP as a whole percentage of max
    pub fn hp_percent(&self) -> i32 {
        self.hp * 100 / self.max_hp
    }

    /// Take damage (returns HP actually lost)
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        if self.is_dead() {
            self.down = None;
        }
        before - self.hp
    }

    /// Heal (cannot exceed max_hp, no effect on the dead)
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let actual = amount.max(0).min(self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    /// Restore SP (cannot exceed max_sp)
    pub fn restore_sp(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max_sp - self.sp);
        self.sp += actual;
        actual
    }

    /// Spend SP, never going below zero (returns SP actually spent)
    pub fn spend_sp(&mut self, cost: i32) -> i32 {
        let actual = cost.max(0).min(self.sp);
        self.sp -= actual;
        actual
    }

    /// Knock the unit down. Ignored for the dead.
    pub fn knock_down(&mut self, cause: DownCause) -> bool {
        if self.is_dead() {
            return false;
        }
        self.down = Some(cause);
        true
    }

    /// Take a guarding stance until the next own turn
    pub fn guard(&mut self) {
        self.guarding = true;
    }

    /// Down and guard expire when the unit's own turn begins
    pub fn begin_turn(&mut self) {
        self.down = None;
        self.guarding = false;
    }

    /// Revive a dead unit with a fraction of max HP.
    /// Returns the new HP, or None if the unit was alive.
    pub fn revive(&mut self, fraction: f64) -> Option<i32> {
        if self.is_alive() {
            return None;
        }
        self.hp = ((self.max_hp as f64 * fraction).floor() as i32).clamp(0, self.max_hp);
        self.down = None;
        Some(self.hp)
    }

    /// Drop straight to zero HP
    pub fn defeat(&mut self) {
        self.hp = 0;
        self.down = None;
    }
}
