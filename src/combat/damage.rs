//! Damage calculation
//!
//! Handles the hit pipeline with:
//! - Attacker scaling (heroes hit harder than enemies)
//! - Random variance
//! - Guard (50% damage, no knockdown)
//! - Weakness (150% damage, knockdown)
//! - Critical (150% damage, knockdown)
//! - Resistance (50% damage)

use std::fmt;

use serde::{Deserialize, Serialize};

use super::roll::BattleRng;
use crate::content::{Element, Faction};

/// Qualifier attached to a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTag {
    /// Target was guarding - takes 50% damage
    Blocked,
    /// Target is weak to the element - takes 150% damage and goes down
    Weakness,
    /// Critical roll - 150% damage and the target goes down
    Critical,
    /// Target resists the element - takes 50% damage
    Resisted,
}

impl HitTag {
    /// Damage multiplier for this qualifier
    pub fn multiplier(&self) -> f64 {
        match self {
            HitTag::Blocked | HitTag::Resisted => 0.5,
            HitTag::Weakness | HitTag::Critical => 1.5,
        }
    }

    /// Apply this qualifier to a damage amount (rounded down)
    pub fn apply(&self, damage: i32) -> i32 {
        (damage as f64 * self.multiplier()).floor() as i32
    }

    /// Knockdown caused by this qualifier, if any
    pub fn down_cause(&self) -> Option<DownCause> {
        match self {
            HitTag::Weakness => Some(DownCause::Weak),
            HitTag::Critical => Some(DownCause::Critical),
            HitTag::Blocked | HitTag::Resisted => None,
        }
    }
}

impl fmt::Display for HitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HitTag::Blocked => "Blocked",
            HitTag::Weakness => "WEAKNESS!",
            HitTag::Critical => "CRITICAL HIT!",
            HitTag::Resisted => "Resisted",
        };
        write!(f, "{}", s)
    }
}

/// Why a unit is knocked down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DownCause {
    Weak,
    Critical,
}

impl fmt::Display for DownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownCause::Weak => write!(f, "WEAK"),
            DownCause::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Power scaling applied by the attacker's side
pub fn attacker_factor(faction: Faction) -> f64 {
    match faction {
        Faction::Hero => 2.0,
        Faction::Enemy => 1.5,
    }
}

/// Damage before variance and qualifiers
pub fn base_damage(power: i32, attacker: Faction) -> i32 {
    (power as f64 * attacker_factor(attacker)).floor() as i32
}

/// Result of a damage calculation
#[derive(Debug, Clone, PartialEq)]
pub struct DamageResult {
    /// Damage after variance, before qualifiers
    pub base_damage: i32,
    /// Damage after qualifiers
    pub final_damage: i32,
    /// Element of the hit
    pub element: Element,
    /// Qualifier applied, if any
    pub tag: Option<HitTag>,
}

impl DamageResult {
    /// Knockdown this hit causes
    pub fn knockdown(&self) -> Option<DownCause> {
        self.tag.and_then(|t| t.down_cause())
    }
}

/// Elemental profile of a defender
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    weaknesses: Vec<Element>,
    resistances: Vec<Element>,
}

impl DamageProfile {
    /// Create a new empty profile (all normal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile from weakness and resistance lists
    pub fn from_lists(weaknesses: &[Element], resistances: &[Element]) -> Self {
        let mut profile = Self::new();
        for e in weaknesses {
            profile.add_weakness(*e);
        }
        for e in resistances {
            profile.add_resistance(*e);
        }
        profile
    }

    /// Add a weakness
    pub fn add_weakness(&mut self, element: Element) {
        if !self.weaknesses.contains(&element) {
            self.weaknesses.push(element);
        }
    }

    /// Add a resistance
    pub fn add_resistance(&mut self, element: Element) {
        if !self.resistances.contains(&element) {
            self.resistances.push(element);
        }
    }

    pub fn is_weak_to(&self, element: Element) -> bool {
        self.weaknesses.contains(&element)
    }

    pub fn resists(&self, element: Element) -> bool {
        self.resistances.contains(&element)
    }

    pub fn weaknesses(&self) -> &[Element] {
        &self.weaknesses
    }

    pub fn resistances(&self) -> &[Element] {
        &self.resistances
    }

    /// Run a hit of `power` through variance and the qualifier chain.
    ///
    /// Rolls consumed: one variance roll, then one critical roll only
    /// when the target is neither guarding nor weak to the element.
    pub fn calculate_damage(
        &self,
        power: i32,
        attacker: Faction,
        element: Element,
        guarding: bool,
        rng: &mut dyn BattleRng,
    ) -> DamageResult {
        let base = base_damage(power, attacker);
        let rolled = (base as f64 * rng.variance()).floor() as i32;

        let tag = if guarding {
            Some(HitTag::Blocked)
        } else if self.is_weak_to(element) {
            Some(HitTag::Weakness)
        } else if rng.chance(element.critical_chance()) {
            Some(HitTag::Critical)
        } else if self.resists(element) {
            Some(HitTag::Resisted)
        } else {
            None
        };

        let final_damage = tag.map_or(rolled, |t| t.apply(rolled));

        DamageResult {
            base_damage: rolled,
            final_damage,
            element,
            tag,
        }
    }
}
