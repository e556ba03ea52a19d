//! Static content tables
//!
//! Immutable definitions consumed by the battle engine:
//! - Elements, skills and items
//! - Hero and enemy roster templates
//! - Navigator flavor-line pools
//!
//! Nothing in here is ever mutated once a battle starts. Units are
//! built from templates by copy, and the basic attack is a fresh value
//! rather than an edited table entry.

mod lines;
mod roster;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use lines::{NavEvent, NavigatorLines};

/// Elemental affinity of a skill, and the key for weaknesses/resistances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Physical (slash, strike, bash)
    Phys,
    Fire,
    Ice,
    Elec,
    Wind,
    /// Healing magic; never rolls for criticals
    Heal,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Phys,
            Element::Fire,
            Element::Ice,
            Element::Elec,
            Element::Wind,
            Element::Heal,
        ]
    }

    /// Chance that an unmodified hit of this element is critical
    pub fn critical_chance(&self) -> f64 {
        match self {
            Element::Phys => 0.20,
            Element::Fire | Element::Ice | Element::Elec | Element::Wind | Element::Heal => 0.0,
        }
    }
}

impl FromStr for Element {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phys" | "physical" => Ok(Element::Phys),
            "fire" | "agi" => Ok(Element::Fire),
            "ice" | "bufu" => Ok(Element::Ice),
            "elec" | "electric" | "zio" => Ok(Element::Elec),
            "wind" | "garu" => Ok(Element::Wind),
            "heal" | "healing" => Ok(Element::Heal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Element::Phys => "Physical",
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::Elec => "Elec",
            Element::Wind => "Wind",
            Element::Heal => "Heal",
        };
        write!(f, "{}", s)
    }
}

/// Which side of the battle a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Hero,
    Enemy,
}

impl Faction {
    /// The other side
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Hero => Faction::Enemy,
            Faction::Enemy => Faction::Hero,
        }
    }
}

/// How many units a skill or item touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    Single,
    All,
}

/// A named action template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// SP deducted from the user
    pub cost: i32,
    pub element: Element,
    /// Positive scales damage, negative is the heal magnitude
    pub power: i32,
    pub target: TargetMode,
}

/// Id of the synthetic basic attack
pub const BASIC_ATTACK_ID: &str = "ATTACK";

/// Power of the synthetic basic attack (same as Cleave)
pub const BASIC_ATTACK_POWER: i32 = 30;

impl Skill {
    /// The zero-cost physical attack every unit can use.
    ///
    /// Built fresh on each call so no shared table entry is ever
    /// rewritten to stand in for it.
    pub fn basic_attack() -> Self {
        Self {
            id: BASIC_ATTACK_ID.to_string(),
            name: "Attack".to_string(),
            cost: 0,
            element: Element::Phys,
            power: BASIC_ATTACK_POWER,
            target: TargetMode::Single,
        }
    }

    /// Whether this skill restores HP instead of dealing damage
    pub fn is_healing(&self) -> bool {
        self.power < 0
    }
}

/// What a consumable does to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore a flat amount of HP
    Heal { amount: i32 },
    /// Restore a flat amount of SP
    Sp { amount: i32 },
    /// Bring a dead unit back with a fraction of max HP
    Revive { fraction: f64 },
}

/// Consumable template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: ItemEffect,
    pub target: TargetMode,
}

/// Roster entry a battle unit is copied from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    pub max_hp: i32,
    pub max_sp: i32,
    pub weaknesses: Vec<Element>,
    pub resistances: Vec<Element>,
    /// Skill ids, resolved against the skill table
    pub skills: Vec<String>,
    /// Presentation hint, opaque to the engine
    pub color: String,
    /// Presentation hint, opaque to the engine
    pub portrait: Option<String>,
}

/// All content tables a battle needs
#[derive(Debug, Clone)]
pub struct Content {
    skills: HashMap<String, Skill>,
    items: HashMap<String, Item>,
    heroes: Vec<UnitTemplate>,
    enemies: Vec<UnitTemplate>,
    inventory: BTreeMap<String, u32>,
    lines: NavigatorLines,
}

impl Content {
    /// The built-in tables
    pub fn builtin() -> Self {
        let skills = roster::skills()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        let items = roster::items()
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect();

        Self {
            skills,
            items,
            heroes: roster::heroes(),
            enemies: roster::enemies(),
            inventory: roster::initial_inventory(),
            lines: NavigatorLines::builtin(),
        }
    }

    /// Create a shared instance
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::builtin())
    }

    /// Look up a skill by id. `ATTACK` yields a fresh basic attack.
    pub fn skill(&self, id: &str) -> Option<Skill> {
        if id == BASIC_ATTACK_ID {
            return Some(Skill::basic_attack());
        }
        self.skills.get(id).cloned()
    }

    /// Look up an item by id
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up a hero template by id
    pub fn hero(&self, id: &str) -> Option<&UnitTemplate> {
        self.heroes.iter().find(|h| h.id == id)
    }

    /// Hero roster in roster order
    pub fn heroes(&self) -> &[UnitTemplate] {
        &self.heroes
    }

    /// Enemy roster in roster order
    pub fn enemies(&self) -> &[UnitTemplate] {
        &self.enemies
    }

    /// Starting item counts for a new battle
    pub fn initial_inventory(&self) -> &BTreeMap<String, u32> {
        &self.inventory
    }

    /// Navigator flavor lines
    pub fn lines(&self) -> &NavigatorLines {
        &self.lines
    }

    /// Replace the hero roster
    pub fn with_heroes(mut self, heroes: Vec<UnitTemplate>) -> Self {
        self.heroes = heroes;
        self
    }

    /// Replace the enemy roster (encounter setup)
    pub fn with_enemies(mut self, enemies: Vec<UnitTemplate>) -> Self {
        self.enemies = enemies;
        self
    }

    /// Replace the starting inventory
    pub fn with_inventory(mut self, inventory: BTreeMap<String, u32>) -> Self {
        self.inventory = inventory;
        self
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}
