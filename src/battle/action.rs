//! Actions a unit can commit to for its turn

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who a skill is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTarget {
    /// A single unit by id
    Unit(String),
    /// Every living unit on the affected side
    All,
}

impl ActionTarget {
    /// Target id for single-target actions
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            ActionTarget::Unit(id) => Some(id),
            ActionTarget::All => None,
        }
    }
}

/// A committed choice, consumed once by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Basic zero-cost physical attack
    Attack { target: String },
    Skill {
        skill_id: String,
        target: ActionTarget,
    },
    Item { item_id: String, target: String },
    /// Halve incoming damage and block knockdown until the next own turn
    Guard,
    /// Finisher, only when every living enemy is down
    AllOut,
    /// Unit cannot act
    Skip,
}

impl Action {
    pub fn attack(target: &str) -> Self {
        Action::Attack {
            target: target.to_string(),
        }
    }

    pub fn skill(skill_id: &str, target: &str) -> Self {
        Action::Skill {
            skill_id: skill_id.to_string(),
            target: ActionTarget::Unit(target.to_string()),
        }
    }

    pub fn skill_all(skill_id: &str) -> Self {
        Action::Skill {
            skill_id: skill_id.to_string(),
            target: ActionTarget::All,
        }
    }

    pub fn item(item_id: &str, target: &str) -> Self {
        Action::Item {
            item_id: item_id.to_string(),
            target: target.to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack { target } => write!(f, "ATTACK {}", target),
            Action::Skill { skill_id, target } => match target {
                ActionTarget::Unit(id) => write!(f, "SKILL {} -> {}", skill_id, id),
                ActionTarget::All => write!(f, "SKILL {} -> ALL", skill_id),
            },
            Action::Item { item_id, target } => write!(f, "ITEM {} -> {}", item_id, target),
            Action::Guard => write!(f, "GUARD"),
            Action::AllOut => write!(f, "ALL_OUT"),
            Action::Skip => write!(f, "SKIP"),
        }
    }
}
