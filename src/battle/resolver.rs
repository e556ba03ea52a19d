//! Action resolver
//!
//! Applies one committed action from one unit to the battle state:
//! - Attacks and skills: SP cost, miss roll, damage or healing per target
//! - Knockdown and the bonus-turn flag
//! - Items: inventory use and HEAL/SP/REVIVE effects
//! - Guard and skip
//!
//! Every resolution appends exactly one log line. The caller has already
//! validated legality; contract violations (dead actor, unknown content,
//! missing target) log a warning and degrade to a no-op.

use tracing::{debug, warn};

use super::action::{Action, ActionTarget};
use super::all_out::{self, AllOutResult, AllOutStage};
use super::events::{Achievement, BattleEvent, EffectMarker};
use super::outcome::{self, Verdict};
use super::state::BattleState;
use crate::combat::{BattleRng, DownCause, HitTag};
use crate::content::{Content, Faction, ItemEffect, NavEvent, Skill, TargetMode};

/// Probability that a non-healing attack or skill misses
pub const MISS_CHANCE: f64 = 0.10;

/// Effects of one action, before the turn epilogue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Log line describing the action
    pub line: String,
    pub actor_name: String,
    /// Some target was knocked down (bonus-turn trigger)
    pub knocked_down: bool,
    pub missed: bool,
    pub weakness: bool,
    pub critical: bool,
    /// A hero fell to this action
    pub ally_down: bool,
}

impl Resolution {
    fn new(actor_name: &str, line: String) -> Self {
        Self {
            line,
            actor_name: actor_name.to_string(),
            ..Default::default()
        }
    }
}

/// How the acting unit's turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    /// Same unit acts again
    OneMore,
    /// Cursor moved to the next unit
    Advanced,
    /// The battle was decided
    Decided(Verdict),
    /// An All-Out Attack ran to completion
    AllOut(AllOutResult),
}

struct Actor {
    id: String,
    name: String,
    faction: Faction,
}

/// Resolve an action and run the turn epilogue.
///
/// The outcome monitor runs before the epilogue, so a decisive hit never
/// grants a bonus turn. ALL_OUT runs the whole finisher without pauses.
pub fn execute(
    state: &mut BattleState,
    content: &Content,
    actor_id: &str,
    action: &Action,
    rng: &mut dyn BattleRng,
) -> TurnEnd {
    if let Action::AllOut = action {
        all_out::begin(state);
        let mut stage = Some(AllOutStage::first());
        while let Some(current) = stage {
            all_out::enter_stage(state, current);
            stage = current.next();
        }
        return TurnEnd::AllOut(all_out::finish(state));
    }

    let resolution = resolve(state, content, actor_id, action, rng);
    let verdict = outcome::evaluate(state);
    let bonus = resolution.knocked_down && !state.is_one_more() && verdict.is_none();

    let mut line = resolution.line;
    if bonus {
        line.push_str(&format!(" {} gets ONE MORE!", resolution.actor_name));
    }
    state.push_log(line);

    if let Some(verdict) = verdict {
        outcome::apply(state, verdict);
        return TurnEnd::Decided(verdict);
    }

    if bonus {
        state.grant_one_more();
        TurnEnd::OneMore
    } else {
        state.advance_turn();
        TurnEnd::Advanced
    }
}

/// Apply an action's effects without logging or moving the turn
pub fn resolve(
    state: &mut BattleState,
    content: &Content,
    actor_id: &str,
    action: &Action,
    rng: &mut dyn BattleRng,
) -> Resolution {
    let actor = match state.unit(actor_id) {
        Some(unit) if unit.is_alive() => Actor {
            id: unit.id.clone(),
            name: unit.name.clone(),
            faction: unit.faction,
        },
        Some(unit) => {
            warn!("Dead unit {} tried to act: {}", actor_id, action);
            return Resolution::new(&unit.name, format!("{} cannot move!", unit.name));
        }
        None => {
            warn!("Unknown unit {} tried to act: {}", actor_id, action);
            return Resolution::new(actor_id, format!("{} cannot move!", actor_id));
        }
    };

    debug!("{} resolves {}", actor.id, action);

    match action {
        Action::Attack { target } => resolve_skill(
            state,
            &actor,
            &Skill::basic_attack(),
            &ActionTarget::Unit(target.clone()),
            rng,
        ),
        Action::Skill { skill_id, target } => match content.skill(skill_id) {
            Some(skill) => resolve_skill(state, &actor, &skill, target, rng),
            None => {
                warn!("Unknown skill {} used by {}", skill_id, actor.id);
                Resolution::new(&actor.name, format!("{} hesitates...", actor.name))
            }
        },
        Action::Item { item_id, target } => resolve_item(state, content, &actor, item_id, target),
        Action::Guard => {
            if let Some(unit) = state.unit_mut(&actor.id) {
                unit.guard();
            }
            marker(state, &actor.id, EffectMarker::Guard);
            Resolution::new(&actor.name, format!("{} is guarding!", actor.name))
        }
        Action::Skip => Resolution::new(&actor.name, format!("{} cannot move!", actor.name)),
        Action::AllOut => {
            warn!("All-out attack reached the single-action resolver");
            Resolution::new(&actor.name, format!("{} hesitates...", actor.name))
        }
    }
}

fn marker(state: &mut BattleState, unit_id: &str, marker: EffectMarker) {
    state.emit(BattleEvent::Effect {
        unit_id: unit_id.to_string(),
        marker,
    });
}

fn select_targets(state: &BattleState, actor: &Actor, skill: &Skill, target: &ActionTarget) -> Vec<String> {
    match (skill.target, target) {
        (TargetMode::All, _) => {
            let side = if skill.is_healing() {
                actor.faction
            } else {
                actor.faction.opponent()
            };
            state.living(side).map(|u| u.id.clone()).collect()
        }
        (TargetMode::Single, ActionTarget::Unit(id)) => state
            .unit(id)
            .filter(|u| u.is_alive())
            .map(|u| vec![u.id.clone()])
            .unwrap_or_default(),
        (TargetMode::Single, ActionTarget::All) => Vec::new(),
    }
}

fn resolve_skill(
    state: &mut BattleState,
    actor: &Actor,
    skill: &Skill,
    target: &ActionTarget,
    rng: &mut dyn BattleRng,
) -> Resolution {
    let targets = select_targets(state, actor, skill, target);
    if targets.is_empty() {
        warn!("{} used {} with no valid target", actor.id, skill.id);
        return Resolution::new(
            &actor.name,
            format!("{} uses {}, but there is no one to target!", actor.name, skill.name),
        );
    }

    if skill.cost > 0 {
        if let Some(unit) = state.unit_mut(&actor.id) {
            unit.spend_sp(skill.cost);
        }
    }

    let mut resolution = Resolution::new(&actor.name, String::new());

    if !skill.is_healing() && rng.chance(MISS_CHANCE) {
        for id in &targets {
            marker(state, id, EffectMarker::Miss);
        }
        state.cue(match actor.faction {
            Faction::Hero => NavEvent::PlayerMiss,
            Faction::Enemy => NavEvent::EnemyMiss,
        });
        resolution.missed = true;
        resolution.line = format!("{} attacks but MISSES!", actor.name);
        return resolution;
    }

    let mut parts = Vec::with_capacity(targets.len());

    if skill.is_healing() {
        for id in &targets {
            let Some(unit) = state.unit_mut(id) else { continue };
            let healed = unit.heal(-skill.power);
            let name = unit.name.clone();
            marker(state, id, EffectMarker::Heal);
            parts.push((name, healed));
        }

        resolution.line = match parts.as_slice() {
            [(name, healed)] => format!(
                "{} uses {} on {}! Restored {} HP",
                actor.name, skill.name, name, healed
            ),
            _ => format!(
                "{} uses {} on all allies! {}",
                actor.name,
                skill.name,
                parts
                    .iter()
                    .map(|(name, healed)| format!("{} +{} HP", name, healed))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        return resolution;
    }

    let mut hits = Vec::with_capacity(targets.len());
    for id in &targets {
        let Some(unit) = state.unit(id) else { continue };
        let result = unit.profile.calculate_damage(
            skill.power,
            actor.faction,
            skill.element,
            unit.is_guarding(),
            rng,
        );

        let Some(unit) = state.unit_mut(id) else { continue };
        unit.take_damage(result.final_damage);
        if let Some(cause) = result.knockdown() {
            resolution.knocked_down = true;
            match cause {
                DownCause::Weak => resolution.weakness = true,
                DownCause::Critical => resolution.critical = true,
            }
            unit.knock_down(cause);
        }
        if unit.is_hero() && unit.is_dead() {
            resolution.ally_down = true;
        }
        let name = unit.name.clone();

        let effect = match result.tag {
            Some(HitTag::Critical) => EffectMarker::Critical,
            _ => EffectMarker::Hit(result.element),
        };
        marker(state, id, effect);

        debug!(
            "{} hits {} for {} ({:?})",
            actor.id, id, result.final_damage, result.tag
        );
        hits.push((name, result.final_damage, result.tag));
    }

    resolution.line = match hits.as_slice() {
        [(name, damage, tag)] => {
            let mut line = format!("{} uses {} on {}! {} dmg!", actor.name, skill.name, name, damage);
            if let Some(tag) = tag {
                line.push_str(&format!(" {}", tag));
            }
            line
        }
        _ => format!(
            "{} uses {} on all foes! {}",
            actor.name,
            skill.name,
            hits.iter()
                .map(|(name, damage, tag)| match tag {
                    Some(tag) => format!("{} {} dmg {}", name, damage, tag),
                    None => format!("{} {} dmg", name, damage),
                })
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    if resolution.ally_down {
        state.cue(NavEvent::AllyDown);
    } else if resolution.critical {
        state.cue(NavEvent::CriticalHit);
    } else if resolution.weakness {
        state.cue(NavEvent::WeaknessHit);
    }
    if resolution.weakness && actor.faction == Faction::Hero {
        state.unlock(Achievement::Tactician);
    }

    resolution
}

fn resolve_item(
    state: &mut BattleState,
    content: &Content,
    actor: &Actor,
    item_id: &str,
    target_id: &str,
) -> Resolution {
    let Some(item) = content.item(item_id) else {
        warn!("Unknown item {} used by {}", item_id, actor.id);
        return Resolution::new(&actor.name, format!("{} hesitates...", actor.name));
    };
    if state.unit(target_id).is_none() {
        warn!("{} used {} on unknown unit {}", actor.id, item_id, target_id);
        return Resolution::new(&actor.name, format!("{} hesitates...", actor.name));
    }
    if !state.inventory.take(item_id) {
        warn!("{} used {} with none left", actor.id, item_id);
        return Resolution::new(
            &actor.name,
            format!("{} reaches for a {} but there are none left!", actor.name, item.name),
        );
    }

    let Some(unit) = state.unit_mut(target_id) else {
        return Resolution::new(&actor.name, format!("{} hesitates...", actor.name));
    };
    let target_name = unit.name.clone();

    let (outcome, effect) = match item.effect {
        ItemEffect::Heal { amount } if unit.is_alive() => {
            let healed = unit.heal(amount);
            (format!("Restored {} HP", healed), Some(EffectMarker::Heal))
        }
        ItemEffect::Sp { amount } if unit.is_alive() => {
            let restored = unit.restore_sp(amount);
            (format!("Restored {} SP", restored), Some(EffectMarker::RestoreSp))
        }
        ItemEffect::Revive { fraction } => match unit.revive(fraction) {
            Some(hp) => (format!("Revived with {} HP", hp), Some(EffectMarker::Revive)),
            None => ("No effect...".to_string(), None),
        },
        _ => ("No effect...".to_string(), None),
    };

    if let Some(effect) = effect {
        marker(state, target_id, effect);
    }

    Resolution::new(
        &actor.name,
        format!(
            "{} used {} on {}! {}",
            actor.name, item.name, target_name, outcome
        ),
    )
}
