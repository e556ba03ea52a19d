//! Action choice for units nobody is steering
//!
//! Enemies pick a random living hero and either a random affordable skill
//! or a basic attack. The autopilot plays heroes for the demo binary.

use super::action::Action;
use super::all_out;
use super::state::BattleState;
use crate::combat::BattleRng;
use crate::content::{Content, Faction, TargetMode};

/// A roll above this uses a skill instead of attacking
pub const SKILL_THRESHOLD: f64 = 0.4;

/// Pick an enemy's action.
///
/// Rolls: target pick (if more than one hero lives), skill-or-attack
/// roll (if any skill is affordable), skill pick (if more than one).
pub fn choose_enemy_action(
    state: &BattleState,
    content: &Content,
    enemy_id: &str,
    rng: &mut dyn BattleRng,
) -> Action {
    let Some(enemy) = state.unit(enemy_id) else {
        return Action::Skip;
    };
    let heroes = state.living_heroes();
    if heroes.is_empty() || enemy.is_dead() {
        return Action::Skip;
    }
    let target = heroes[rng.pick(heroes.len())].id.clone();

    let affordable: Vec<_> = enemy
        .skills
        .iter()
        .filter_map(|id| content.skill(id))
        .filter(|s| s.cost <= enemy.sp())
        .collect();

    if affordable.is_empty() || rng.next_unit() <= SKILL_THRESHOLD {
        return Action::attack(&target);
    }

    let skill = &affordable[rng.pick(affordable.len())];
    match (skill.target, skill.is_healing()) {
        (TargetMode::All, _) => Action::skill_all(&skill.id),
        (TargetMode::Single, true) => Action::skill(&skill.id, enemy_id),
        (TargetMode::Single, false) => Action::skill(&skill.id, &target),
    }
}

/// Simple hero policy: All-Out when possible, else an affordable skill
/// that hits a standing enemy's weakness, else attack the first living
/// enemy.
pub fn autopilot(state: &BattleState, content: &Content, hero_id: &str) -> Action {
    if all_out::is_available(state, hero_id) {
        return Action::AllOut;
    }
    let Some(hero) = state.unit(hero_id) else {
        return Action::Skip;
    };

    let enemies: Vec<_> = state
        .living(hero.faction.opponent())
        .filter(|e| !e.is_down())
        .collect();

    for skill in hero.skills.iter().filter_map(|id| content.skill(id)) {
        if skill.is_healing() || skill.cost > hero.sp() {
            continue;
        }
        if let Some(enemy) = enemies.iter().find(|e| e.profile.is_weak_to(skill.element)) {
            return match skill.target {
                TargetMode::All => Action::skill_all(&skill.id),
                TargetMode::Single => Action::skill(&skill.id, &enemy.id),
            };
        }
    }

    match state.living(Faction::Enemy).next() {
        Some(enemy) => Action::attack(&enemy.id),
        None => Action::Guard,
    }
}
