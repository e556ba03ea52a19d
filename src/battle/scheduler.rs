//! Turn scheduler
//!
//! Fixed turn order set once at battle start with a cursor into it.
//! Dead units stay in the order and are skipped; a unit's knockdown and
//! guard expire exactly when its own next turn begins.

use tracing::debug;

use super::events::BattleEvent;
use super::state::{BattleState, Phase};
use crate::combat::Unit;

impl BattleState {
    /// Id at the cursor
    pub fn current_unit_id(&self) -> Option<&str> {
        self.turn_order().get(self.turn_index).map(String::as_str)
    }

    /// Unit at the cursor, None if the turn order is empty
    pub fn current_unit(&self) -> Option<&Unit> {
        self.current_unit_id().and_then(|id| self.unit(id))
    }

    /// Move the cursor to the next unit and begin its turn
    pub(crate) fn advance_turn(&mut self) {
        let len = self.turn_order().len();
        if len == 0 {
            return;
        }

        self.turn_index = (self.turn_index + 1) % len;
        if let Some(id) = self.current_unit_id().map(str::to_string) {
            if let Some(unit) = self.unit_mut(&id) {
                unit.begin_turn();
            }
        }
        self.one_more = false;
        self.set_phase(Phase::TurnStart);
    }

    /// Keep the cursor on the acting unit for a bonus turn
    pub(crate) fn grant_one_more(&mut self) {
        self.one_more = true;
        self.set_phase(Phase::TurnStart);
    }

    /// Skip dead units at the cursor.
    ///
    /// Returns the id of the living unit now up, or None if nobody in the
    /// turn order is alive. Skips leave no log entry.
    pub(crate) fn settle_turn(&mut self) -> Option<String> {
        for _ in 0..self.turn_order().len() {
            match self.current_unit() {
                Some(unit) if unit.is_alive() => {
                    let id = unit.id.clone();
                    let one_more = self.one_more;
                    self.emit(BattleEvent::TurnStarted {
                        unit_id: id.clone(),
                        one_more,
                    });
                    return Some(id);
                }
                _ => {
                    debug!("Skipping turn of {:?}", self.current_unit_id());
                    self.advance_turn();
                }
            }
        }
        None
    }
}
