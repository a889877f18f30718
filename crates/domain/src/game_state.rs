//! Per-player game progress.
//!
//! A `GameState` belongs to exactly one session. It is serialized into the
//! session store between requests, so whatever comes back out is treated as
//! untrusted and run through [`GameState::repaired`] before use.

use serde::{Deserialize, Serialize};

/// Progress of one player through the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The welcome message has been sent.
    pub started: bool,
    /// 0-based pointer to the current, unsolved location. Equal to the
    /// catalog length once every location is solved.
    pub index: usize,
    /// The clue for the current location has been revealed.
    pub clue_given: bool,
}

impl GameState {
    /// Return `stored` if it is usable against a catalog of `location_count`
    /// entries, otherwise a fresh default state.
    pub fn repaired(stored: Option<GameState>, location_count: usize) -> GameState {
        match stored {
            Some(state) if state.index <= location_count => state,
            _ => GameState::default(),
        }
    }

    /// True once every location has been solved.
    pub fn is_complete(&self, location_count: usize) -> bool {
        self.index >= location_count
    }

    /// Move past the current location.
    pub(crate) fn advance(&mut self) {
        self.index += 1;
        self.clue_given = false;
    }

    pub(crate) fn reset(&mut self) {
        *self = GameState::default();
    }
}
