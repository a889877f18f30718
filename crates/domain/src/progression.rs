//! Session progression engine.
//!
//! A pure transition function over [`GameState`]: one message in, one new
//! state and one reply directive out. No I/O happens here; free-text
//! questions come back as [`ReplyDirective::Delegate`] for the caller to
//! answer.
//!
//! Precedence, after normalization and state repair:
//!
//! 1. an unstarted game consumes the message as the start signal
//! 2. a completed game resets and reports completion
//! 3. `clue` / `hint`
//! 4. `is it ...` yes/no probe
//! 5. a guess naming the current location
//! 6. anything else is delegated

use crate::catalog::Catalog;
use crate::game_state::GameState;
use crate::message::{Command, Message};
use crate::reply::{Reply, ReplyDirective};

/// Result of handling one raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The message was empty. The stored state must be left untouched.
    Ignored(Reply),
    /// The message was processed; `state` replaces the stored state.
    Applied {
        state: GameState,
        reply: ReplyDirective,
    },
}

impl Transition {
    /// New state to persist, if any.
    pub fn state(&self) -> Option<&GameState> {
        match self {
            Transition::Ignored(_) => None,
            Transition::Applied { state, .. } => Some(state),
        }
    }
}

/// Drives players through a fixed catalog.
#[derive(Debug, Clone)]
pub struct Progression {
    catalog: Catalog,
}

impl Progression {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle a raw message against whatever state the session store held.
    ///
    /// `stored` is `None` for a new session or when the stored value could
    /// not be decoded; both start from the default state.
    pub fn handle(&self, stored: Option<GameState>, raw_message: &str) -> Transition {
        let Some(message) = Message::parse(raw_message) else {
            return Transition::Ignored(Reply::Prompt);
        };

        let state = GameState::repaired(stored, self.catalog.len());
        let (state, reply) = self.advance(state, message);
        Transition::Applied { state, reply }
    }

    /// Apply one normalized message to a repaired state.
    pub fn advance(&self, mut state: GameState, message: Message) -> (GameState, ReplyDirective) {
        if !state.started {
            state.started = true;
            return (state, ReplyDirective::Say(Reply::Welcome));
        }

        let Some(current) = self.catalog.get(state.index) else {
            state.reset();
            return (state, ReplyDirective::Say(Reply::Completed));
        };

        let reply = match Command::classify(&message, current) {
            Command::Clue if state.clue_given => Reply::OnlyOneClue,
            Command::Clue => {
                state.clue_given = true;
                Reply::Clue(current.clue().to_string())
            }
            Command::YesNoProbe { matches: true } => Reply::Yes,
            Command::YesNoProbe { matches: false } => Reply::No,
            Command::Guess => {
                state.advance();
                if state.is_complete(self.catalog.len()) {
                    Reply::FinalCorrect
                } else {
                    Reply::Correct
                }
            }
            Command::FreeText => return (state, ReplyDirective::Delegate(message)),
        };

        (state, ReplyDirective::Say(reply))
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(Catalog::london())
    }
}
