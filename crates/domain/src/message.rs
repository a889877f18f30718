//! Incoming message normalization and command classification.

use std::fmt;

use crate::catalog::LocationEntry;

/// Prefix that turns a message into a yes/no probe.
const PROBE_PREFIX: &str = "is it";

/// A lower-cased, trimmed, non-empty player message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    /// Normalize raw input. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a message asks for, relative to the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `clue` or `hint`.
    Clue,
    /// `is it ...` - answered yes or no, never progresses.
    YesNoProbe { matches: bool },
    /// Names one of the current location's answers.
    Guess,
    /// Anything else; handed to the text responder.
    FreeText,
}

impl Command {
    /// Classify `message` against the current location.
    ///
    /// Precedence is clue, probe, guess, free text. Probes compare letters
    /// only; guesses compare the normalized message as is.
    pub fn classify(message: &Message, current: &LocationEntry) -> Self {
        let text = message.as_str();
        if text == "clue" || text == "hint" {
            Command::Clue
        } else if text.starts_with(PROBE_PREFIX) {
            Command::YesNoProbe {
                matches: current.is_named_in_letters(text),
            }
        } else if current.is_named_in(text) {
            Command::Guess
        } else {
            Command::FreeText
        }
    }
}
