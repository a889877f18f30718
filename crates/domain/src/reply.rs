//! Replies produced by the progression engine.

use std::fmt;

use crate::message::Message;

/// A fixed reply the engine can give without outside help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The message was empty.
    Prompt,
    Welcome,
    /// Clue text of the current location.
    Clue(String),
    OnlyOneClue,
    Yes,
    No,
    /// A location was solved and more remain.
    Correct,
    /// The last location was solved on this turn.
    FinalCorrect,
    /// The hunt was already complete; progress has been reset.
    Completed,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Prompt => "Say something to begin.",
            Reply::Welcome => {
                "Welcome to London Adventure. Ask for a clue to find your first landmark."
            }
            Reply::Clue(clue) => clue,
            Reply::OnlyOneClue => "You only get one clue per location. Make your guess.",
            Reply::Yes => "Yes.",
            Reply::No => "No.",
            Reply::Correct => "Correct! Ask for a clue to continue.",
            Reply::FinalCorrect => "Correct! You have completed the London Adventure 🎉",
            Reply::Completed => {
                "You have completed the London Adventure 🎉 Send any message to play again."
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Outcome of a transition: say something, or hand the message to the
/// text responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyDirective {
    Say(Reply),
    Delegate(Message),
}
