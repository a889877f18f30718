//! Chat use cases.
//!
//! The player-facing conversation: progression replies and guide answers.

use std::sync::Arc;

mod guide;
mod play;

pub use guide::{
    ResponderError, TextResponder, GUIDE_MAX_TOKENS, GUIDE_POLICY, GUIDE_TEMPERATURE,
};
pub use play::{ChatError, PlayChat, APOLOGY};

/// Container for chat use cases.
pub struct ChatUseCases {
    pub play: Arc<PlayChat>,
}

impl ChatUseCases {
    pub fn new(play: Arc<PlayChat>) -> Self {
        Self { play }
    }
}
