//! London Adventure domain.
//!
//! Pure game logic with no I/O: the fixed location catalog, per-player
//! game state, message classification and the progression state machine.

pub mod catalog;
pub mod error;
pub mod game_state;
pub mod ids;
pub mod message;
pub mod progression;
pub mod reply;

pub use catalog::{letters_only, Catalog, LocationEntry};
pub use error::DomainError;
pub use game_state::GameState;
pub use ids::SessionId;
pub use message::{Command, Message};
pub use progression::{Progression, Transition};
pub use reply::{Reply, ReplyDirective};
