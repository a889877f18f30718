//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the game.

pub mod chat;
pub mod session;

pub use chat::ChatUseCases;
pub use session::SessionUseCases;
