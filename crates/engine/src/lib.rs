//! London Adventure Engine library.
//!
//! This crate contains all server-side code for the London Adventure
//! treasure hunt.
//!
//! ## Structure
//!
//! - `use_cases/` - Chat turns and session housekeeping
//! - `stores/` - In-process runtime state (per-session locks)
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
