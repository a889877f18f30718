//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the session store:
//! - `SessionLocks` - one in-flight chat request per session

pub mod session_locks;

pub use session_locks::SessionLocks;
