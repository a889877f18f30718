//! Session use cases.
//!
//! Housekeeping for the session store.

use std::sync::Arc;

mod expire;

pub use expire::ExpireSessions;

/// Container for session use cases.
pub struct SessionUseCases {
    pub expire: Arc<ExpireSessions>,
}

impl SessionUseCases {
    pub fn new(expire: Arc<ExpireSessions>) -> Self {
        Self { expire }
    }
}
