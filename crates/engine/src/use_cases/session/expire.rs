//! Expire idle sessions.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{ClockPort, RepoError, SessionRepo};

/// Forget sessions that have been idle for longer than the configured TTL.
pub struct ExpireSessions {
    sessions: Arc<dyn SessionRepo>,
    clock: Arc<dyn ClockPort>,
    ttl: Duration,
}

impl ExpireSessions {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        clock: Arc<dyn ClockPort>,
        ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            clock,
            ttl,
        }
    }

    /// Run one sweep, returning how many sessions were dropped.
    pub async fn execute(&self) -> Result<usize, RepoError> {
        let Ok(ttl) = chrono::Duration::from_std(self.ttl) else {
            return Ok(0);
        };
        let Some(cutoff) = self.clock.now().checked_sub_signed(ttl) else {
            return Ok(0);
        };

        let evicted = self.sessions.evict_idle(cutoff).await?;
        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "Expired idle sessions");
        }
        Ok(evicted.len())
    }
}
