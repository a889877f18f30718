//! Per-session request serialization.
//!
//! Two requests from the same session would otherwise race on the
//! read-modify-write of its game state. Each session gets its own async
//! mutex; requests from different sessions never contend.

use std::sync::Arc;

use dashmap::DashMap;
use londonhunt_domain::SessionId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by session.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds `id`, then hold it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await
        let lock = Arc::clone(self.locks.entry(id).or_default().value());
        lock.lock_owned().await
    }

    /// Drop the lock entry for `id` unless a request holds or waits on it.
    ///
    /// Called after every request, so the table only holds sessions with a
    /// request in flight.
    pub fn forget(&self, id: SessionId) {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_session_waits_for_release() {
        let locks = Arc::new(SessionLocks::new());
        let id = SessionId::new();

        let guard = locks.acquire(id).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished(), "second request must wait");

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender finishes after release")
            .expect("task did not panic");
    }

    #[tokio::test]
    async fn different_sessions_do_not_contend() {
        let locks = SessionLocks::new();
        let _first = locks.acquire(SessionId::new()).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(SessionId::new())).await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn forget_keeps_locks_in_use() {
        let locks = SessionLocks::new();
        let busy = SessionId::new();
        let idle = SessionId::new();

        let _guard = locks.acquire(busy).await;
        drop(locks.acquire(idle).await);

        locks.forget(busy);
        locks.forget(idle);

        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn forget_keeps_entry_for_waiting_request() {
        let locks = Arc::new(SessionLocks::new());
        let id = SessionId::new();

        let guard = locks.acquire(id).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        locks.forget(id);
        assert_eq!(locks.len(), 1, "waiter still shares the entry");

        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender finishes")
            .expect("task did not panic");
        locks.forget(id);
        assert!(locks.is_empty());
    }
}
