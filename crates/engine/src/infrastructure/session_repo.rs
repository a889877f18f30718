//! In-memory session storage.
//!
//! Sessions live only as long as the process. Each entry holds the JSON
//! snapshot of one player's game state and when the player was last seen.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use londonhunt_domain::SessionId;

use crate::infrastructure::ports::{RepoError, SessionRepo};

#[derive(Debug, Clone)]
struct StoredSession {
    state: serde_json::Value,
    last_seen: DateTime<Utc>,
}

/// Session store backed by a concurrent map.
#[derive(Default)]
pub struct InMemorySessionRepo {
    sessions: DashMap<SessionId, StoredSession>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionRepo for InMemorySessionRepo {
    async fn load(&self, id: SessionId) -> Result<Option<serde_json::Value>, RepoError> {
        Ok(self.sessions.get(&id).map(|entry| entry.state.clone()))
    }

    async fn save(
        &self,
        id: SessionId,
        state: serde_json::Value,
        seen_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        self.sessions.insert(
            id,
            StoredSession {
                state,
                last_seen: seen_at,
            },
        );
        Ok(())
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<Vec<SessionId>, RepoError> {
        let mut evicted = Vec::new();
        self.sessions.retain(|id, session| {
            let keep = session.last_seen >= cutoff;
            if !keep {
                evicted.push(*id);
            }
            keep
        });
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_session() {
        let repo = InMemorySessionRepo::new();
        let loaded = repo.load(SessionId::new()).await.expect("load");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_snapshot() {
        let repo = InMemorySessionRepo::new();
        let id = SessionId::new();
        let state = json!({ "started": true, "index": 1, "clueGiven": false });

        repo.save(id, state.clone(), at(9)).await.expect("save");

        assert_eq!(repo.load(id).await.expect("load"), Some(state));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let repo = InMemorySessionRepo::new();
        let alice = SessionId::new();
        let bob = SessionId::new();

        repo.save(alice, json!({ "index": 1 }), at(9)).await.expect("save");
        repo.save(bob, json!({ "index": 3 }), at(9)).await.expect("save");

        assert_eq!(repo.load(alice).await.expect("load"), Some(json!({ "index": 1 })));
        assert_eq!(repo.load(bob).await.expect("load"), Some(json!({ "index": 3 })));
    }

    #[tokio::test]
    async fn evict_idle_drops_only_stale_sessions() {
        let repo = InMemorySessionRepo::new();
        let stale = SessionId::new();
        let fresh = SessionId::new();
        let revisited = SessionId::new();

        repo.save(stale, json!({}), at(8)).await.expect("save");
        repo.save(fresh, json!({}), at(11)).await.expect("save");
        repo.save(revisited, json!({}), at(8)).await.expect("save");
        repo.save(revisited, json!({}), at(11)).await.expect("save");

        let evicted = repo
            .evict_idle(at(12) - Duration::hours(2))
            .await
            .expect("evict");

        assert_eq!(evicted, vec![stale]);
        assert_eq!(repo.len(), 2);
        assert!(repo.load(stale).await.expect("load").is_none());
    }
}
