//! Play chat use case.
//!
//! One player message in, one reply out. Loads the session's game state,
//! runs the progression engine, persists the new state and, for free-text
//! questions, asks the guide.

use std::sync::Arc;

use londonhunt_domain::{GameState, Progression, ReplyDirective, SessionId, Transition};

use crate::infrastructure::ports::{ClockPort, RepoError, SessionRepo};
use crate::stores::SessionLocks;

use super::guide::TextResponder;

/// Reply used whenever a turn cannot be answered normally. The game carries on.
pub const APOLOGY: &str = "Sorry, something went wrong, but I'm still here.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Session storage failed: {0}")]
    Repo(#[from] RepoError),
}

/// Handle a chat message for one session.
pub struct PlayChat {
    progression: Arc<Progression>,
    sessions: Arc<dyn SessionRepo>,
    locks: Arc<SessionLocks>,
    responder: Arc<TextResponder>,
    clock: Arc<dyn ClockPort>,
}

impl PlayChat {
    pub fn new(
        progression: Arc<Progression>,
        sessions: Arc<dyn SessionRepo>,
        locks: Arc<SessionLocks>,
        responder: Arc<TextResponder>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            progression,
            sessions,
            locks,
            responder,
            clock,
        }
    }

    /// Execute the play chat use case.
    ///
    /// # Returns
    /// * `Ok(String)` - The reply to show the player
    /// * `Err(ChatError)` - The session store failed
    pub async fn execute(
        &self,
        session_id: SessionId,
        raw_message: &str,
    ) -> Result<String, ChatError> {
        let result = {
            // Held until the reply is ready, guide call included
            let _guard = self.locks.acquire(session_id).await;
            self.play_turn(session_id, raw_message).await
        };
        // Lock entries only live while a request holds or waits on them
        self.locks.forget(session_id);
        result
    }

    async fn play_turn(
        &self,
        session_id: SessionId,
        raw_message: &str,
    ) -> Result<String, ChatError> {
        let stored = self.load_state(session_id).await?;
        let (state, directive) = match self.progression.handle(stored, raw_message) {
            Transition::Ignored(reply) => return Ok(reply.to_string()),
            Transition::Applied { state, reply } => (state, reply),
        };

        // Written even when unchanged: refreshes the idle timer and restores
        // a snapshot swept away while this turn was running.
        let snapshot = serde_json::to_value(state).map_err(RepoError::serialization)?;
        self.sessions
            .save(session_id, snapshot, self.clock.now())
            .await?;
        if stored != Some(state) {
            tracing::debug!(
                session_id = %session_id,
                index = state.index,
                clue_given = state.clue_given,
                "Game state updated"
            );
        }

        match directive {
            ReplyDirective::Say(reply) => Ok(reply.to_string()),
            ReplyDirective::Delegate(message) => match self.responder.respond(&message).await {
                Ok(answer) => Ok(answer),
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Guide failed, sending apology"
                    );
                    Ok(APOLOGY.to_string())
                }
            },
        }
    }

    /// Decode the stored snapshot. Anything undecodable is treated as absent
    /// and repaired by the progression engine.
    async fn load_state(&self, session_id: SessionId) -> Result<Option<GameState>, ChatError> {
        let Some(raw) = self.sessions.load(session_id).await? else {
            return Ok(None);
        };

        match serde_json::from_value::<GameState>(raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::debug!(
                    session_id = %session_id,
                    error = %e,
                    "Discarding malformed game state"
                );
                Ok(None)
            }
        }
    }
}
