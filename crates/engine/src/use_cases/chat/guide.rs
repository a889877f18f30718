//! Text responder - the AI guide that answers free-text questions.
//!
//! The guide only ever sees the player's message and a fixed policy. It has
//! no access to game state, so it cannot move a player forward.

use std::sync::Arc;
use std::time::Duration;

use londonhunt_domain::Message;

use crate::infrastructure::ports::{ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest};

/// Behavioural policy sent as the system prompt on every call.
pub const GUIDE_POLICY: &str = "You are a London adventure guide for a landmark treasure hunt. \
Answer briefly and truthfully, but guide indirectly. \
Never reveal the name of the landmark the player is looking for. \
Never confirm that a guess is correct and never tell the player to move on. \
Only talk about the landmark the player is currently looking for, never later ones.";

/// Token budget for one answer.
pub const GUIDE_MAX_TOKENS: u32 = 50;

/// Low temperature keeps answers factual.
pub const GUIDE_TEMPERATURE: f32 = 0.3;

#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("Guide did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Guide LLM call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("Guide returned an empty answer")]
    EmptyReply,
    #[error("Guide answer was withheld by the content filter")]
    Filtered,
}

/// Answers free-text questions through the LLM port.
pub struct TextResponder {
    llm: Arc<dyn LlmPort>,
    timeout: Duration,
}

impl TextResponder {
    pub fn new(llm: Arc<dyn LlmPort>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Ask the guide about `message`.
    ///
    /// The reply is returned as the model wrote it, apart from surrounding
    /// whitespace. A blank reply counts as a failure.
    pub async fn respond(&self, message: &Message) -> Result<String, ResponderError> {
        let request = LlmRequest::new(vec![ChatMessage::user(message.as_str())])
            .with_system_prompt(GUIDE_POLICY)
            .with_temperature(GUIDE_TEMPERATURE)
            .with_max_tokens(Some(GUIDE_MAX_TOKENS));

        let response = tokio::time::timeout(self.timeout, self.llm.generate(request))
            .await
            .map_err(|_| ResponderError::Timeout(self.timeout))??;

        tracing::debug!(
            finish_reason = ?response.finish_reason,
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Guide answered"
        );
        if response.finish_reason == FinishReason::ContentFilter {
            return Err(ResponderError::Filtered);
        }

        let content = response.content.trim();
        if content.is_empty() {
            return Err(ResponderError::EmptyReply);
        }
        Ok(content.to_string())
    }
}
