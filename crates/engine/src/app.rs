//! Application state and composition.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use londonhunt_domain::Progression;

use crate::infrastructure::{
    config::EngineConfig,
    ports::{ClockPort, LlmPort, SessionRepo},
    resilient_llm::{ResilientLlmClient, RetryConfig},
};
use crate::stores::SessionLocks;
use crate::use_cases;

/// Main application state.
///
/// Holds all use cases plus the few settings the HTTP layer needs.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub web: WebSettings,
}

/// Container for all use cases.
pub struct UseCases {
    pub chat: use_cases::ChatUseCases,
    pub session: use_cases::SessionUseCases,
}

/// Settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// Directory holding the chat page and its assets.
    pub public_dir: PathBuf,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

/// Wiring knobs taken from [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub responder_timeout: Duration,
    pub llm_max_retries: u32,
    pub session_ttl: Duration,
    pub web: WebSettings,
}

impl From<&EngineConfig> for AppSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            responder_timeout: config.responder_timeout,
            llm_max_retries: config.llm_max_retries,
            session_ttl: config.session_ttl,
            web: WebSettings {
                public_dir: config.public_dir.clone(),
                cookie_secure: config.cookie_secure,
            },
        }
    }
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// `llm` is wrapped with retries here; pass the bare client.
    pub fn new(
        llm: Arc<dyn LlmPort>,
        sessions: Arc<dyn SessionRepo>,
        clock: Arc<dyn ClockPort>,
        settings: AppSettings,
    ) -> Self {
        let retry_config = RetryConfig {
            max_retries: settings.llm_max_retries,
            ..RetryConfig::default()
        };
        tracing::info!(
            max_retries = retry_config.max_retries,
            base_delay_ms = retry_config.base_delay_ms,
            "LLM client configured with retry"
        );
        let llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(llm, retry_config));

        let progression = Arc::new(Progression::default());
        let locks = Arc::new(SessionLocks::new());
        let responder = Arc::new(use_cases::chat::TextResponder::new(
            llm,
            settings.responder_timeout,
        ));

        let chat = use_cases::ChatUseCases::new(Arc::new(use_cases::chat::PlayChat::new(
            progression,
            sessions.clone(),
            locks,
            responder,
            clock.clone(),
        )));

        let session = use_cases::SessionUseCases::new(Arc::new(
            use_cases::session::ExpireSessions::new(sessions, clock, settings.session_ttl),
        ));

        Self {
            use_cases: UseCases { chat, session },
            web: settings.web,
        }
    }
}
