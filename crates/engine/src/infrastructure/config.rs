//! Engine configuration from environment variables.
//!
//! `main` loads `.env.local` / `.env` first, so everything here can also be
//! set in those files.

use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

/// Configuration errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Everything the engine needs to start.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub server_host: String,
    pub server_port: u16,
    /// Upper bound on one text responder call, retries included.
    pub responder_timeout: Duration,
    pub llm_max_retries: u32,
    /// Sessions idle for longer than this are forgotten.
    pub session_ttl: Duration,
    pub public_dir: PathBuf,
    /// `*` or a comma separated origin list. CORS is off when unset.
    pub cors_allowed_origins: Option<String>,
    pub cookie_secure: bool,
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => parse("SERVER_PORT", raw)?,
            None => 3000,
        };

        let responder_timeout_secs: u64 = match get("RESPONDER_TIMEOUT_SECS") {
            Some(raw) => parse("RESPONDER_TIMEOUT_SECS", raw)?,
            None => 15,
        };
        if responder_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "RESPONDER_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let llm_max_retries = match get("LLM_MAX_RETRIES") {
            Some(raw) => parse("LLM_MAX_RETRIES", raw)?,
            None => 1,
        };

        let session_ttl_secs: u64 = match get("SESSION_TTL_SECS") {
            Some(raw) => parse("SESSION_TTL_SECS", raw)?,
            None => 86_400,
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(raw) => parse_bool("COOKIE_SECURE", raw)?,
            None => false,
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            responder_timeout: Duration::from_secs(responder_timeout_secs),
            llm_max_retries,
            session_ttl: Duration::from_secs(session_ttl_secs),
            public_dir: PathBuf::from(get("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            cookie_secure,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
