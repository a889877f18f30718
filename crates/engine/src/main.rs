//! London Adventure Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use londonhunt_engine::api;
use londonhunt_engine::app::{App, AppSettings};
use londonhunt_engine::infrastructure::{
    clock::SystemClock, config::EngineConfig, openai::OpenAiClient,
    session_repo::InMemorySessionRepo,
};

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "londonhunt_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting London Adventure Engine");

    // Load configuration
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Create infrastructure
    tracing::info!(
        base_url = %config.openai_base_url,
        model = %config.openai_model,
        "Configuring LLM client"
    );
    let llm = Arc::new(OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_model,
        &config.openai_api_key,
    ));
    let sessions = Arc::new(InMemorySessionRepo::new());
    let clock = Arc::new(SystemClock::new());

    // Create application
    let app = Arc::new(App::new(llm, sessions, clock, AppSettings::from(&config)));

    // Spawn idle session sweeper
    let sweep_app = app.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = sweep_app.use_cases.session.expire.execute().await {
                tracing::warn!(error = %e, "Session sweep failed");
            }
        }
    });

    let mut router = api::build_router(app).layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// The chat page sends the session cookie, so every CORS response allows
/// credentials. `*` reflects the caller's origin.
fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(AllowOrigin::mirror_request()));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(cors.allow_origin(origins))
}
