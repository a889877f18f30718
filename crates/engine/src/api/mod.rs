//! API layer - HTTP entry points.

use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::app::App;

pub mod http;
pub mod session_cookie;

pub use session_cookie::{SessionCookie, SESSION_COOKIE};

/// Build the full router: API routes plus the static chat page as fallback.
pub fn build_router(app: Arc<App>) -> Router {
    let assets = ServeDir::new(&app.web.public_dir);
    http::routes().fallback_service(assets).with_state(app)
}
