//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::session_cookie::SessionCookie;
use crate::app::App;
use crate::use_cases::chat::APOLOGY;

/// Text served at `/` when there is no chat page.
pub const RUNNING_BANNER: &str = "London Adventure server running";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/chat", post(chat))
}

async fn health() -> &'static str {
    "OK"
}

/// Serve the chat page if one is deployed, otherwise a liveness banner.
async fn index(State(app): State<Arc<App>>) -> Response {
    let page = app.web.public_dir.join("index.html");
    match tokio::fs::read_to_string(&page).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => RUNNING_BANNER.into_response(),
    }
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Anything but a string counts as an empty message.
    #[serde(default)]
    pub message: serde_json::Value,
}

impl ChatRequest {
    fn text(&self) -> &str {
        self.message.as_str().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

async fn chat(
    State(app): State<Arc<App>>,
    session: SessionCookie,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        // Plain form posts and empty bodies are treated as an empty message
        Err(JsonRejection::MissingJsonContentType(_)) => ChatRequest {
            message: serde_json::Value::Null,
        },
        Err(rejection) => return Err(ApiError::BadRequest(rejection.body_text())),
    };

    // Every chat request gets a reply, store failures included
    let reply = match app
        .use_cases
        .chat
        .play
        .execute(session.id, request.text())
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(session_id = %session.id, error = %e, "Chat turn failed");
            APOLOGY.to_string()
        }
    };

    let set_cookie = session
        .set_cookie(app.web.cookie_secure)
        .map(|cookie| (header::SET_COOKIE, cookie));

    Ok((AppendHeaders(set_cookie), Json(ChatResponse { reply })))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::session_cookie::SESSION_COOKIE;
    use crate::app::{AppSettings, WebSettings};
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{
        LlmError, MockLlmPort, MockSessionRepo, RepoError, SessionRepo,
    };
    use crate::infrastructure::session_repo::InMemorySessionRepo;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::path::Path;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router_with(llm: MockLlmPort, public_dir: &Path) -> Router {
        router_with_store(llm, Arc::new(InMemorySessionRepo::new()), public_dir)
    }

    fn router_with_store(
        llm: MockLlmPort,
        sessions: Arc<dyn SessionRepo>,
        public_dir: &Path,
    ) -> Router {
        let app = App::new(
            Arc::new(llm),
            sessions,
            Arc::new(SystemClock::new()),
            AppSettings {
                responder_timeout: Duration::from_secs(1),
                llm_max_retries: 0,
                session_ttl: Duration::from_secs(60),
                web: WebSettings {
                    public_dir: public_dir.to_path_buf(),
                    cookie_secure: false,
                },
            },
        );
        build_router(Arc::new(app))
    }

    fn router(public_dir: &Path) -> Router {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().never();
        router_with(llm, public_dir)
    }

    fn chat_request(body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).expect("request")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    async fn reply_of(response: Response) -> String {
        let body: ChatResponse = serde_json::from_str(&body_text(response).await).expect("json");
        body.reply
    }

    fn session_cookie_of(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("set-cookie")
            .to_str()
            .expect("ascii");
        set_cookie
            .split(';')
            .next()
            .expect("name=value")
            .to_string()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = router(dir.path())
            .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn root_without_page_shows_banner() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = router(dir.path())
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, RUNNING_BANNER);
    }

    #[tokio::test]
    async fn root_serves_chat_page_and_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<h1>London</h1>").expect("write");
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").expect("write");
        let router = router(dir.path());

        let page = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(page.status(), StatusCode::OK);
        assert_eq!(body_text(page).await, "<h1>London</h1>");

        let asset = router
            .oneshot(Request::get("/app.js").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(asset.status(), StatusCode::OK);
        assert_eq!(body_text(asset).await, "console.log('hi');");
    }

    #[tokio::test]
    async fn first_chat_issues_cookie_and_welcomes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = router(dir.path())
            .oneshot(chat_request(r#"{"message":"hello"}"#, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie_of(&response).starts_with(SESSION_COOKIE));
        assert!(reply_of(response).await.starts_with("Welcome"));
    }

    #[tokio::test]
    async fn cookie_carries_progress_between_requests() {
        let dir = tempfile::tempdir().expect("tempdir");
        let router = router(dir.path());

        let first = router
            .clone()
            .oneshot(chat_request(r#"{"message":"hi"}"#, None))
            .await
            .expect("response");
        let cookie = session_cookie_of(&first);

        let second = router
            .clone()
            .oneshot(chat_request(r#"{"message":"clue"}"#, Some(&cookie)))
            .await
            .expect("response");
        assert!(second.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(
            reply_of(second).await,
            "A soldier rides where money sleeps, stone and power the city keeps."
        );

        let third = router
            .oneshot(chat_request(r#"{"message":"  WELLINGTON "}"#, Some(&cookie)))
            .await
            .expect("response");
        assert_eq!(reply_of(third).await, "Correct! Ask for a clue to continue.");
    }

    #[tokio::test]
    async fn non_string_message_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let router = router(dir.path());

        for body in [r#"{"message":42}"#, r#"{}"#, r#"{"message":null}"#] {
            let response = router
                .clone()
                .oneshot(chat_request(body, None))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(reply_of(response).await, "Say something to begin.");
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = Request::post("/chat")
            .body(Body::from("message=hi"))
            .expect("request");

        let response = router(dir.path()).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reply_of(response).await, "Say something to begin.");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = router(dir.path())
            .oneshot(chat_request(r#"{"message":"#, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn guide_failure_still_answers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("401 invalid api key".into())));
        let router = router_with(llm, dir.path());

        let first = router
            .clone()
            .oneshot(chat_request(r#"{"message":"hi"}"#, None))
            .await
            .expect("response");
        let cookie = session_cookie_of(&first);

        let response = router
            .oneshot(chat_request(
                r#"{"message":"who built this city?"}"#,
                Some(&cookie),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reply_of(response).await, APOLOGY);
    }

    #[tokio::test]
    async fn store_failure_still_answers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut llm = MockLlmPort::new();
        llm.expect_generate().never();
        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_load()
            .returning(|_| Err(RepoError::storage("load", "unavailable")));

        let response = router_with_store(llm, Arc::new(sessions), dir.path())
            .oneshot(chat_request(r#"{"message":"clue"}"#, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reply_of(response).await, APOLOGY);
    }
}
