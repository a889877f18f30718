//! Session cookie handling.
//!
//! Every browser gets an opaque session id in the `londonhunt_sid` cookie.
//! Requests without a valid one are assigned a fresh id, and the response
//! carries a `Set-Cookie` for it.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use londonhunt_domain::SessionId;

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "londonhunt_sid";

/// Session id resolved from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookie {
    pub id: SessionId,
    /// True when the id was minted for this request and must be sent back.
    pub issued: bool,
}

impl SessionCookie {
    /// Resolve the session from request headers, minting a new id if needed.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match find_session_id(headers) {
            Some(id) => Self { id, issued: false },
            None => Self {
                id: SessionId::new(),
                issued: true,
            },
        }
    }

    /// `Set-Cookie` value for this session, if one has to be sent.
    pub fn set_cookie(&self, secure: bool) -> Option<String> {
        self.issued.then(|| set_cookie_value(self.id, secure))
    }
}

impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

fn find_session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| value.trim_matches('"').parse().ok())
}

fn set_cookie_value(id: SessionId, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; HttpOnly; Path=/; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(cookie).expect("valid header"),
        );
        headers
    }

    #[test]
    fn missing_cookie_issues_new_session() {
        let session = SessionCookie::from_headers(&HeaderMap::new());
        assert!(session.issued);
        assert!(session.set_cookie(false).is_some());
    }

    #[test]
    fn existing_cookie_is_reused() {
        let id = SessionId::new();
        let headers = headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}; other=1"));

        let session = SessionCookie::from_headers(&headers);

        assert_eq!(session.id, id);
        assert!(!session.issued);
        assert!(session.set_cookie(false).is_none());
    }

    #[test]
    fn garbage_cookie_gets_fresh_session() {
        let headers = headers_with_cookie(&format!("{SESSION_COOKIE}=not-a-uuid"));
        let session = SessionCookie::from_headers(&headers);
        assert!(session.issued);
    }

    #[test]
    fn cookie_attributes() {
        let id = SessionId::new();
        let session = SessionCookie { id, issued: true };

        assert_eq!(
            session.set_cookie(false).as_deref(),
            Some(format!("londonhunt_sid={id}; HttpOnly; Path=/; SameSite=Lax").as_str())
        );
        assert!(session
            .set_cookie(true)
            .is_some_and(|cookie| cookie.ends_with("; Secure")));
    }
}
