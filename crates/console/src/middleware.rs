use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::context::SessionContext;
use crate::sessions::{SessionId, SessionRegistry};

pub const SESSION_COOKIE: &str = "complaintdesk_session";

#[derive(Clone)]
pub struct SessionLayerState {
    pub sessions: Arc<SessionRegistry>,
}

/// Attach a [`SessionContext`] to every request.
///
/// Never rejects: deciding between redirect, denial and 401 is up to the
/// route, which knows whether it is a view or a JSON endpoint.
pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = session_cookie(req.headers())
        .and_then(|id| state.sessions.reader(id).map(|reader| SessionContext::new(id, reader)))
        .unwrap_or_else(SessionContext::anonymous);

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

fn session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

pub fn session_cookie_header(id: SessionId, secure: bool) -> String {
    format!("{SESSION_COOKIE}={id}; {}", cookie_attributes(secure))
}

pub fn cleared_session_cookie_header(secure: bool) -> String {
    format!("{SESSION_COOKIE}=; {}; Max-Age=0", cookie_attributes(secure))
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "Path=/; HttpOnly; SameSite=Lax; Secure"
    } else {
        "Path=/; HttpOnly; SameSite=Lax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_cookie_among_others() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en")).unwrap(),
        );
        assert_eq!(session_cookie(&headers), Some(id));
    }

    #[test]
    fn ignores_malformed_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("complaintdesk_session=garbage"),
        );
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn cookie_header_carries_secure_flag_when_enabled() {
        let id = SessionId::new();
        let secure = session_cookie_header(id, true);
        assert!(secure.starts_with(&format!("{SESSION_COOKIE}={id};")));
        assert!(secure.contains("HttpOnly"));
        assert!(secure.ends_with("; Secure"));

        assert!(!session_cookie_header(id, false).contains("Secure"));
        assert!(cleared_session_cookie_header(true).contains("Secure; Max-Age=0"));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  tok "));
        assert_eq!(extract_bearer(&headers), Ok("tok"));
    }
}
