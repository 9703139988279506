//! Session endpoints: login, current state, logout, and decision explanations.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use complaintdesk_auth::{Permission, PermissionQuery, Requirement, explain as explain_decision};

use crate::app::dto::{ExplainQuery, PrincipalView, SessionCreated, SessionStatus, SessionView};
use crate::app::{errors, services::ConsoleServices};
use crate::context::SessionContext;
use crate::middleware;
use crate::views::AdminView;

/// POST /session - exchange a bearer token for a console session.
///
/// Responds immediately; permissions load in the background and the session
/// reads as `loading` until they arrive. A session already attached to the
/// request is closed once the new token is accepted.
pub async fn create(
    Extension(services): Extension<Arc<ConsoleServices>>,
    Extension(ctx): Extension<SessionContext>,
    headers: HeaderMap,
) -> Response {
    let token = match middleware::extract_bearer(&headers) {
        Ok(token) => token,
        Err(status) => return errors::json_error(status, "unauthorized", "missing bearer token"),
    };

    let now = Utc::now();
    let claims = match services.jwt.validate(token, now) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "session token rejected");
            return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_token", e.to_string());
        }
    };

    if let Some(previous) = ctx.session_id() {
        if services.sessions.close(previous) {
            tracing::info!(session = %previous, "session superseded by new login");
        }
    }

    let expires_at = claims.expires_at;
    let session_id = services.start_session(claims, token.to_string(), now);

    (
        StatusCode::CREATED,
        [(
            header::SET_COOKIE,
            middleware::session_cookie_header(session_id, services.config.secure_cookie),
        )],
        Json(SessionCreated {
            session_id,
            expires_at,
        }),
    )
        .into_response()
}

/// GET /session - current state and principal.
pub async fn show(Extension(ctx): Extension<SessionContext>) -> Json<SessionView> {
    let snapshot = ctx.snapshot(Utc::now());
    Json(SessionView {
        state: SessionStatus::of(&snapshot),
        principal: snapshot.principal().map(PrincipalView::from),
    })
}

/// DELETE /session - log out. Idempotent.
pub async fn destroy(
    Extension(services): Extension<Arc<ConsoleServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    if let Some(id) = ctx.session_id() {
        if services.sessions.close(id) {
            tracing::info!(session = %id, "session closed");
        }
    }
    (
        StatusCode::NO_CONTENT,
        [(
            header::SET_COOKIE,
            middleware::cleared_session_cookie_header(services.config.secure_cookie),
        )],
    )
        .into_response()
}

/// GET /session/explain?permission=P or ?view=slug - why a gate passes or fails.
pub async fn explain(
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ExplainQuery>,
) -> Response {
    let requirement = match (query.permission, query.view) {
        (Some(token), None) => match Permission::parse(token) {
            Ok(permission) => Requirement::from(PermissionQuery::Single(permission)),
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_permission", e.to_string()),
        },
        (None, Some(slug)) => match AdminView::from_slug(&slug) {
            Some(view) => view.requirement(),
            None => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "unknown view"),
        },
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_query",
                "pass exactly one of 'permission' or 'view'",
            );
        }
    };

    let snapshot = ctx.snapshot(Utc::now());
    (StatusCode::OK, Json(explain_decision(snapshot.principal(), &requirement))).into_response()
}
