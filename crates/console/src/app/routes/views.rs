use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use complaintdesk_auth::{ProtectedRoute, RouteDecision};

use crate::app::{pages, services::ConsoleServices};
use crate::context::SessionContext;
use crate::views::AdminView;

/// GET /views/:slug - a guarded console view.
///
/// - 202 loading placeholder while the session's permissions are in flight
/// - 303 to the login path without a usable session
/// - 403 denial page when the requirement fails
/// - 200 the view otherwise
pub async fn show(
    Extension(services): Extension<Arc<ConsoleServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(slug): Path<String>,
) -> Response {
    let Some(view) = AdminView::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, pages::not_found()).into_response();
    };

    let snapshot = ctx.snapshot(Utc::now());
    let requirement = view.requirement();
    let decision = ProtectedRoute::new(&requirement, &services.config.login_path)
        .with_denial_view(view.denial_view())
        .resolve(&snapshot, |principal| pages::view_shell(view, principal));

    match decision {
        RouteDecision::Loading => (StatusCode::ACCEPTED, pages::loading(view)).into_response(),
        RouteDecision::Redirect { to } => {
            tracing::debug!(view = view.slug(), "no session; redirecting to login");
            Redirect::to(&to).into_response()
        }
        RouteDecision::Denied(denial) => {
            tracing::debug!(
                view = view.slug(),
                requirement = %requirement,
                session = ?ctx.session_id(),
                "view denied"
            );
            (StatusCode::FORBIDDEN, pages::denied(&denial)).into_response()
        }
        RouteDecision::Render(page) => page.into_response(),
    }
}
