use axum::{Router, routing::get};

pub mod nav;
pub mod session;
pub mod system;
pub mod views;

/// Router for session, navigation and view endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/session",
            get(session::show).post(session::create).delete(session::destroy),
        )
        .route("/session/explain", get(session::explain))
        .route("/nav", get(nav::nav))
        .route("/views/:slug", get(views::show))
}
