//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state (sessions, token validator, permission source)
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: JSON request/response shapes
//! - `pages.rs`: HTML for views, loading and denial screens
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use complaintdesk_auth::Hs256JwtValidator;

use crate::config::ConsoleConfig;
use crate::middleware;
use crate::permission_source::PermissionSource;
use crate::sessions::SessionRegistry;

pub mod dto;
pub mod errors;
pub mod pages;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(config: ConsoleConfig, source: Arc<dyn PermissionSource>) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let sessions = Arc::new(SessionRegistry::new(config.session_load_timeout_chrono()));
    let login_path = config.login_path.clone();

    let services = Arc::new(services::ConsoleServices {
        sessions: sessions.clone(),
        jwt,
        source,
        config: Arc::new(config),
    });
    let session_state = middleware::SessionLayerState { sessions };

    Router::new()
        .route("/health", get(routes::system::health))
        .route(&login_path, get(routes::system::login_page))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(axum::middleware::from_fn_with_state(
                    session_state,
                    middleware::session_middleware,
                )),
        )
}
