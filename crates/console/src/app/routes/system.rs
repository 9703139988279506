use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    response::{IntoResponse, Response},
};

use crate::app::{pages, services::ConsoleServices};

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn login_page(Extension(services): Extension<Arc<ConsoleServices>>) -> Response {
    pages::login(&services.config.login_path).into_response()
}
