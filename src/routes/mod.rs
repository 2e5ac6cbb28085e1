pub mod auth;
pub mod children;
pub mod events;
pub mod health;
pub mod metrics;
pub mod reports;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Log the error server-side and return an opaque 500. Internal detail never
/// reaches the client.
pub(crate) fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    tracing::error!("internal error: {e:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

pub(crate) fn not_found(what: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{what} not found") })),
    )
}

pub(crate) fn bad_request(msg: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": msg.to_string() })),
    )
}
