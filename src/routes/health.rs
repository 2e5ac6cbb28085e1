use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
    database: bool,
    version: &'static str,
}

/// GET /health — liveness plus a database round-trip. Probe failures are
/// logged server-side; the body keeps a stable shape for monitors.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok",
                database: true,
                version: env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => {
            warn!("health check database probe failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "degraded",
                    database: false,
                    version: env!("CARGO_PKG_VERSION"),
                }),
            )
        }
    }
}
