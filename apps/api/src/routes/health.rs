//! Liveness banner and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

pub const BANNER: &str = "Restaurant Billing API is running";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub restaurant: String,
    pub version: &'static str,
}

pub async fn banner() -> &'static str {
    BANNER
}

/// 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.db.health_check().await;
    let (code, status, database) = if healthy {
        (StatusCode::OK, "ok", "connected")
    } else {
        tracing::warn!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            restaurant: state.config.restaurant_name.clone(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
