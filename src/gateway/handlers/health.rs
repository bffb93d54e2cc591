//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;

/// Health check response data
#[derive(serde::Serialize, serde::Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Server timestamp in milliseconds
    #[schema(example = 1760000000000_u64)]
    pub timestamp_ms: u64,
    /// Backing store (`postgres` or `memory`)
    #[schema(example = "postgres")]
    pub store: String,
    /// Build revision
    pub version: String,
}

/// Health check endpoint
///
/// Pings the store. Failure details go to the log, not the response.
///
/// - Healthy: 200 OK + `{status: "ok", ...}`
/// - Unhealthy: 503 Service Unavailable + `{status: "unavailable", ...}`
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let (status, label) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("[HEALTH] {} store ping failed: {}", state.store.name(), e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp_ms: now_ms,
            store: state.store.name().to_string(),
            version: env!("GIT_HASH").to_string(),
        }),
    )
}
