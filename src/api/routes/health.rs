//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (reports loaded)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once a fetch has completed without error.
pub async fn readiness(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    let snapshot = state.view.snapshot().await;
    match (snapshot.loading, snapshot.error) {
        (_, Some(error)) => Err(ApiError::ServiceUnavailable(error)),
        (true, None) => Err(ApiError::ServiceUnavailable(
            "reports not loaded yet".to_string(),
        )),
        (false, None) => Ok(StatusCode::OK),
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.view.snapshot().await;

    let (status, source) = match (snapshot.loading, &snapshot.error) {
        (_, Some(_)) => ("degraded", "error"),
        (true, None) => ("starting", "pending"),
        (false, None) => ("healthy", "ok"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        source: source.to_string(),
        items: snapshot.items.len(),
        generation: snapshot.generation,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
