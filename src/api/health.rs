//! Health check endpoints for liveness and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::domain::user::UserId;

/// Health response body
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check - verifies storage answers a trivial query
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    // Probe query against a random owner; an empty result still proves the
    // store is reachable
    let (status, code) = match state.projects.list_for_owner(UserId::generate()).await {
        Ok(_) => (HealthStatus::Healthy, StatusCode::OK),
        Err(_) => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (code, Json(response))
}

/// Liveness check - used to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
