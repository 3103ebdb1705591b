use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::debug;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Readiness check requested");
    let rooms = state.registry.room_count().await;
    let runner = if state.runner.is_some() {
        "runner configured"
    } else {
        "runner not configured"
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        message: format!("Service is ready ({} rooms, {})", rooms, runner),
    })
}
