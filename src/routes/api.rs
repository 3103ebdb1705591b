use crate::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/v1/diagnostics", get(handlers::diagnostics))
        .route("/v1/rooms/:room_id", get(handlers::room_info))
        .route("/run-code", post(handlers::run_code))
        .with_state(state)
}
