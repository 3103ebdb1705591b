use crate::{
    clients::runner_client::RunnerError,
    models::{ErrorResponse, RunCodeRequest, RunCodeResponse},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, info};

/// Forward code to the external runner and relay its output
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunCodeRequest>,
) -> Result<(StatusCode, Json<RunCodeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let Some(runner) = &state.runner else {
        return Err(ErrorResponse::with_status(
            StatusCode::SERVICE_UNAVAILABLE,
            "Code runner is not configured",
        ));
    };

    info!("Run requested for language {}", request.language_id);
    match runner.run(&request).await {
        Ok(output) => Ok((StatusCode::OK, Json(output))),
        Err(e) => {
            error!("Run failed: {}", e);
            let status = match e {
                RunnerError::Transport(ref err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err(ErrorResponse::with_status(status, e.to_string()))
        }
    }
}
