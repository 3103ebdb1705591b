use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Room, connection and process statistics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Current diagnostics", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// Describe a live collaborative room
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    params(
        ("room_id" = String, Path, description = "Room identifier")
    ),
    responses(
        (status = 200, description = "Room found", body = RoomInfoResponse),
        (status = 404, description = "Room does not exist", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn room_info_doc() {}

/// Run code on the external runner
#[utoipa::path(
    post,
    path = "/api/run-code",
    request_body = RunCodeRequest,
    responses(
        (status = 200, description = "Runner output", body = RunCodeResponse),
        (status = 502, description = "Runner failed", body = ErrorResponse),
        (status = 503, description = "Runner not configured", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn run_code_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        diagnostics_doc,
        room_info_doc,
        run_code_doc,
    ),
    components(
        schemas(
            HealthResponse,
            DiagnosticsResponse,
            RoomInfoResponse,
            RunCodeRequest,
            RunCodeResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
