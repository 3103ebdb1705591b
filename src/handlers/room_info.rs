use crate::{
    models::{ErrorResponse, RoomInfoResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// Describe a live room
pub async fn room_info(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<RoomInfoResponse>), (StatusCode, Json<ErrorResponse>)> {
    let Some(snapshot) = state.registry.snapshot(&room_id).await else {
        debug!("Room info requested for unknown room '{}'", room_id);
        return Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            format!("Room '{}' does not exist", room_id),
        ));
    };

    Ok((
        StatusCode::OK,
        Json(RoomInfoResponse {
            room_id: snapshot.room_id,
            members: snapshot.members,
            typing: snapshot.typing,
            code_length: snapshot.code.chars().count(),
        }),
    ))
}
