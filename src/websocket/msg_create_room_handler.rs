use tracing::info;

use crate::models::RoomRequest;
use crate::websocket::msg_leave_room_handler::move_to_room;
use crate::ws::{RoomError, RoomRegistry, Session};

/// Handle createRoom
pub async fn handle_create_room(
    req: RoomRequest,
    session: &mut Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    info!(
        "Create room requested by {}: room={}",
        session.connection_id(),
        req.room_id()
    );

    if session.room_id() == Some(req.room_id()) {
        return Err(RoomError::AlreadyExists(req.room_id().to_string()));
    }

    session.rename(req.username());
    registry
        .create_room(req.room_id(), req.language_id(), session)
        .await?;
    move_to_room(session, registry, req.room_id()).await;
    Ok(())
}
