use tracing::info;

use crate::models::RoomRequest;
use crate::websocket::msg_leave_room_handler::move_to_room;
use crate::ws::{RoomError, RoomRegistry, Session};

/// Handle joinRoom
pub async fn handle_join_room(
    req: RoomRequest,
    session: &mut Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    info!(
        "Join room requested by {}: room={}",
        session.connection_id(),
        req.room_id()
    );

    session.rename(req.username());

    // Joining the room we are already in just re-sends the current buffer.
    registry.join_room(req.room_id(), session).await?;
    move_to_room(session, registry, req.room_id()).await;
    Ok(())
}
