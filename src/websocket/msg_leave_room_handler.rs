use tracing::info;

use crate::ws::{RoomError, RoomRegistry, Session};

/// Handle leaveRoom. Leaving a room the session is not in is a no-op.
pub async fn handle_leave_room(
    room_id: String,
    session: &mut Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    if registry.leave_room(&room_id, session.connection_id()).await {
        info!("{} left room '{}'", session.connection_id(), room_id);
    }
    if session.room_id() == Some(room_id.as_str()) {
        session.exit_room();
    }
    Ok(())
}

/// Record `room_id` as the session's room, then detach the session from the
/// room it was in before. Callers attach to `room_id` first, so a failed
/// switch never costs the session its current room.
pub async fn move_to_room(session: &mut Session, registry: &RoomRegistry, room_id: &str) {
    let previous = session
        .room_id()
        .filter(|current| *current != room_id)
        .map(str::to_string);
    session.enter_room(room_id);
    if let Some(previous) = previous {
        registry.leave_room(&previous, session.connection_id()).await;
    }
}
