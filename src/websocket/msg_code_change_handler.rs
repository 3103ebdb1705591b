use tracing::debug;

use crate::models::CodeChangeMessage;
use crate::ws::{RoomError, RoomRegistry, Session};

/// Handle codeChange - overwrite and broadcast
pub async fn handle_code_change(
    msg: CodeChangeMessage,
    session: &Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    let CodeChangeMessage { room, code } = msg;
    let bytes = code.len();
    let reached = registry.apply_code_change(&room, session, code).await?;
    debug!(
        "Code change in room '{}' from {}: {} bytes to {} members",
        room,
        session.connection_id(),
        bytes,
        reached
    );
    Ok(())
}
