use crate::models::{StopTypingMessage, TypingMessage};
use crate::ws::{RoomError, RoomRegistry, Session};

// The server only relays typing state; every client expires indicators on its own.

/// Handle typing
pub async fn handle_typing(
    msg: TypingMessage,
    session: &mut Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    let username = session.name_or_current(msg.username.as_deref());
    registry.start_typing(&msg.room, session, &username).await?;
    session.rename(Some(&username));
    Ok(())
}

/// Handle stopTyping
pub async fn handle_stop_typing(
    msg: StopTypingMessage,
    session: &Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    registry.stop_typing(&msg.room, session).await?;
    Ok(())
}
