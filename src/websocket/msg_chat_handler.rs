use chrono::Utc;
use tracing::debug;

use crate::models::ChatInMessage;
use crate::ws::{RoomError, RoomRegistry, Session};

/// Handle chatMessage
pub async fn handle_chat_message(
    msg: ChatInMessage,
    session: &mut Session,
    registry: &RoomRegistry,
) -> Result<(), RoomError> {
    let sender = session.name_or_current(msg.sender.as_deref());
    let timestamp = msg
        .timestamp
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let reached = registry
        .send_chat_message(&msg.room, session, &sender, &msg.message, timestamp)
        .await?;
    session.rename(Some(&sender));
    debug!(
        "Chat in room '{}' from {} relayed to {} members",
        msg.room, sender, reached
    );
    Ok(())
}
