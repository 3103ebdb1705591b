use chrono::Utc;
use tracing::{debug, error};

use crate::models::{PongMessage, ServerEvent};
use crate::ws::Session;

/// Handle ping - reply with pong to the sender only
pub fn handle_ping(session: &Session) {
    debug!("Ping received from {}", session.connection_id());

    let pong = ServerEvent::Pong(PongMessage {
        date: Utc::now().to_rfc3339(),
    });
    if !session.send(pong) {
        error!("Failed to send Pong to {}", session.connection_id());
    }
}
