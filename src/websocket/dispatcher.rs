// Event dispatch table.
//
// Every inbound client event maps to exactly one `msg_*_handler`. Handlers
// run to completion against the room registry and deliver their own
// outbound events; the dispatcher only decides what to do with failures.
// `createRoom`/`joinRoom` failures go back to the origin as `joinError`;
// everything else is logged and dropped.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::{ClientEvent, ServerEvent};
use crate::websocket::msg_chat_handler::handle_chat_message;
use crate::websocket::msg_code_change_handler::handle_code_change;
use crate::websocket::msg_create_room_handler::handle_create_room;
use crate::websocket::msg_join_room_handler::handle_join_room;
use crate::websocket::msg_leave_room_handler::handle_leave_room;
use crate::websocket::msg_ping_handler::handle_ping;
use crate::websocket::msg_typing_handler::{handle_stop_typing, handle_typing};
use crate::ws::{RoomError, RoomRegistry, Session};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<RoomRegistry>,
}

fn answers_with_join_error(event_name: &str) -> bool {
    matches!(event_name, "createRoom" | "joinRoom")
}

impl Dispatcher {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Parse one text frame and dispatch it. Malformed frames are dropped;
    /// if they still name `createRoom`/`joinRoom` the origin gets a `joinError`.
    pub async fn dispatch_text(&self, session: &mut Session, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(session, event).await,
            Err(e) => {
                let event_name = serde_json::from_str::<Value>(text)
                    .ok()
                    .and_then(|v| v.get("event").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_default();
                self.report(
                    session,
                    &event_name,
                    RoomError::InvalidPayload(e.to_string()),
                );
            }
        }
    }

    pub async fn dispatch(&self, session: &mut Session, event: ClientEvent) {
        let event_name = event.name();
        debug!("{} from {}", event_name, session.connection_id());

        let registry = self.registry.as_ref();
        let result = match event {
            ClientEvent::CreateRoom(req) => handle_create_room(req, session, registry).await,
            ClientEvent::JoinRoom(req) => handle_join_room(req, session, registry).await,
            ClientEvent::LeaveRoom(room_id) => handle_leave_room(room_id, session, registry).await,
            ClientEvent::CodeChange(msg) => handle_code_change(msg, session, registry).await,
            ClientEvent::ChatMessage(msg) => handle_chat_message(msg, session, registry).await,
            ClientEvent::Typing(msg) => handle_typing(msg, session, registry).await,
            ClientEvent::StopTyping(msg) => handle_stop_typing(msg, session, registry).await,
            ClientEvent::Ping => {
                handle_ping(session);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(session, event_name, e);
        }
    }

    fn report(&self, session: &Session, event_name: &str, error: RoomError) {
        if answers_with_join_error(event_name) && error.is_reported() {
            warn!(
                "{} from {} failed: {}",
                event_name,
                session.connection_id(),
                error
            );
            session.send(ServerEvent::JoinError(error.to_string()));
        } else {
            debug!(
                "Dropped {} from {}: {}",
                if event_name.is_empty() { "frame" } else { event_name },
                session.connection_id(),
                error
            );
        }
    }

    /// Transport went away: leave whatever room the session was in.
    pub async fn disconnect(&self, session: &mut Session) {
        if self.registry.remove_session_everywhere(session).await {
            info!(
                "{} ({}) removed from room '{}' on disconnect",
                session.display_name(),
                session.connection_id(),
                session.room_id().unwrap_or_default()
            );
        }
        session.exit_room();
    }
}
