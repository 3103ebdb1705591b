use std::sync::Arc;

use tokio::sync::{
    mpsc::{self, error::TrySendError},
    Notify,
};
use tracing::debug;
use uuid::Uuid;

use crate::models::ServerEvent;

/// Queue length used when the configuration does not say otherwise.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Why an event was not queued for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The queue is at capacity. The connection is flagged for eviction.
    Full,
    /// The writer side is gone.
    Closed,
}

/// Sending half of a connection's bounded outbound queue. The connection's
/// writer task drains it. Pushing never waits: a full queue raises the
/// overflow signal instead, and the connection's reader loop drops it.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::Sender<ServerEvent>,
    overflow: Arc<Notify>,
}

impl Outbox {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let outbox = Self {
            tx,
            overflow: Arc::new(Notify::new()),
        };
        (outbox, rx)
    }

    pub fn push(&self, event: ServerEvent) -> Result<(), PushError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.overflow.notify_one();
                Err(PushError::Full)
            }
            Err(TrySendError::Closed(_)) => Err(PushError::Closed),
        }
    }

    /// Resolves once a push found the queue full.
    pub async fn overflowed(&self) {
        self.overflow.notified().await
    }
}

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// Server-side state of one live connection.
#[derive(Debug)]
pub struct Session {
    connection_id: String,
    display_name: String,
    room_id: Option<String>,
    outbox: Outbox,
}

impl Session {
    pub fn new(outbox: Outbox) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), outbox)
    }

    pub fn with_id(connection_id: impl Into<String>, outbox: Outbox) -> Self {
        Self {
            connection_id: connection_id.into(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            room_id: None,
            outbox,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Adopt a client supplied name. Blank names are ignored.
    pub fn rename(&mut self, name: Option<&str>) {
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            if name != self.display_name {
                debug!("Connection {} is now known as '{}'", self.connection_id, name);
                self.display_name = name.to_string();
            }
        }
    }

    pub fn enter_room(&mut self, room_id: &str) {
        self.room_id = Some(room_id.to_string());
    }

    /// Forget the current room, returning it.
    pub fn exit_room(&mut self) -> Option<String> {
        self.room_id.take()
    }

    /// The name to announce for this connection, preferring a non-blank candidate.
    pub fn name_or_current(&self, candidate: Option<&str>) -> String {
        candidate
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.display_name)
            .to_string()
    }

    /// Push an event to this connection only. Returns false once the
    /// connection is gone or too far behind.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbox.push(event).is_ok()
    }
}
