// Fan-out of server events to a resolved set of connections.
//
// An `Outbound` is built by a `Room` while its lock is held and is delivered
// before that lock is released, so each member sees a room's events in the
// order the room applied them. Delivery only enqueues into bounded outboxes
// and never waits on a socket. A connection whose queue is full misses the
// event and is flagged for eviction.

use tracing::{debug, warn};

use super::session::{Outbox, PushError, Session};
use crate::models::ServerEvent;

#[derive(Debug, Clone)]
pub struct Recipient {
    pub connection_id: String,
    pub outbox: Outbox,
}

impl Recipient {
    pub fn new(connection_id: impl Into<String>, outbox: Outbox) -> Self {
        Self {
            connection_id: connection_id.into(),
            outbox,
        }
    }

    pub fn of(session: &Session) -> Self {
        Self::new(session.connection_id(), session.outbox().clone())
    }
}

/// One event addressed to a set of connections.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub recipients: Vec<Recipient>,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(recipients: Vec<Recipient>, event: ServerEvent) -> Self {
        Self { recipients, event }
    }

    pub fn to(recipient: Recipient, event: ServerEvent) -> Self {
        Self::new(vec![recipient], event)
    }

    pub fn connection_ids(&self) -> Vec<&str> {
        self.recipients
            .iter()
            .map(|r| r.connection_id.as_str())
            .collect()
    }

    /// Enqueue the event for every recipient. Connections that went away or
    /// fell too far behind are skipped. Returns how many recipients accepted it.
    pub fn deliver(self) -> usize {
        let Outbound { recipients, event } = self;
        let mut delivered = 0;
        for recipient in recipients {
            match recipient.outbox.push(event.clone()) {
                Ok(()) => delivered += 1,
                Err(PushError::Full) => warn!(
                    "Outbox of connection {} is full, dropping {} and evicting it",
                    recipient.connection_id,
                    event.name()
                ),
                Err(PushError::Closed) => debug!(
                    "Skipping closed connection {} while delivering {}",
                    recipient.connection_id,
                    event.name()
                ),
            }
        }
        delivered
    }
}
