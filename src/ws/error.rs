use thiserror::Error;

/// Failures raised while handling a room event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room '{0}' already exists")]
    AlreadyExists(String),

    #[error("Room '{0}' does not exist")]
    NotFound(String),

    /// The sender is not (or no longer) a member of the target room.
    #[error("Session is not a member of the room")]
    NotAMember,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl RoomError {
    /// Whether the error is sent back to the origin as a `joinError`.
    /// Membership errors are dropped so stale sessions learn nothing about the room.
    pub fn is_reported(&self) -> bool {
        !matches!(self, RoomError::NotAMember)
    }
}
