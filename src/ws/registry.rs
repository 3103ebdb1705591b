// Process-wide room registry.
//
// The map lock only guards lookup, insertion and removal of room handles.
// Everything that touches a room's buffer or members runs under that room's
// own mutex, so unrelated rooms never wait on each other. Lock order is
// always map -> room; no code path takes the map lock while holding a room.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::broadcast::{Outbound, Recipient};
use super::error::RoomError;
use super::room::Room;
use super::samples;
use super::session::Session;
use crate::models::{RoomJoinedMessage, ServerEvent};

type RoomHandle = Arc<Mutex<Room>>;

/// Point-in-time view of a room for the HTTP surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub room_id: String,
    pub code: String,
    pub members: Vec<String>,
    pub typing: Vec<String>,
}

#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, RoomHandle>>,
    default_language_id: u32,
    typing_timeout: Duration,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(samples::PYTHON, Duration::from_millis(2000))
    }
}

fn validate_room_id(room_id: &str) -> Result<(), RoomError> {
    if room_id.trim().is_empty() {
        return Err(RoomError::InvalidPayload("room id must not be empty".into()));
    }
    Ok(())
}

impl RoomRegistry {
    pub fn new(default_language_id: u32, typing_timeout: Duration) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            default_language_id,
            typing_timeout,
        }
    }

    async fn handle(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(room_id).cloned()
    }

    /// Register a new room with `session` as its first member and reply
    /// `roomCreated` to it. Exactly one of several concurrent creators wins.
    /// Returns the room's initial buffer.
    pub async fn create_room(
        &self,
        room_id: &str,
        language_id: Option<u32>,
        session: &Session,
    ) -> Result<String, RoomError> {
        validate_room_id(room_id)?;
        let mut rooms = self.rooms.write().await;
        if let Some(existing) = rooms.get(room_id) {
            // An emptied room may still be registered while its reaper waits for the map lock.
            if !existing.lock().await.is_closed() {
                return Err(RoomError::AlreadyExists(room_id.to_string()));
            }
        }

        let code = samples::initial_code(language_id, self.default_language_id);
        let mut room = Room::new(room_id, code.clone());
        room.add_member(
            session.connection_id(),
            session.display_name(),
            session.outbox().clone(),
        );
        Outbound::to(
            Recipient::of(session),
            ServerEvent::RoomCreated(room_id.to_string()),
        )
        .deliver();
        rooms.insert(room_id.to_string(), Arc::new(Mutex::new(room)));

        info!(
            "Room '{}' created by {} ({})",
            room_id,
            session.display_name(),
            session.connection_id()
        );
        Ok(code)
    }

    /// Attach `session` to an existing room and reply `roomJoined` with the
    /// buffer as it is at the moment of joining. Returns that buffer.
    pub async fn join_room(&self, room_id: &str, session: &Session) -> Result<String, RoomError> {
        validate_room_id(room_id)?;
        let handle = self
            .handle(room_id)
            .await
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;
        let mut room = handle.lock().await;
        if room.is_closed() {
            return Err(RoomError::NotFound(room_id.to_string()));
        }

        let announce = room.add_member(
            session.connection_id(),
            session.display_name(),
            session.outbox().clone(),
        );
        let code = room.code().to_string();
        Outbound::to(
            Recipient::of(session),
            ServerEvent::RoomJoined(RoomJoinedMessage {
                room_id: room_id.to_string(),
                code: code.clone(),
            }),
        )
        .deliver();
        if let Some(announce) = announce {
            announce.deliver();
            info!(
                "{} ({}) joined room '{}' ({} members)",
                session.display_name(),
                session.connection_id(),
                room_id,
                room.member_count()
            );
        }
        Ok(code)
    }

    /// Remove a connection from a room. Idempotent; returns whether the
    /// connection was a member. The room is destroyed once it is empty.
    pub async fn leave_room(&self, room_id: &str, connection_id: &str) -> bool {
        let Some(handle) = self.handle(room_id).await else {
            return false;
        };
        let emptied = {
            let mut room = handle.lock().await;
            let Some(announce) = room.remove_member(connection_id) else {
                return false;
            };
            announce.deliver();
            debug!(
                "Connection {} left room '{}' ({} members remain)",
                connection_id,
                room_id,
                room.member_count()
            );
            if room.is_empty() {
                room.close();
                true
            } else {
                false
            }
        };
        if emptied {
            self.reap(room_id, &handle).await;
        }
        true
    }

    async fn reap(&self, room_id: &str, handle: &RoomHandle) {
        let mut rooms = self.rooms.write().await;
        // A creator may already have replaced the closed room with a new one.
        if rooms
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
        {
            rooms.remove(room_id);
            info!("Room '{}' destroyed (no members left)", room_id);
        }
    }

    /// Disconnect cleanup: drop the session from whatever room it is in.
    pub async fn remove_session_everywhere(&self, session: &Session) -> bool {
        match session.room_id() {
            Some(room_id) => self.leave_room(room_id, session.connection_id()).await,
            None => false,
        }
    }

    async fn with_room<T>(
        &self,
        room_id: &str,
        op: impl FnOnce(&mut Room) -> Result<T, RoomError>,
    ) -> Result<T, RoomError> {
        let handle = self.handle(room_id).await.ok_or(RoomError::NotAMember)?;
        let mut room = handle.lock().await;
        op(&mut room)
    }

    /// Overwrite the room buffer and push `codeUpdate` to the other members.
    /// Returns the number of members the update reached.
    pub async fn apply_code_change(
        &self,
        room_id: &str,
        session: &Session,
        code: String,
    ) -> Result<usize, RoomError> {
        self.with_room(room_id, |room| {
            Ok(room.apply_code_change(session.connection_id(), code)?.deliver())
        })
        .await
    }

    /// Relay a chat line sent as `display_name`. Only members may chat.
    pub async fn send_chat_message(
        &self,
        room_id: &str,
        session: &Session,
        display_name: &str,
        text: &str,
        timestamp: String,
    ) -> Result<usize, RoomError> {
        self.with_room(room_id, |room| {
            Ok(room
                .chat(session.connection_id(), display_name, text, timestamp)?
                .deliver())
        })
        .await
    }

    pub async fn start_typing(
        &self,
        room_id: &str,
        session: &Session,
        display_name: &str,
    ) -> Result<usize, RoomError> {
        self.with_room(room_id, |room| {
            Ok(room
                .start_typing(session.connection_id(), display_name, Instant::now())?
                .deliver())
        })
        .await
    }

    pub async fn stop_typing(&self, room_id: &str, session: &Session) -> Result<usize, RoomError> {
        self.with_room(room_id, |room| {
            Ok(room.stop_typing(session.connection_id())?.deliver())
        })
        .await
    }

    /// Deliver `event` to every member of `room_id` except `exclude`.
    pub async fn broadcast(
        &self,
        room_id: &str,
        event: ServerEvent,
        exclude: Option<&str>,
    ) -> Result<usize, RoomError> {
        let handle = self
            .handle(room_id)
            .await
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;
        let room = handle.lock().await;
        Ok(room.fan_out(event, exclude).deliver())
    }

    pub async fn contains(&self, room_id: &str) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn snapshot_of(&self, handle: &RoomHandle) -> RoomSnapshot {
        let room = handle.lock().await;
        RoomSnapshot {
            room_id: room.id().to_string(),
            code: room.code().to_string(),
            members: room.member_names(),
            typing: room.typing_names(Instant::now(), self.typing_timeout),
        }
    }

    pub async fn snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        let handle = self.handle(room_id).await?;
        Some(self.snapshot_of(&handle).await)
    }

    pub async fn snapshots(&self) -> Vec<RoomSnapshot> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in &handles {
            snapshots.push(self.snapshot_of(handle).await);
        }
        snapshots.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        snapshots
    }
}
