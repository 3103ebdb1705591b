use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::broadcast::{Outbound, Recipient};
use super::error::RoomError;
use super::session::Outbox;
use crate::models::{ChatMessage, ServerEvent, UserStoppedTypingMessage, UserTypingMessage};

#[derive(Debug, Clone)]
pub struct Member {
    pub display_name: String,
    pub outbox: Outbox,
}

#[derive(Debug, Clone)]
struct TypingEntry {
    display_name: String,
    since: Instant,
}

/// A shared editing session: one authoritative buffer and its members.
///
/// The buffer is last-writer-wins. Every `codeChange` replaces it wholesale;
/// there is no merging of concurrent edits.
#[derive(Debug)]
pub struct Room {
    id: String,
    code: String,
    members: HashMap<String, Member>,
    typing: HashMap<String, TypingEntry>,
    closed: bool,
}

impl Room {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            members: HashMap::new(),
            typing: HashMap::new(),
            closed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, connection_id: &str) -> bool {
        self.members.contains_key(connection_id)
    }

    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .members
            .values()
            .map(|m| m.display_name.clone())
            .collect();
        names.sort();
        names
    }

    /// A closed room has been emptied and is about to leave the registry.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Address `event` to every member except `exclude`.
    pub fn fan_out(&self, event: ServerEvent, exclude: Option<&str>) -> Outbound {
        let recipients = self
            .members
            .iter()
            .filter(|(id, _)| Some(id.as_str()) != exclude)
            .map(|(id, m)| Recipient::new(id.clone(), m.outbox.clone()))
            .collect();
        Outbound::new(recipients, event)
    }

    /// Add a member. Returns the `userJoined` announcement for the others,
    /// or `None` when the connection was already a member (its name is refreshed).
    pub fn add_member(
        &mut self,
        connection_id: &str,
        display_name: &str,
        outbox: Outbox,
    ) -> Option<Outbound> {
        if let Some(member) = self.members.get_mut(connection_id) {
            member.display_name = display_name.to_string();
            return None;
        }
        self.members.insert(
            connection_id.to_string(),
            Member {
                display_name: display_name.to_string(),
                outbox,
            },
        );
        Some(self.fan_out(
            ServerEvent::UserJoined(display_name.to_string()),
            Some(connection_id),
        ))
    }

    /// Remove a member. Returns the `userLeft` announcement for the remaining
    /// members, or `None` when the connection was not a member.
    pub fn remove_member(&mut self, connection_id: &str) -> Option<Outbound> {
        let member = self.members.remove(connection_id)?;
        self.typing.remove(connection_id);
        Some(self.fan_out(ServerEvent::UserLeft(member.display_name), None))
    }

    fn touch_member(&mut self, connection_id: &str, display_name: &str) -> Result<(), RoomError> {
        let member = self
            .members
            .get_mut(connection_id)
            .ok_or(RoomError::NotAMember)?;
        if member.display_name != display_name {
            member.display_name = display_name.to_string();
        }
        Ok(())
    }

    /// Overwrite the buffer and address `codeUpdate` to everyone but the writer.
    pub fn apply_code_change(
        &mut self,
        connection_id: &str,
        code: String,
    ) -> Result<Outbound, RoomError> {
        if !self.is_member(connection_id) {
            return Err(RoomError::NotAMember);
        }
        self.code = code;
        Ok(self.fan_out(ServerEvent::CodeUpdate(self.code.clone()), Some(connection_id)))
    }

    /// Build a chat line tagged with the sender's name and connection id and
    /// address it to everyone but the sender, who already echoed it locally.
    pub fn chat(
        &mut self,
        connection_id: &str,
        display_name: &str,
        text: &str,
        timestamp: String,
    ) -> Result<Outbound, RoomError> {
        if text.trim().is_empty() {
            return Err(RoomError::InvalidPayload("empty chat message".into()));
        }
        self.touch_member(connection_id, display_name)?;
        self.typing.remove(connection_id);
        let message = ChatMessage {
            message: text.to_string(),
            timestamp,
            id: connection_id.to_string(),
            sender: display_name.to_string(),
        };
        Ok(self.fan_out(ServerEvent::NewChatMessage(message), Some(connection_id)))
    }

    pub fn start_typing(
        &mut self,
        connection_id: &str,
        display_name: &str,
        now: Instant,
    ) -> Result<Outbound, RoomError> {
        self.touch_member(connection_id, display_name)?;
        self.typing.insert(
            connection_id.to_string(),
            TypingEntry {
                display_name: display_name.to_string(),
                since: now,
            },
        );
        let event = ServerEvent::UserTyping(UserTypingMessage {
            user_id: connection_id.to_string(),
            username: display_name.to_string(),
        });
        Ok(self.fan_out(event, Some(connection_id)))
    }

    pub fn stop_typing(&mut self, connection_id: &str) -> Result<Outbound, RoomError> {
        if !self.is_member(connection_id) {
            return Err(RoomError::NotAMember);
        }
        self.typing.remove(connection_id);
        let event = ServerEvent::UserStoppedTyping(UserStoppedTypingMessage {
            user_id: connection_id.to_string(),
        });
        Ok(self.fan_out(event, Some(connection_id)))
    }

    /// Names of members whose last `typing` is younger than `timeout`.
    pub fn typing_names(&self, now: Instant, timeout: Duration) -> Vec<String> {
        let mut names: Vec<String> = self
            .typing
            .values()
            .filter(|t| now.saturating_duration_since(t.since) < timeout)
            .map(|t| t.display_name.clone())
            .collect();
        names.sort();
        names
    }
}
