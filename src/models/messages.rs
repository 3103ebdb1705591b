use serde::{Deserialize, Serialize};

/// `createRoom` / `joinRoom` payload. The browser client sends a bare room id;
/// richer clients may attach a display name and a starter language.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RoomRequest {
    Id(String),
    Detailed(RoomRequestDetails),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequestDetails {
    pub room_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_id: Option<u32>,
}

impl RoomRequest {
    pub fn room_id(&self) -> &str {
        match self {
            RoomRequest::Id(id) => id,
            RoomRequest::Detailed(details) => &details.room_id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            RoomRequest::Id(_) => None,
            RoomRequest::Detailed(details) => details.username.as_deref(),
        }
    }

    pub fn language_id(&self) -> Option<u32> {
        match self {
            RoomRequest::Id(_) => None,
            RoomRequest::Detailed(details) => details.language_id,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CodeChangeMessage {
    pub room: String,
    pub code: String,
}

/// Chat as sent by a client. `id` is ignored; the server stamps the connection id.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatInMessage {
    pub room: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypingMessage {
    pub room: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopTypingMessage {
    pub room: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Events received from a client, framed as `{"event": ..., "data": ...}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    CreateRoom(RoomRequest),
    JoinRoom(RoomRequest),
    LeaveRoom(String),
    CodeChange(CodeChangeMessage),
    ChatMessage(ChatInMessage),
    Typing(TypingMessage),
    StopTyping(StopTypingMessage),
    Ping,
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateRoom(_) => "createRoom",
            ClientEvent::JoinRoom(_) => "joinRoom",
            ClientEvent::LeaveRoom(_) => "leaveRoom",
            ClientEvent::CodeChange(_) => "codeChange",
            ClientEvent::ChatMessage(_) => "chatMessage",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::StopTyping(_) => "stopTyping",
            ClientEvent::Ping => "ping",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinedMessage {
    pub room_id: String,
    pub code: String,
}

/// A relayed chat line. Never stored; `id` is the origin's connection id so
/// the origin can recognise its own optimistic echo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub message: String,
    pub timestamp: String,
    pub id: String,
    pub sender: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingMessage {
    pub user_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStoppedTypingMessage {
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PongMessage {
    pub date: String,
}

/// Events pushed to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    RoomCreated(String),
    RoomJoined(RoomJoinedMessage),
    JoinError(String),
    CodeUpdate(String),
    NewChatMessage(ChatMessage),
    UserJoined(String),
    UserLeft(String),
    UserTyping(UserTypingMessage),
    UserStoppedTyping(UserStoppedTypingMessage),
    Pong(PongMessage),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoomCreated(_) => "roomCreated",
            ServerEvent::RoomJoined(_) => "roomJoined",
            ServerEvent::JoinError(_) => "joinError",
            ServerEvent::CodeUpdate(_) => "codeUpdate",
            ServerEvent::NewChatMessage(_) => "newChatMessage",
            ServerEvent::UserJoined(_) => "userJoined",
            ServerEvent::UserLeft(_) => "userLeft",
            ServerEvent::UserTyping(_) => "userTyping",
            ServerEvent::UserStoppedTyping(_) => "userStoppedTyping",
            ServerEvent::Pong(_) => "pong",
        }
    }
}
