//! WebSocket frame DTOs for the chat fan-out engine.
//!
//! Every frame is a JSON object tagged by `type`. Optional fields are
//! omitted from the wire when absent.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, Message, UserId};

/// Client → server frame types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFrameType {
    JoinChat,
    LeaveChat,
    SendMessage,
    Typing,
    StopTyping,
    /// Any `type` string this server does not understand
    #[serde(other)]
    Unknown,
}

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    pub r#type: ClientFrameType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Server → client frame types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerFrameType {
    JoinedChat,
    UserJoined,
    UserLeft,
    NewMessage,
    UserTyping,
    UserStoppedTyping,
    Error,
}

/// Stable, machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidFormat,
    UnknownType,
    Unauthorized,
    Forbidden,
    ChatNotFound,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

/// Message body carried by `new_message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub text: String,
    /// Unix timestamp (seconds)
    pub date: i64,
    pub status: String,
    pub edited: bool,
}

impl MessagePayload {
    /// Build the wire payload of a freshly stored message.
    pub fn from_message(message: &Message, user_name: String) -> Self {
        Self {
            id: message.id.value(),
            chat_id: message.chat_id.value(),
            user_id: message.user_id.value(),
            user_name,
            text: message.text.as_str().to_string(),
            date: message.date.value(),
            status: "sent".to_string(),
            edited: false,
        }
    }
}

/// Frame sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFrame {
    pub r#type: ServerFrameType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl ServerFrame {
    fn bare(r#type: ServerFrameType) -> Self {
        Self {
            r#type,
            chat_id: None,
            user_id: None,
            user_name: None,
            message: None,
            error: None,
        }
    }

    fn presence(
        r#type: ServerFrameType,
        chat_id: ChatId,
        user_id: UserId,
        user_name: Option<String>,
    ) -> Self {
        Self {
            chat_id: Some(chat_id.value()),
            user_id: Some(user_id.value()),
            user_name,
            ..Self::bare(r#type)
        }
    }

    /// Ack sent to the caller of `join_chat`
    pub fn joined_chat(chat_id: ChatId, user_id: UserId) -> Self {
        Self::presence(ServerFrameType::JoinedChat, chat_id, user_id, None)
    }

    pub fn user_joined(chat_id: ChatId, user_id: UserId, user_name: String) -> Self {
        Self::presence(ServerFrameType::UserJoined, chat_id, user_id, Some(user_name))
    }

    pub fn user_left(chat_id: ChatId, user_id: UserId) -> Self {
        Self::presence(ServerFrameType::UserLeft, chat_id, user_id, None)
    }

    pub fn user_typing(chat_id: ChatId, user_id: UserId, user_name: String) -> Self {
        Self::presence(ServerFrameType::UserTyping, chat_id, user_id, Some(user_name))
    }

    pub fn user_stopped_typing(chat_id: ChatId, user_id: UserId) -> Self {
        Self::presence(ServerFrameType::UserStoppedTyping, chat_id, user_id, None)
    }

    pub fn new_message(message: MessagePayload) -> Self {
        Self {
            chat_id: Some(message.chat_id),
            message: Some(message),
            ..Self::bare(ServerFrameType::NewMessage)
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: Some(ErrorPayload {
                code,
                message: message.into(),
            }),
            ..Self::bare(ServerFrameType::Error)
        }
    }
}
