//! Core domain models for the chat fan-out engine.
//!
//! Chats, memberships and messages are owned by the store collaborator; the
//! engine only reads them (and asks the store to create messages).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    error::ValueObjectError,
    value_object::{ChatId, MessageId, MessageText, Timestamp, UserId},
};

/// Kind of chat. Channels are broadcast-only for non-admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChatType {
    Personal,
    Group,
    Channel,
}

impl TryFrom<u8> for ChatType {
    type Error = ValueObjectError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Personal),
            2 => Ok(Self::Group),
            3 => Ok(Self::Channel),
            other => Err(ValueObjectError::UnknownChatType(other)),
        }
    }
}

impl From<ChatType> for u8 {
    fn from(chat_type: ChatType) -> Self {
        match chat_type {
            ChatType::Personal => 1,
            ChatType::Group => 2,
            ChatType::Channel => 3,
        }
    }
}

/// Role of a member inside one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChatRole {
    Member,
    Admin,
}

impl TryFrom<u8> for ChatRole {
    type Error = ValueObjectError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Member),
            2 => Ok(Self::Admin),
            other => Err(ValueObjectError::UnknownChatRole(other)),
        }
    }
}

impl From<ChatRole> for u8 {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::Member => 1,
            ChatRole::Admin => 2,
        }
    }
}

/// A chat as seen by the fan-out engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    pub workspace_id: i64,
}

impl Chat {
    pub fn new(id: ChatId, chat_type: ChatType, workspace_id: i64) -> Self {
        Self {
            id,
            chat_type,
            workspace_id,
        }
    }

    /// Whether `role` may post into this chat.
    pub fn allows_write_by(&self, role: ChatRole) -> bool {
        match self.chat_type {
            ChatType::Channel => role == ChatRole::Admin,
            ChatType::Personal | ChatType::Group => true,
        }
    }
}

/// A persisted chat message, after the store assigned its id and date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub text: MessageText,
    pub date: Timestamp,
    /// Per-reader read state, keyed by reader. Empty for a new message.
    pub read_state: HashMap<UserId, Timestamp>,
}

/// Caller identity attached to a connection.
///
/// Guests may hold a socket open but fail every authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    User(UserId),
    Guest,
}

impl Identity {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Identity::User(id) => Some(*id),
            Identity::Guest => None,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user:{id}"),
            Identity::Guest => write!(f, "guest"),
        }
    }
}
