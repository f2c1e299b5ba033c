//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::{ChatId, UserId};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId must be a positive integer
    #[error("UserId must be positive (got {0})")]
    UserIdNotPositive(i64),

    /// ChatId must be a positive integer
    #[error("ChatId must be positive (got {0})")]
    ChatIdNotPositive(i64),

    /// MessageText validation error
    #[error("MessageText cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },

    /// Unknown chat type discriminant
    #[error("unknown chat type: {0}")]
    UnknownChatType(u8),

    /// Unknown chat role discriminant
    #[error("unknown chat role: {0}")]
    UnknownChatRole(u8),
}

/// Errors returned by the membership / message store collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("chat {0} not found")]
    ChatNotFound(ChatId),

    #[error("user {user_id} is not a member of chat {chat_id}")]
    NotAMember { user_id: UserId, chat_id: ChatId },

    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Backing store failed; the caller may resubmit
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while turning a connection credential into an identity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("refresh tokens cannot open a connection")]
    RefreshToken,

    #[error(transparent)]
    InvalidUserId(#[from] ValueObjectError),
}
