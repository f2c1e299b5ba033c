//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{
    domain::ValueObjectError,
    infrastructure::{dto::websocket::ErrorCode, hub::HubError},
};

/// Reasons the Router rejects a client frame.
///
/// `Display` is the human-readable message sent to the caller; `code()` is
/// the stable machine-readable part.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Invalid message format")]
    InvalidFormat,

    #[error("Binary frames are not supported")]
    BinaryFrame,

    #[error("chat_id is required")]
    MissingChatId,

    #[error("Invalid chat_id: {0}")]
    InvalidChatId(ValueObjectError),

    #[error("text is required")]
    MissingText,

    #[error("Invalid text: {0}")]
    InvalidText(ValueObjectError),

    #[error("Unknown message type")]
    UnknownType,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("You are not a member of this chat")]
    NotAMember,

    #[error("Join the chat first")]
    NotJoined,

    #[error("Only admins can write in channels")]
    NotChannelAdmin,

    #[error("Chat not found")]
    ChatNotFound,

    #[error("Failed to check membership")]
    MembershipUnavailable,

    #[error("Failed to load chat")]
    ChatLookupFailed,

    #[error("Failed to create message")]
    StoreUnavailable,

    #[error("Realtime hub is not running")]
    HubUnavailable,
}

impl RouterError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RouterError::InvalidFormat
            | RouterError::BinaryFrame
            | RouterError::MissingChatId
            | RouterError::InvalidChatId(_)
            | RouterError::MissingText
            | RouterError::InvalidText(_) => ErrorCode::InvalidFormat,
            RouterError::UnknownType => ErrorCode::UnknownType,
            RouterError::Unauthenticated | RouterError::NotAMember | RouterError::NotJoined => {
                ErrorCode::Unauthorized
            }
            RouterError::NotChannelAdmin => ErrorCode::Forbidden,
            RouterError::ChatNotFound => ErrorCode::ChatNotFound,
            RouterError::MembershipUnavailable
            | RouterError::ChatLookupFailed
            | RouterError::StoreUnavailable
            | RouterError::HubUnavailable => ErrorCode::InternalError,
        }
    }
}

impl From<HubError> for RouterError {
    fn from(_: HubError) -> Self {
        RouterError::HubUnavailable
    }
}
