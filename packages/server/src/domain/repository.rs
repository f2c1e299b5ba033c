//! Collaborator interfaces consumed by the fan-out engine.
//!
//! The engine never owns chats, messages or users. These traits are the
//! only way it reaches the services that do; `infrastructure` provides the
//! implementations.

use async_trait::async_trait;

use super::{
    entity::{Chat, ChatRole, Message},
    error::{IdentityError, RepositoryError},
    value_object::{ChatId, MessageText, UserId},
};

/// Membership and message store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Whether `user_id` belongs to `chat_id`.
    async fn is_member(&self, user_id: UserId, chat_id: ChatId) -> Result<bool, RepositoryError>;

    /// Role of `user_id` in `chat_id`.
    ///
    /// # Errors
    ///
    /// `RepositoryError::NotAMember` when the user is not in the chat
    async fn get_role(&self, user_id: UserId, chat_id: ChatId)
    -> Result<ChatRole, RepositoryError>;

    /// # Errors
    ///
    /// `RepositoryError::ChatNotFound` when no such chat exists
    async fn get_chat_by_id(&self, chat_id: ChatId) -> Result<Chat, RepositoryError>;

    /// Persist a message and return it with its assigned id and date.
    async fn create_message(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        text: MessageText,
    ) -> Result<Message, RepositoryError>;
}

/// Display names, owned by the user service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve_display_name(&self, user_id: UserId) -> Result<String, RepositoryError>;
}

/// Verified-token identity resolution.
///
/// Implementations must verify the credential; they never trust a claim
/// the client could forge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_identity(&self, credential: &str) -> Result<UserId, IdentityError>;
}
