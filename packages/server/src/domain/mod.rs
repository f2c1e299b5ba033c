//! Domain layer for the chat fan-out engine.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Chat, ChatRole, ChatType, Identity, Message};
pub use error::{IdentityError, RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{ChatRepository, IdentityResolver, UserDirectory};
pub use value_object::{ChatId, ConnectionId, MessageId, MessageText, Timestamp, UserId};

#[cfg(test)]
pub use repository::{MockChatRepository, MockIdentityResolver, MockUserDirectory};
