//! Per-connection joined-chat set.
//!
//! The one piece of state shared outside the Hub loop: the connection's
//! reader writes it on join/leave and the Hub reads it on every broadcast.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::RwLock;

use crate::domain::ChatId;

#[derive(Debug, Clone, Default)]
pub struct JoinedChats(Arc<RwLock<HashSet<ChatId>>>);

impl JoinedChats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the chat was not joined before.
    pub async fn insert(&self, chat_id: ChatId) -> bool {
        self.0.write().await.insert(chat_id)
    }

    /// Returns `true` when the chat was joined.
    pub async fn remove(&self, chat_id: ChatId) -> bool {
        self.0.write().await.remove(&chat_id)
    }

    pub async fn contains(&self, chat_id: ChatId) -> bool {
        self.0.read().await.contains(&chat_id)
    }

    /// Joined chats in ascending id order.
    #[cfg(test)]
    pub async fn snapshot(&self) -> Vec<ChatId> {
        let mut chats: Vec<ChatId> = self.0.read().await.iter().copied().collect();
        chats.sort();
        chats
    }
}
