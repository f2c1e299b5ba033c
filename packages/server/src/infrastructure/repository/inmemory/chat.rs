//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する `ChatRepository` / `UserDirectory` trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 本番ではチャット・メンバー・メッセージは chat サービスの PostgreSQL が、
//! 表示名は user サービスが所有します。この実装はバイナリ単体での起動と
//! テストのためのものです。

use std::collections::HashMap;

use async_trait::async_trait;
use corpchat_shared::time::get_unix_timestamp;
use tokio::sync::Mutex;

use super::seed::SeedData;
use crate::domain::{
    Chat, ChatId, ChatRepository, ChatRole, Message, MessageId, MessageText, RepositoryError,
    Timestamp, UserDirectory, UserId,
};

#[derive(Default)]
struct Store {
    users: HashMap<UserId, String>,
    chats: HashMap<ChatId, Chat>,
    members: HashMap<(ChatId, UserId), ChatRole>,
    messages: Vec<Message>,
    last_message_id: i64,
}

/// インメモリ Chat Repository 実装
#[derive(Default)]
pub struct InMemoryChatRepository {
    store: Mutex<Store>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// シードデータから Repository を作成
    pub fn from_seed(seed: SeedData) -> Self {
        let mut store = Store::default();
        for user in seed.users {
            store.users.insert(user.id, user.name);
        }
        for chat in seed.chats {
            store.chats.insert(chat.id, chat);
        }
        for member in seed.members {
            store
                .members
                .insert((member.chat_id, member.user_id), member.role);
        }
        Self {
            store: Mutex::new(store),
        }
    }

    pub async fn add_user(&self, id: UserId, name: impl Into<String>) {
        self.store.lock().await.users.insert(id, name.into());
    }

    pub async fn add_chat(&self, chat: Chat) {
        self.store.lock().await.chats.insert(chat.id, chat);
    }

    pub async fn add_member(&self, chat_id: ChatId, user_id: UserId, role: ChatRole) {
        self.store
            .lock()
            .await
            .members
            .insert((chat_id, user_id), role);
    }

    /// Messages stored for `chat_id`, oldest first.
    pub async fn messages_in(&self, chat_id: ChatId) -> Vec<Message> {
        self.store
            .lock()
            .await
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn is_member(&self, user_id: UserId, chat_id: ChatId) -> Result<bool, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.members.contains_key(&(chat_id, user_id)))
    }

    async fn get_role(
        &self,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<ChatRole, RepositoryError> {
        let store = self.store.lock().await;
        store
            .members
            .get(&(chat_id, user_id))
            .copied()
            .ok_or(RepositoryError::NotAMember { user_id, chat_id })
    }

    async fn get_chat_by_id(&self, chat_id: ChatId) -> Result<Chat, RepositoryError> {
        let store = self.store.lock().await;
        store
            .chats
            .get(&chat_id)
            .cloned()
            .ok_or(RepositoryError::ChatNotFound(chat_id))
    }

    async fn create_message(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        text: MessageText,
    ) -> Result<Message, RepositoryError> {
        let mut store = self.store.lock().await;
        if !store.chats.contains_key(&chat_id) {
            return Err(RepositoryError::ChatNotFound(chat_id));
        }

        store.last_message_id += 1;
        let message = Message {
            id: MessageId::new(store.last_message_id),
            chat_id,
            user_id,
            text,
            date: Timestamp::new(get_unix_timestamp()),
            read_state: HashMap::new(),
        };
        store.messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl UserDirectory for InMemoryChatRepository {
    async fn resolve_display_name(&self, user_id: UserId) -> Result<String, RepositoryError> {
        let store = self.store.lock().await;
        store
            .users
            .get(&user_id)
            .cloned()
            .ok_or(RepositoryError::UserNotFound(user_id))
    }
}
