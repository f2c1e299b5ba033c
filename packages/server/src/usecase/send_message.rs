//! UseCase: メッセージ送信処理
//!
//! 参加済みチャットへのメッセージを保存し、送信者を含む全参加者へ
//! `new_message` として配信します。チャンネルでは管理者のみ送信できます。

use std::sync::Arc;

use crate::{
    domain::{ChatId, ChatRepository, ChatType, MessageText, RepositoryError, UserDirectory},
    infrastructure::{
        dto::websocket::{MessagePayload, ServerFrame},
        hub::HubHandle,
    },
};

use super::{
    error::RouterError,
    session::{Session, display_name_or_default},
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    users: Arc<dyn UserDirectory>,
    hub: HubHandle,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        users: Arc<dyn UserDirectory>,
        hub: HubHandle,
    ) -> Self {
        Self {
            repository,
            users,
            hub,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(MessagePayload)` - 配信したメッセージ
    /// * `Err(RouterError)` - 認可・検証・保存のいずれかに失敗
    pub async fn execute(
        &self,
        session: &Session,
        chat_id: ChatId,
        text: String,
    ) -> Result<MessagePayload, RouterError> {
        let user_id = session.require_user()?;
        if !session.joined.contains(chat_id).await {
            return Err(RouterError::NotJoined);
        }
        let text = MessageText::new(text).map_err(RouterError::InvalidText)?;

        // 1. チャンネルの書き込み権限を確認
        let chat = match self.repository.get_chat_by_id(chat_id).await {
            Ok(chat) => chat,
            Err(RepositoryError::ChatNotFound(_)) => return Err(RouterError::ChatNotFound),
            Err(e) => {
                tracing::warn!(%chat_id, error = %e, "Chat lookup failed");
                return Err(RouterError::ChatLookupFailed);
            }
        };
        if chat.chat_type == ChatType::Channel {
            // role を取得できない場合は書き込み不可として扱う
            let role = self
                .repository
                .get_role(user_id, chat_id)
                .await
                .map_err(|e| {
                    tracing::debug!(%user_id, %chat_id, error = %e, "Role lookup failed");
                    RouterError::NotChannelAdmin
                })?;
            if !chat.allows_write_by(role) {
                return Err(RouterError::NotChannelAdmin);
            }
        }

        // 2. 保存
        let message = self
            .repository
            .create_message(chat_id, user_id, text)
            .await
            .map_err(|e| {
                tracing::warn!(%user_id, %chat_id, error = %e, "Message store failed");
                RouterError::StoreUnavailable
            })?;

        // 3. 送信者を含む全参加者へ配信
        let user_name = display_name_or_default(self.users.as_ref(), user_id).await;
        let payload = MessagePayload::from_message(&message, user_name);
        self.hub
            .broadcast(chat_id, ServerFrame::new_message(payload.clone()))
            .await?;

        tracing::debug!(%user_id, %chat_id, message_id = payload.id, "Message fanned out");
        Ok(payload)
    }
}
