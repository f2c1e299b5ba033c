//! UseCase: 入力中インジケーター

use std::sync::Arc;

use crate::{
    domain::{ChatId, UserDirectory},
    infrastructure::{dto::websocket::ServerFrame, hub::HubHandle},
};

use super::{
    error::RouterError,
    session::{Session, display_name_or_default},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    Started,
    Stopped,
}

/// 入力中通知のユースケース
///
/// 通知は送信者以外の参加者にのみ届き、何も保存しません。
pub struct TypingUseCase {
    users: Arc<dyn UserDirectory>,
    hub: HubHandle,
}

impl TypingUseCase {
    pub fn new(users: Arc<dyn UserDirectory>, hub: HubHandle) -> Self {
        Self { users, hub }
    }

    pub async fn execute(
        &self,
        session: &Session,
        chat_id: ChatId,
        state: TypingState,
    ) -> Result<(), RouterError> {
        let user_id = session.require_user()?;
        if !session.joined.contains(chat_id).await {
            return Err(RouterError::NotJoined);
        }

        let frame = match state {
            TypingState::Started => {
                let user_name = display_name_or_default(self.users.as_ref(), user_id).await;
                ServerFrame::user_typing(chat_id, user_id, user_name)
            }
            TypingState::Stopped => ServerFrame::user_stopped_typing(chat_id, user_id),
        };
        self.hub.broadcast_excluding(chat_id, frame, user_id).await?;
        Ok(())
    }
}
