//! UseCase: チャット退出処理

use crate::{
    domain::ChatId,
    infrastructure::{dto::websocket::ServerFrame, hub::HubHandle},
};

use super::{error::RouterError, session::Session};

/// チャット退出のユースケース
pub struct LeaveChatUseCase {
    hub: HubHandle,
}

impl LeaveChatUseCase {
    pub fn new(hub: HubHandle) -> Self {
        Self { hub }
    }

    /// チャット退出を実行
    ///
    /// 参加していないチャットからの退出は何もせず成功します。
    pub async fn execute(&self, session: &Session, chat_id: ChatId) -> Result<(), RouterError> {
        let user_id = session.require_user()?;

        if !session.joined.remove(chat_id).await {
            return Ok(());
        }

        self.hub
            .broadcast_excluding(chat_id, ServerFrame::user_left(chat_id, user_id), user_id)
            .await?;
        tracing::info!(connection_id = %session.connection_id, %user_id, %chat_id, "Left chat");
        Ok(())
    }
}
