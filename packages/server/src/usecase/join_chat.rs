//! UseCase: チャット参加処理
//!
//! メンバーシップを確認し、接続の joined セットにチャットを追加します。
//! 初回参加時のみ他の参加者へ `user_joined` を通知します。

use std::sync::Arc;

use crate::{
    domain::{ChatId, ChatRepository, UserDirectory},
    infrastructure::{dto::websocket::ServerFrame, hub::HubHandle},
};

use super::{
    error::RouterError,
    session::{Session, display_name_or_default},
};

/// チャット参加のユースケース
pub struct JoinChatUseCase {
    repository: Arc<dyn ChatRepository>,
    users: Arc<dyn UserDirectory>,
    hub: HubHandle,
}

impl JoinChatUseCase {
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

    /// チャット参加を実行
    ///
    /// 参加済みのチャットへの再参加は ack のみ再送し、通知は行いません。
    pub async fn execute(&self, session: &Session, chat_id: ChatId) -> Result<(), RouterError> {
        let user_id = session.require_user()?;

        let is_member = self
            .repository
            .is_member(user_id, chat_id)
            .await
            .map_err(|e| {
                tracing::warn!(%user_id, %chat_id, error = %e, "Membership check failed");
                RouterError::MembershipUnavailable
            })?;
        if !is_member {
            return Err(RouterError::NotAMember);
        }

        let newly_joined = session.joined.insert(chat_id).await;

        // ack は Hub 経由で送り、同じ接続宛の他のフレームとの順序を保つ
        self.hub
            .send_to(session.connection_id, ServerFrame::joined_chat(chat_id, user_id))
            .await?;

        if newly_joined {
            let user_name = display_name_or_default(self.users.as_ref(), user_id).await;
            self.hub
                .broadcast_excluding(
                    chat_id,
                    ServerFrame::user_joined(chat_id, user_id, user_name),
                    user_id,
                )
                .await?;
            tracing::info!(connection_id = %session.connection_id, %user_id, %chat_id, "Joined chat");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Identity, MockChatRepository, RepositoryError},
        infrastructure::{
            dto::websocket::{ErrorCode, ServerFrameType},
            hub::{DEFAULT_BROADCAST_CAPACITY, Hub},
        },
        usecase::test_support::{chat, connect, seeded_repository, user},
    };

    #[tokio::test]
    async fn test_join_chat_acks_caller_and_notifies_others() {
        // テスト項目: メンバーが参加すると本人に ack、他の参加者に user_joined が届く
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let repository = seeded_repository().await;
        let usecase = JoinChatUseCase::new(repository.clone(), repository, hub.clone());
        let mut ivan = connect(&hub, Identity::User(user(1))).await;
        let mut maria = connect(&hub, Identity::User(user(2))).await;
        usecase.execute(&ivan.session, chat(10)).await.unwrap();
        let _ = ivan.next_frame().await;

        // when (操作):
        let result = usecase.execute(&maria.session, chat(10)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(maria.session.joined.contains(chat(10)).await);

        let ack = maria.next_frame().await;
        assert_eq!(ack.r#type, ServerFrameType::JoinedChat);
        assert_eq!(ack.chat_id, Some(10));
        assert_eq!(ack.user_id, Some(2));

        let notice = ivan.next_frame().await;
        assert_eq!(notice.r#type, ServerFrameType::UserJoined);
        assert_eq!(notice.user_id, Some(2));
        assert_eq!(notice.user_name.as_deref(), Some("Maria Petrova"));

        maria.assert_no_frame(&hub).await;
    }

    #[tokio::test]
    async fn test_rejoin_resends_ack_without_notification() {
        // テスト項目: 参加済みチャットへの再参加は ack のみ返し、通知は繰り返さない
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let repository = seeded_repository().await;
        let usecase = JoinChatUseCase::new(repository.clone(), repository, hub.clone());
        let mut ivan = connect(&hub, Identity::User(user(1))).await;
        let mut maria = connect(&hub, Identity::User(user(2))).await;
        usecase.execute(&ivan.session, chat(10)).await.unwrap();
        usecase.execute(&maria.session, chat(10)).await.unwrap();
        let _ = ivan.next_frame().await;
        let _ = ivan.next_frame().await;
        let _ = maria.next_frame().await;

        // when (操作):
        usecase.execute(&maria.session, chat(10)).await.unwrap();

        // then (期待する結果):
        assert_eq!(maria.next_frame().await.r#type, ServerFrameType::JoinedChat);
        ivan.assert_no_frame(&hub).await;
    }

    #[tokio::test]
    async fn test_join_chat_rejects_non_member() {
        // テスト項目: メンバーでないチャットへの参加は拒否され、joined に追加されない
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let repository = seeded_repository().await;
        let usecase = JoinChatUseCase::new(repository.clone(), repository, hub.clone());
        let mut ivan = connect(&hub, Identity::User(user(1))).await;

        // when (操作):
        let result = usecase.execute(&ivan.session, chat(30)).await;

        // then (期待する結果):
        assert_eq!(result, Err(RouterError::NotAMember));
        assert!(!ivan.session.joined.contains(chat(30)).await);
        ivan.assert_no_frame(&hub).await;
    }

    #[tokio::test]
    async fn test_join_chat_rejects_guest() {
        // テスト項目: ゲストの参加は Unauthenticated で拒否される
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let repository = seeded_repository().await;
        let usecase = JoinChatUseCase::new(repository.clone(), repository, hub.clone());
        let guest = connect(&hub, Identity::Guest).await;

        // when (操作):
        let result = usecase.execute(&guest.session, chat(10)).await;

        // then (期待する結果):
        assert_eq!(result, Err(RouterError::Unauthenticated));
        assert!(guest.session.joined.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_chat_reports_membership_failure() {
        // テスト項目: メンバーシップ確認の失敗は MembershipUnavailable になる
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let mut store = MockChatRepository::new();
        store
            .expect_is_member()
            .returning(|_, _| Err(RepositoryError::Unavailable("connection reset".into())));
        let users = seeded_repository().await;
        let usecase = JoinChatUseCase::new(Arc::new(store), users, hub.clone());
        let ivan = connect(&hub, Identity::User(user(1))).await;

        // when (操作):
        let result = usecase.execute(&ivan.session, chat(10)).await;

        // then (期待する結果):
        assert_eq!(result, Err(RouterError::MembershipUnavailable));
        assert_eq!(result.unwrap_err().code(), ErrorCode::InternalError);
        assert!(!ivan.session.joined.contains(chat(10)).await);
    }

    #[tokio::test]
    async fn test_join_chat_falls_back_to_default_name() {
        // テスト項目: 表示名を持たないユーザーの参加通知は "User" になる
        // given (前提条件):
        let (hub, _loop) = Hub::spawn(DEFAULT_BROADCAST_CAPACITY);
        let repository = seeded_repository().await;
        let usecase = JoinChatUseCase::new(repository.clone(), repository, hub.clone());
        let mut ivan = connect(&hub, Identity::User(user(1))).await;
        let nameless = connect(&hub, Identity::User(user(4))).await;
        usecase.execute(&ivan.session, chat(10)).await.unwrap();
        let _ = ivan.next_frame().await;

        // when (操作):
        usecase.execute(&nameless.session, chat(10)).await.unwrap();

        // then (期待する結果):
        let notice = ivan.next_frame().await;
        assert_eq!(notice.user_name.as_deref(), Some("User"));
    }
}
