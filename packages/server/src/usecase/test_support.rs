//! UseCase テスト用の共通ヘルパー

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use super::session::Session;
use crate::{
    domain::{Chat, ChatId, ChatRole, ChatType, ConnectionIdFactory, Identity, UserId},
    infrastructure::{
        hub::{HubHandle, OutboundFrame},
        repository::InMemoryChatRepository,
    },
};

pub(crate) const TEST_QUEUE_CAPACITY: usize = 16;

pub(crate) fn user(id: i64) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn chat(id: i64) -> ChatId {
    ChatId::new(id).unwrap()
}

/// users: 1 Ivan Ivanov, 2 Maria Petrova, 3 Oleg Sidorov, 4 (no name)
/// chats: 10 group {1 admin, 2, 4}, 20 channel {1 admin, 2}, 30 group {3}
pub(crate) async fn seeded_repository() -> Arc<InMemoryChatRepository> {
    let repository = Arc::new(InMemoryChatRepository::new());
    repository.add_user(user(1), "Ivan Ivanov").await;
    repository.add_user(user(2), "Maria Petrova").await;
    repository.add_user(user(3), "Oleg Sidorov").await;

    repository
        .add_chat(Chat::new(chat(10), ChatType::Group, 1))
        .await;
    repository
        .add_chat(Chat::new(chat(20), ChatType::Channel, 1))
        .await;
    repository
        .add_chat(Chat::new(chat(30), ChatType::Group, 1))
        .await;

    repository
        .add_member(chat(10), user(1), ChatRole::Admin)
        .await;
    repository
        .add_member(chat(10), user(2), ChatRole::Member)
        .await;
    repository
        .add_member(chat(10), user(4), ChatRole::Member)
        .await;
    repository
        .add_member(chat(20), user(1), ChatRole::Admin)
        .await;
    repository
        .add_member(chat(20), user(2), ChatRole::Member)
        .await;
    repository
        .add_member(chat(30), user(3), ChatRole::Member)
        .await;
    repository
}

/// A registered connection whose outbound queue the test reads directly
pub(crate) struct TestClient {
    pub session: Session,
    pub rx: mpsc::Receiver<OutboundFrame>,
}

pub(crate) async fn connect(hub: &HubHandle, identity: Identity) -> TestClient {
    let session = Session::new(ConnectionIdFactory::generate(), identity);
    let (tx, rx) = mpsc::channel(TEST_QUEUE_CAPACITY);
    hub.register(session.registration(tx)).await.unwrap();
    TestClient { session, rx }
}

impl TestClient {
    pub async fn next_frame(&mut self) -> OutboundFrame {
        tokio::time::timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("outbound queue closed")
    }

    /// Asserts nothing is queued once the Hub has processed every earlier
    /// broadcast.
    pub async fn assert_no_frame(&mut self, hub: &HubHandle) {
        hub.stats().await.unwrap();
        assert!(
            self.rx.try_recv().is_err(),
            "unexpected frame for {}",
            self.session.identity
        );
    }
}
