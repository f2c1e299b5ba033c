//! Test fixtures shared by the integration tests.
//!
//! `TestServer` runs the full axum app on an ephemeral port over the demo
//! seed (`fixtures/seed.json`); `WsClient` is a thin tokio-tungstenite
//! client that speaks JSON frames.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use corpchat_server::{
    domain::ChatRepository,
    infrastructure::{
        hub::{Hub, HubHandle, HubStats},
        identity::{AccessClaims, JwtIdentityResolver, TOKEN_ISSUER},
        repository::{InMemoryChatRepository, SeedData},
    },
    ui::{self, connection::ConnectionSettings, state::AppState},
};
use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Message,
        client::IntoClientRequest,
        http::{HeaderValue, header::AUTHORIZATION},
    },
};

pub const TEST_SECRET: &str = "integration-test-secret";

const SEED_JSON: &str = include_str!("../../../../fixtures/seed.json");
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// Knobs for a single test server
#[derive(Debug, Clone)]
pub struct TestOptions {
    pub websocket_enabled: bool,
    pub connection: ConnectionSettings,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            websocket_enabled: true,
            connection: ConnectionSettings {
                ping_interval: None,
                ..ConnectionSettings::default()
            },
        }
    }
}

/// Test server running on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    pub repository: Arc<InMemoryChatRepository>,
    pub hub: HubHandle,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(TestOptions::default()).await
    }

    pub async fn start_with(options: TestOptions) -> Self {
        Self::start_with_store(options, |repository, _| {
            repository as Arc<dyn ChatRepository>
        })
        .await
    }

    /// Start with the message store replaced by `store`, which receives the
    /// seeded repository and the Hub handle.
    pub async fn start_with_store<F>(options: TestOptions, store: F) -> Self
    where
        F: FnOnce(Arc<InMemoryChatRepository>, HubHandle) -> Arc<dyn ChatRepository>,
    {
        let seed = SeedData::from_json_str(SEED_JSON).expect("seed fixture must parse");
        let repository = Arc::new(InMemoryChatRepository::from_seed(seed));
        let (hub, _hub_loop) = Hub::spawn(256);
        let state = Arc::new(AppState::new(
            store(repository.clone(), hub.clone()),
            repository.clone(),
            Arc::new(JwtIdentityResolver::new(TEST_SECRET)),
            hub.clone(),
            options.connection,
            options.websocket_enabled,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let task = tokio::spawn(async move {
            let _ = ui::serve(listener, state, std::future::pending()).await;
        });

        Self {
            addr,
            repository,
            hub,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, ui::WEBSOCKET_PATH)
    }

    pub fn ws_url_with_token(&self, token: &str) -> String {
        format!("{}?token={token}", self.ws_url())
    }

    /// Connect with an access token for `user_id` in the query string.
    pub async fn connect_as(&self, user_id: i64) -> WsClient {
        WsClient::connect(&self.ws_url_with_token(&access_token(user_id))).await
    }

    pub async fn connect_guest(&self) -> WsClient {
        WsClient::connect(&self.ws_url()).await
    }

    /// Poll Hub stats until `expected` holds.
    pub async fn wait_for_stats(&self, expected: HubStats) {
        let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
        loop {
            let stats = self.hub.stats().await.expect("hub running");
            if stats == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "hub stats stuck at {stats:?}, expected {expected:?}"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn sign(claims: &AccessClaims) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

fn claims(user_id: i64, token_type: Option<&str>) -> AccessClaims {
    let now = corpchat_shared::time::get_unix_timestamp() as u64;
    AccessClaims {
        user_id,
        role: "user".to_string(),
        token_type: token_type.map(str::to_string),
        iss: TOKEN_ISSUER.to_string(),
        exp: now + 900,
        iat: now,
        jti: None,
    }
}

pub fn access_token(user_id: i64) -> String {
    sign(&claims(user_id, Some("access")))
}

pub fn refresh_token(user_id: i64) -> String {
    sign(&claims(user_id, Some("refresh")))
}

/// WebSocket client speaking JSON frames
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        Self { stream }
    }

    /// Connect with `Authorization: Bearer <token>`.
    pub async fn connect_with_bearer(url: &str, token: &str) -> Self {
        let mut request = url.into_client_request().expect("valid ws url");
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header"),
        );
        let (stream, _) = connect_async(request).await.expect("Failed to connect");
        Self { stream }
    }

    pub async fn send_json(&mut self, frame: Value) {
        self.send_text(&frame.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn join(&mut self, chat_id: i64) {
        self.send_json(serde_json::json!({"type": "join_chat", "chat_id": chat_id}))
            .await;
    }

    pub async fn say(&mut self, chat_id: i64, text: &str) {
        self.send_json(serde_json::json!({"type": "send_message", "chat_id": chat_id, "text": text}))
            .await;
    }

    /// Next JSON frame, skipping control frames.
    pub async fn recv_frame(&mut self) -> Value {
        loop {
            let message = tokio::time::timeout(FRAME_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("socket ended")
                .expect("socket error");
            match message {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("frame must be JSON");
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    /// Next frame, asserting its `type`.
    pub async fn expect_type(&mut self, expected: &str) -> Value {
        let frame = self.recv_frame().await;
        assert_eq!(frame["type"], expected, "unexpected frame: {frame}");
        frame
    }

    /// Next frame, asserting it is an error with `code`.
    pub async fn expect_error(&mut self, code: &str) -> Value {
        let frame = self.expect_type("error").await;
        assert_eq!(frame["error"]["code"], code, "unexpected error: {frame}");
        frame
    }

    /// Asserts no data frame arrives within a short window.
    pub async fn expect_silence(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(200), self.recv_frame()).await;
        assert!(result.is_err(), "unexpected frame: {:?}", result.ok());
    }

    /// Waits for the server to close the socket.
    pub async fn expect_closed(&mut self) {
        loop {
            let next = tokio::time::timeout(FRAME_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for close");
            match next {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(Message::Text(text))) => panic!("unexpected frame before close: {text}"),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Collects every text frame until the server closes the socket.
    pub async fn frames_until_closed(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        loop {
            let next = tokio::time::timeout(FRAME_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for close");
            match next {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return frames,
                Some(Ok(Message::Text(text))) => {
                    frames.push(serde_json::from_str(text.as_str()).expect("frame must be JSON"))
                }
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
