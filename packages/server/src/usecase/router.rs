//! Message Router
//!
//! 受信した 1 フレームをデコードし、型ごとのユースケースへ振り分けます。
//! 失敗は接続を切らずに、呼び出し元へ `error` フレームとして返します。

use std::sync::Arc;

use crate::{
    domain::{ChatId, ChatRepository, UserDirectory},
    infrastructure::{
        dto::websocket::{ClientFrame, ClientFrameType, ServerFrame},
        hub::HubHandle,
    },
};

use super::{
    error::RouterError,
    join_chat::JoinChatUseCase,
    leave_chat::LeaveChatUseCase,
    send_message::SendMessageUseCase,
    session::Session,
    typing::{TypingState, TypingUseCase},
};

/// A decoded and shape-checked client frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    JoinChat(ChatId),
    LeaveChat(ChatId),
    SendMessage { chat_id: ChatId, text: String },
    Typing(ChatId, TypingState),
}

impl TryFrom<ClientFrame> for Command {
    type Error = RouterError;

    fn try_from(frame: ClientFrame) -> Result<Self, Self::Error> {
        if frame.r#type == ClientFrameType::Unknown {
            return Err(RouterError::UnknownType);
        }

        let chat_id = frame
            .chat_id
            .ok_or(RouterError::MissingChatId)
            .and_then(|raw| ChatId::new(raw).map_err(RouterError::InvalidChatId))?;

        let command = match frame.r#type {
            ClientFrameType::JoinChat => Command::JoinChat(chat_id),
            ClientFrameType::LeaveChat => Command::LeaveChat(chat_id),
            ClientFrameType::SendMessage => Command::SendMessage {
                chat_id,
                text: frame.text.ok_or(RouterError::MissingText)?,
            },
            ClientFrameType::Typing => Command::Typing(chat_id, TypingState::Started),
            ClientFrameType::StopTyping => Command::Typing(chat_id, TypingState::Stopped),
            ClientFrameType::Unknown => return Err(RouterError::UnknownType),
        };
        Ok(command)
    }
}

/// Routes decoded frames to their use case
pub struct MessageRouter {
    join_chat: JoinChatUseCase,
    leave_chat: LeaveChatUseCase,
    send_message: SendMessageUseCase,
    typing: TypingUseCase,
    hub: HubHandle,
}

impl MessageRouter {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        users: Arc<dyn UserDirectory>,
        hub: HubHandle,
    ) -> Self {
        Self {
            join_chat: JoinChatUseCase::new(repository.clone(), users.clone(), hub.clone()),
            leave_chat: LeaveChatUseCase::new(hub.clone()),
            send_message: SendMessageUseCase::new(repository, users.clone(), hub.clone()),
            typing: TypingUseCase::new(users, hub.clone()),
            hub,
        }
    }

    /// Handle one inbound text frame. Failures are replied to the caller;
    /// nothing here closes the connection.
    pub async fn handle_text(&self, session: &Session, text: &str) {
        let result = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => self.dispatch(session, frame).await,
            Err(e) => {
                tracing::debug!(connection_id = %session.connection_id, error = %e, "Undecodable frame");
                Err(RouterError::InvalidFormat)
            }
        };

        if let Err(error) = result {
            self.reject(session, error).await;
        }
    }

    pub async fn dispatch(&self, session: &Session, frame: ClientFrame) -> Result<(), RouterError> {
        match Command::try_from(frame)? {
            Command::JoinChat(chat_id) => self.join_chat.execute(session, chat_id).await,
            Command::LeaveChat(chat_id) => self.leave_chat.execute(session, chat_id).await,
            Command::SendMessage { chat_id, text } => self
                .send_message
                .execute(session, chat_id, text)
                .await
                .map(|_| ()),
            Command::Typing(chat_id, state) => {
                self.typing.execute(session, chat_id, state).await
            }
        }
    }

    /// Reply to the caller with an `error` frame.
    pub async fn reject(&self, session: &Session, error: RouterError) {
        tracing::info!(
            connection_id = %session.connection_id,
            identity = %session.identity,
            code = ?error.code(),
            %error,
            "Rejected client frame"
        );
        let frame = ServerFrame::error(error.code(), error.to_string());
        if self.hub.send_to(session.connection_id, frame).await.is_err() {
            tracing::debug!(connection_id = %session.connection_id, "Hub closed; error reply dropped");
        }
    }
}
