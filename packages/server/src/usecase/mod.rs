//! UseCase 層
//!
//! クライアントから届いたフレームを解釈し、認可を行い、Hub へ配信を依頼する
//! レイヤー。UI 層（接続のリードポンプ）から呼び出されます。

pub mod error;
pub mod join_chat;
pub mod leave_chat;
pub mod router;
pub mod send_message;
pub mod session;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::RouterError;
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use router::{Command, MessageRouter};
pub use send_message::SendMessageUseCase;
pub use session::{FALLBACK_DISPLAY_NAME, Session};
pub use typing::{TypingState, TypingUseCase};
