//! Per-connection context handed to every use case.

use tokio::sync::mpsc;

use super::error::RouterError;
use crate::{
    domain::{ConnectionId, Identity, UserDirectory, UserId},
    infrastructure::hub::{JoinedChats, OutboundFrame, Registration},
};

/// Shown when the user directory cannot name a user
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// The reader side of one connection: who is talking, and which chats the
/// connection has joined.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub identity: Identity,
    pub joined: JoinedChats,
}

impl Session {
    pub fn new(connection_id: ConnectionId, identity: Identity) -> Self {
        Self {
            connection_id,
            identity,
            joined: JoinedChats::new(),
        }
    }

    /// Registration handing this connection's outbound queue to the Hub.
    pub fn registration(&self, sender: mpsc::Sender<OutboundFrame>) -> Registration {
        Registration {
            id: self.connection_id,
            identity: self.identity,
            joined: self.joined.clone(),
            sender,
        }
    }

    /// Guests fail every authorization check.
    pub fn require_user(&self) -> Result<UserId, RouterError> {
        self.identity.user_id().ok_or(RouterError::Unauthenticated)
    }
}

/// Best-effort display name; lookup failures never fail the action.
pub async fn display_name_or_default(users: &dyn UserDirectory, user_id: UserId) -> String {
    match users.resolve_display_name(user_id).await {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!(%user_id, error = %e, "Display name lookup failed");
            FALLBACK_DISPLAY_NAME.to_string()
        }
    }
}
