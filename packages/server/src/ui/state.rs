//! Server state shared by every handler.

use std::sync::Arc;

use serde::Deserialize;

use super::connection::ConnectionSettings;
use crate::{
    domain::{ChatRepository, IdentityResolver, UserDirectory},
    infrastructure::hub::HubHandle,
    usecase::MessageRouter,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Access token; takes precedence over the `Authorization` header
    pub token: Option<String>,
}

/// Shared application state
pub struct AppState {
    pub hub: HubHandle,
    pub router: MessageRouter,
    pub identity: Arc<dyn IdentityResolver>,
    pub connection: ConnectionSettings,
    pub websocket_enabled: bool,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        users: Arc<dyn UserDirectory>,
        identity: Arc<dyn IdentityResolver>,
        hub: HubHandle,
        connection: ConnectionSettings,
        websocket_enabled: bool,
    ) -> Self {
        Self {
            router: MessageRouter::new(repository, users, hub.clone()),
            hub,
            identity,
            connection,
            websocket_enabled,
        }
    }
}
