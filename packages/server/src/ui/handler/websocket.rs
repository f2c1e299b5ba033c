//! WebSocket upgrade handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State, ws::WebSocketUpgrade},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};

use crate::{
    domain::{Identity, IdentityResolver},
    ui::{
        connection,
        state::{AppState, ConnectQuery},
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let identity = resolve_identity(state.identity.as_ref(), credential(&query, &headers)).await;
    let max_frame_bytes = state.connection.max_frame_bytes;

    ws.max_message_size(max_frame_bytes)
        .max_frame_size(max_frame_bytes)
        .on_upgrade(move |socket| connection::serve(socket, state, identity))
}

/// Mounted in place of [`websocket_handler`] when WebSocket is switched off
pub async fn websocket_disabled() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

/// Query token first, then `Authorization: Bearer`.
fn credential<'a>(query: &'a ConnectQuery, headers: &'a HeaderMap) -> Option<&'a str> {
    let from_query = query.token.as_deref().map(str::trim).filter(|t| !t.is_empty());
    from_query.or_else(|| {
        headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Missing or unverifiable credentials connect as a guest.
async fn resolve_identity(resolver: &dyn IdentityResolver, credential: Option<&str>) -> Identity {
    let Some(credential) = credential else {
        return Identity::Guest;
    };
    match resolver.resolve_identity(credential).await {
        Ok(user_id) => Identity::User(user_id),
        Err(e) => {
            tracing::info!(error = %e, "Credential rejected, connecting as guest");
            Identity::Guest
        }
    }
}
