//! Server assembly and startup.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    error::ServerError,
    handler::{health_check, hub_stats, websocket_disabled, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};
use crate::{
    config::ServerConfig,
    infrastructure::{
        hub::Hub,
        identity::JwtIdentityResolver,
        repository::{InMemoryChatRepository, SeedData},
    },
};

/// WebSocket endpoint path
pub const WEBSOCKET_PATH: &str = "/api/v1/chats/ws";

/// Build the HTTP router over `state`.
pub fn build_app(state: Arc<AppState>) -> Router {
    let websocket = if state.websocket_enabled {
        get(websocket_handler)
    } else {
        get(websocket_disabled)
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route(WEBSOCKET_PATH, websocket)
        .route("/api/v1/chats/ws/stats", get(hub_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Run the server described by `config` until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    let seed = match &config.seed_file {
        Some(path) => {
            let seed = SeedData::load(path).await?;
            tracing::info!(
                path = %path.display(),
                users = seed.users.len(),
                chats = seed.chats.len(),
                members = seed.members.len(),
                "Loaded seed data"
            );
            seed
        }
        None => SeedData::default(),
    };
    let repository = Arc::new(InMemoryChatRepository::from_seed(seed));

    let (hub, hub_loop) = Hub::spawn(config.broadcast_capacity);
    let state = Arc::new(AppState::new(
        repository.clone(),
        repository,
        Arc::new(JwtIdentityResolver::new(&config.jwt_secret)),
        hub.clone(),
        config.connection_settings(),
        config.websocket_enabled,
    ));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(
        %addr,
        websocket_enabled = config.websocket_enabled,
        "Listening on http://{addr}{WEBSOCKET_PATH}"
    );

    serve(listener, state, shutdown_signal(hub)).await?;

    if let Err(e) = hub_loop.await {
        tracing::warn!(error = %e, "Hub task failed");
    }
    tracing::info!("Server stopped");
    Ok(())
}
