//! One WebSocket connection: a reader, a writer, and the teardown between
//! them.
//!
//! The reader runs on the upgrade task and the writer on its own task. The
//! reader ending always unregisters the connection; the Hub then drops the
//! outbound queue and the writer sends a close frame on its way out. A
//! writer that stops first only tells the reader, which exits before its
//! next frame.

mod read_pump;
mod write_pump;

use std::{sync::Arc, time::Duration};

use axum::extract::ws::WebSocket;
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};

use super::state::AppState;
use crate::{
    domain::{ConnectionIdFactory, Identity},
    usecase::Session,
};

pub use read_pump::ReadExit;
pub use write_pump::WriteExit;

/// Default per-connection outbound queue capacity
pub const DEFAULT_SEND_QUEUE_CAPACITY: usize = 256;

/// Per-connection timing and sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Idle ping period; `None` disables pings
    pub ping_interval: Option<Duration>,
    /// Read liveness deadline
    pub pong_wait: Duration,
    /// Deadline for each socket write
    pub write_wait: Duration,
    pub send_queue_capacity: usize,
    pub max_frame_bytes: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ping_interval: Some(Duration::from_secs(30)),
            pong_wait: Duration::from_secs(60),
            write_wait: Duration::from_secs(10),
            send_queue_capacity: DEFAULT_SEND_QUEUE_CAPACITY,
            max_frame_bytes: 64 * 1024,
        }
    }
}

/// Run an upgraded socket until either side ends.
pub async fn serve(socket: WebSocket, state: Arc<AppState>, identity: Identity) {
    let settings = state.connection;
    let session = Session::new(ConnectionIdFactory::generate(), identity);
    let connection_id = session.connection_id;

    let (sender, queue) = mpsc::channel(settings.send_queue_capacity);
    if let Err(e) = state.hub.register(session.registration(sender)).await {
        tracing::warn!(%connection_id, error = %e, "Refusing connection");
        return;
    }
    tracing::info!(%connection_id, %identity, "Connection opened");

    let (sink, stream) = socket.split();
    let (stopped_tx, mut writer_stopped) = oneshot::channel::<()>();
    let writer = tokio::spawn(async move {
        let exit = write_pump::run(sink, queue, settings.ping_interval, settings.write_wait).await;
        let _ = stopped_tx.send(());
        exit
    });

    // the reader is never dropped mid-frame, so a dispatch already under way
    // (store write, fan-out) finishes even when the writer has gone
    let exit = read_pump::run(
        stream,
        &session,
        &state.router,
        settings.pong_wait,
        &mut writer_stopped,
    )
    .await;
    tracing::debug!(%connection_id, ?exit, "Reader stopped");

    state.hub.unregister(connection_id).await;

    match writer.await {
        Ok(exit) => tracing::debug!(%connection_id, ?exit, "Writer stopped"),
        Err(e) => tracing::warn!(%connection_id, error = %e, "Writer task failed"),
    }
    tracing::info!(%connection_id, %identity, "Connection closed");
}
