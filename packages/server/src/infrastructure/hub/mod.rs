//! Connection registry and broadcast coordinator.
//!
//! The [`Hub`] is an actor: one task owns the map of live connections and
//! every change to it, and every fan-out, is a message into that task.
//! Everything else holds a cloneable [`HubHandle`].

mod actor;
mod joined;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ChatId, ConnectionId, Identity, UserId},
    infrastructure::dto::websocket::ServerFrame,
};

pub use actor::Hub;
pub use joined::JoinedChats;

/// Default capacity of the Hub's broadcast inbox
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Capacity of the register / unregister / control inboxes
const REGISTRY_INBOX_CAPACITY: usize = 64;

/// A frame on its way to one or more outbound queues.
///
/// Shared so one broadcast serializes once per recipient without cloning
/// the frame.
pub type OutboundFrame = Arc<ServerFrame>;

/// Everything the Hub needs to own a connection
#[derive(Debug)]
pub struct Registration {
    pub id: ConnectionId,
    pub identity: Identity,
    pub joined: JoinedChats,
    /// Sole sender of the connection's outbound queue. Dropping it closes
    /// the queue.
    pub sender: mpsc::Sender<OutboundFrame>,
}

/// Who a frame is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Every connection joined to `chat_id`, minus connections of `exclude`
    Chat {
        chat_id: ChatId,
        exclude: Option<UserId>,
    },
    /// A single connection (acks and error replies)
    Direct(ConnectionId),
}

#[derive(Debug)]
pub struct Envelope {
    pub delivery: Delivery,
    pub frame: OutboundFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HubStats {
    pub connections: usize,
    /// Distinct authenticated users; guests are not counted
    pub users: usize,
}

#[derive(Debug)]
enum Control {
    Stats(oneshot::Sender<HubStats>),
    Shutdown(oneshot::Sender<()>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("hub is not running")]
    Closed,
}

/// Cloneable entry point into the Hub loop
#[derive(Debug, Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<Registration>,
    unregister_tx: mpsc::Sender<ConnectionId>,
    broadcast_tx: mpsc::Sender<Envelope>,
    control_tx: mpsc::Sender<Control>,
}

impl HubHandle {
    /// Hand a connection over to the Hub. Registering an id twice is a no-op.
    ///
    /// # Errors
    ///
    /// `HubError::Closed` once the Hub has shut down; the registration (and
    /// so the outbound queue) is dropped.
    pub async fn register(&self, registration: Registration) -> Result<(), HubError> {
        self.register_tx
            .send(registration)
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Remove a connection and close its outbound queue. Safe to repeat.
    pub async fn unregister(&self, id: ConnectionId) {
        // a stopped Hub has already dropped every queue
        let _ = self.unregister_tx.send(id).await;
    }

    /// Fan `frame` out to every connection joined to `chat_id`.
    pub async fn broadcast(&self, chat_id: ChatId, frame: ServerFrame) -> Result<(), HubError> {
        self.submit(
            Delivery::Chat {
                chat_id,
                exclude: None,
            },
            frame,
        )
        .await
    }

    /// Like [`HubHandle::broadcast`], skipping every connection owned by
    /// `excluded`.
    pub async fn broadcast_excluding(
        &self,
        chat_id: ChatId,
        frame: ServerFrame,
        excluded: UserId,
    ) -> Result<(), HubError> {
        self.submit(
            Delivery::Chat {
                chat_id,
                exclude: Some(excluded),
            },
            frame,
        )
        .await
    }

    /// Queue a frame for one connection.
    pub async fn send_to(&self, id: ConnectionId, frame: ServerFrame) -> Result<(), HubError> {
        self.submit(Delivery::Direct(id), frame).await
    }

    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (tx, rx) = oneshot::channel();
        self.control_tx
            .send(Control::Stats(tx))
            .await
            .map_err(|_| HubError::Closed)?;
        rx.await.map_err(|_| HubError::Closed)
    }

    /// Stop accepting registrations, deliver what is already in the inbox,
    /// close every connection, and wait for the loop to exit.
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.control_tx.send(Control::Shutdown(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn submit(&self, delivery: Delivery, frame: ServerFrame) -> Result<(), HubError> {
        self.broadcast_tx
            .send(Envelope {
                delivery,
                frame: Arc::new(frame),
            })
            .await
            .map_err(|_| HubError::Closed)
    }
}
