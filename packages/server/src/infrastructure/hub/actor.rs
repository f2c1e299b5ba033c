//! The Hub loop.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{
    Control, Delivery, Envelope, HubHandle, HubStats, JoinedChats, OutboundFrame,
    REGISTRY_INBOX_CAPACITY, Registration,
};
use crate::domain::{ConnectionId, Identity};

/// A live connection as the Hub sees it
struct ConnectionEntry {
    identity: Identity,
    joined: JoinedChats,
    sender: mpsc::Sender<OutboundFrame>,
}

/// Owner of the live connection set.
///
/// Only [`Hub::run`] touches `connections`, so the map needs no lock.
pub struct Hub {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    register_rx: mpsc::Receiver<Registration>,
    unregister_rx: mpsc::Receiver<ConnectionId>,
    broadcast_rx: mpsc::Receiver<Envelope>,
    control_rx: mpsc::Receiver<Control>,
}

impl Hub {
    /// Create a Hub and the handle that feeds it.
    ///
    /// Nothing is delivered until the returned Hub is driven with
    /// [`Hub::run`].
    pub fn new(broadcast_capacity: usize) -> (Self, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(REGISTRY_INBOX_CAPACITY);
        let (unregister_tx, unregister_rx) = mpsc::channel(REGISTRY_INBOX_CAPACITY);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(broadcast_capacity);
        let (control_tx, control_rx) = mpsc::channel(REGISTRY_INBOX_CAPACITY);

        let hub = Self {
            connections: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            control_rx,
        };
        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            control_tx,
        };
        (hub, handle)
    }

    /// Spawn the loop on the current runtime.
    pub fn spawn(broadcast_capacity: usize) -> (HubHandle, tokio::task::JoinHandle<()>) {
        let (hub, handle) = Self::new(broadcast_capacity);
        (handle, tokio::spawn(hub.run()))
    }

    /// Run until shut down or until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("Hub started");

        loop {
            // Registry changes go first: a connection's registration is always
            // queued before any frame addressed to it. Control goes last so a
            // stats reply reflects every frame submitted before it.
            tokio::select! {
                biased;

                Some(registration) = self.register_rx.recv() => {
                    self.register(registration);
                }
                Some(id) = self.unregister_rx.recv() => {
                    self.unregister(id);
                }
                Some(envelope) = self.broadcast_rx.recv() => {
                    self.deliver(envelope).await;
                }
                Some(control) = self.control_rx.recv() => match control {
                    Control::Stats(reply) => {
                        let _ = reply.send(self.stats());
                    }
                    Control::Shutdown(done) => {
                        self.drain_and_close().await;
                        let _ = done.send(());
                        break;
                    }
                },
                else => break,
            }
        }

        tracing::info!("Hub stopped");
    }

    fn register(&mut self, registration: Registration) {
        if self.connections.contains_key(&registration.id) {
            tracing::debug!(connection_id = %registration.id, "Connection already registered");
            return;
        }

        self.connections.insert(
            registration.id,
            ConnectionEntry {
                identity: registration.identity,
                joined: registration.joined,
                sender: registration.sender,
            },
        );
        tracing::info!(
            connection_id = %registration.id,
            identity = %registration.identity,
            total = self.connections.len(),
            "Connection registered"
        );
    }

    fn unregister(&mut self, id: ConnectionId) {
        // dropping the entry drops the queue's only sender
        if let Some(entry) = self.connections.remove(&id) {
            tracing::info!(
                connection_id = %id,
                identity = %entry.identity,
                total = self.connections.len(),
                "Connection unregistered"
            );
        }
    }

    async fn deliver(&mut self, envelope: Envelope) {
        match envelope.delivery {
            Delivery::Chat { chat_id, exclude } => {
                let mut targets = Vec::new();
                for (id, entry) in &self.connections {
                    if exclude.is_some() && entry.identity.user_id() == exclude {
                        continue;
                    }
                    if entry.joined.contains(chat_id).await {
                        targets.push(*id);
                    }
                }

                let mut delivered = 0usize;
                for id in &targets {
                    if self.enqueue(*id, &envelope.frame) {
                        delivered += 1;
                    }
                }
                tracing::debug!(
                    frame_type = ?envelope.frame.r#type,
                    %chat_id,
                    targets = targets.len(),
                    delivered,
                    "Broadcast delivered"
                );
            }
            Delivery::Direct(id) => {
                if !self.enqueue(id, &envelope.frame) {
                    tracing::debug!(
                        connection_id = %id,
                        frame_type = ?envelope.frame.r#type,
                        "Direct frame dropped"
                    );
                }
            }
        }
    }

    /// Non-blocking enqueue. A full or closed queue evicts the connection.
    fn enqueue(&mut self, id: ConnectionId, frame: &OutboundFrame) -> bool {
        let Some(entry) = self.connections.get(&id) else {
            return false;
        };

        match entry.sender.try_send(OutboundFrame::clone(frame)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    connection_id = %id,
                    identity = %entry.identity,
                    "Outbound queue full, disconnecting slow consumer"
                );
                self.unregister(id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.unregister(id);
                false
            }
        }
    }

    fn stats(&self) -> HubStats {
        let users: HashSet<_> = self
            .connections
            .values()
            .filter_map(|entry| entry.identity.user_id())
            .collect();
        HubStats {
            connections: self.connections.len(),
            users: users.len(),
        }
    }

    async fn drain_and_close(&mut self) {
        tracing::info!(
            connections = self.connections.len(),
            "Hub shutting down"
        );

        // refuse new registrations; ones already queued are dropped with their queue
        self.register_rx.close();
        while let Ok(late) = self.register_rx.try_recv() {
            tracing::debug!(connection_id = %late.id, "Registration refused during shutdown");
        }

        self.broadcast_rx.close();
        while let Ok(envelope) = self.broadcast_rx.try_recv() {
            self.deliver(envelope).await;
        }

        self.connections.clear();
    }
}
