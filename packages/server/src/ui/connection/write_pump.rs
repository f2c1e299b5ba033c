//! Writer side of a connection.

use std::{fmt::Display, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt};
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, MissedTickBehavior},
};

use crate::infrastructure::hub::OutboundFrame;

/// Why the writer stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteExit {
    /// The Hub closed the outbound queue; a close frame was attempted
    QueueClosed,
    /// A write did not finish within the write deadline
    Timeout,
    Error(String),
}

/// Drain the outbound queue into the socket until the queue closes or a
/// write fails.
///
/// Frames already waiting behind the one just dequeued go out in the same
/// flush. With `ping_interval` set, an idle ping goes out on every tick.
pub async fn run<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<OutboundFrame>,
    ping_interval: Option<Duration>,
    write_wait: Duration,
) -> WriteExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ping = ping_interval.map(|period| {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            frame = queue.recv() => {
                let Some(frame) = frame else {
                    let _ = tokio::time::timeout(write_wait, sink.send(Message::Close(None))).await;
                    return WriteExit::QueueClosed;
                };
                if let Err(exit) = write_batch(&mut sink, &mut queue, frame, write_wait).await {
                    return exit;
                }
            }
            _ = next_tick(&mut ping) => {
                let sent = tokio::time::timeout(write_wait, sink.send(Message::Ping(Default::default()))).await;
                if let Err(exit) = into_exit(sent) {
                    return exit;
                }
            }
        }
    }
}

async fn write_batch<S>(
    sink: &mut S,
    queue: &mut mpsc::Receiver<OutboundFrame>,
    first: OutboundFrame,
    write_wait: Duration,
) -> Result<(), WriteExit>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let write = async {
        if let Some(message) = encode(&first) {
            sink.feed(message).await?;
        }
        while let Ok(frame) = queue.try_recv() {
            if let Some(message) = encode(&frame) {
                sink.feed(message).await?;
            }
        }
        sink.flush().await
    };
    into_exit(tokio::time::timeout(write_wait, write).await)
}

fn into_exit<E: Display>(
    result: Result<Result<(), E>, tokio::time::error::Elapsed>,
) -> Result<(), WriteExit> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WriteExit::Error(e.to_string())),
        Err(_) => Err(WriteExit::Timeout),
    }
}

fn encode(frame: &OutboundFrame) -> Option<Message> {
    match serde_json::to_string(frame.as_ref()) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode outbound frame");
            None
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
