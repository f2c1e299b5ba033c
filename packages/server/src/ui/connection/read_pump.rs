//! Reader side of a connection.

use std::{fmt::Display, future::Future, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};

use crate::usecase::{MessageRouter, RouterError, Session};

/// Why the reader stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadExit {
    /// The client sent a close frame
    ClientClosed,
    /// The socket stream ended without a close frame
    StreamEnded,
    /// Nothing arrived within the liveness deadline
    Timeout,
    /// The writer side of the connection stopped first
    WriterStopped,
    Error(String),
}

/// Receive frames until the socket ends or goes quiet for `pong_wait`.
///
/// Every inbound frame (pongs included) refreshes the deadline. Text frames
/// go to the router; router failures never end the loop.
///
/// `writer_stopped` is only checked between frames, so a frame being
/// dispatched always runs to completion.
pub async fn run<S, E, W>(
    mut stream: S,
    session: &Session,
    router: &MessageRouter,
    pong_wait: Duration,
    writer_stopped: &mut W,
) -> ReadExit
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
    W: Future + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;

            _ = &mut *writer_stopped => return ReadExit::WriterStopped,
            next = tokio::time::timeout(pong_wait, stream.next()) => match next {
                Ok(next) => next,
                Err(_) => return ReadExit::Timeout,
            },
        };

        let message = match next {
            Some(Ok(message)) => message,
            Some(Err(e)) => return ReadExit::Error(e.to_string()),
            None => return ReadExit::StreamEnded,
        };

        match message {
            Message::Text(text) => router.handle_text(session, text.as_str()).await,
            Message::Binary(_) => router.reject(session, RouterError::BinaryFrame).await,
            // pings are answered by the websocket layer
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => return ReadExit::ClientClosed,
        }
    }
}
