//! WebSocket chat server implementation.

pub mod connection;
mod error;
pub mod handler;
mod runner;
mod signal;
pub mod state;

pub use error::ServerError;
pub use runner::{WEBSOCKET_PATH, build_app, run, serve};
