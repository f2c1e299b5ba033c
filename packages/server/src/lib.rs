//! Real-time chat fan-out server.
//!
//! Layers, inside out: `domain` (models and collaborator traits),
//! `usecase` (the message router), `infrastructure` (the Hub, DTOs, store
//! and identity implementations) and `ui` (axum handlers and the per-socket
//! pumps).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use config::ServerConfig;
pub use ui::{ServerError, run};
