//! Server configuration from command-line flags and environment variables.

use std::{net::IpAddr, path::PathBuf, time::Duration};

use clap::{Parser, builder::BoolishValueParser};
use thiserror::Error;

use crate::ui::connection::ConnectionSettings;

/// Used when `JWT_SECRET` is not set. Only fit for local development.
pub const DEFAULT_JWT_SECRET: &str = "corpchat-dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--{0} must be greater than zero")]
    Zero(&'static str),

    #[error("ping interval ({ping}s) must be shorter than pong wait ({pong}s)")]
    PingNotBeforePong { ping: u64, pong: u64 },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "corpchat-server")]
#[command(about = "Real-time chat fan-out server")]
#[command(version)]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 8084)]
    pub port: u16,

    /// HS256 secret shared with the auth service
    #[arg(long, env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Serve the WebSocket endpoint; when off it answers 503
    #[arg(
        long,
        env = "WEBSOCKET_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub websocket_enabled: bool,

    /// Idle ping period in seconds; 0 disables pings
    #[arg(long, env = "WEBSOCKET_PING_INTERVAL", default_value_t = 30)]
    pub ping_interval_secs: u64,

    /// Read liveness deadline in seconds
    #[arg(long, env = "WEBSOCKET_PONG_WAIT", default_value_t = 60)]
    pub pong_wait_secs: u64,

    /// Deadline for each socket write in seconds
    #[arg(long, env = "WEBSOCKET_WRITE_WAIT", default_value_t = 10)]
    pub write_wait_secs: u64,

    /// Per-connection outbound queue capacity
    #[arg(long, env = "WEBSOCKET_SEND_QUEUE", default_value_t = 256)]
    pub send_queue_capacity: usize,

    /// Hub broadcast inbox capacity
    #[arg(long, env = "WEBSOCKET_BROADCAST_QUEUE", default_value_t = 256)]
    pub broadcast_capacity: usize,

    #[arg(long, env = "WEBSOCKET_MAX_FRAME_BYTES", default_value_t = 64 * 1024)]
    pub max_frame_bytes: usize,

    /// JSON file with users, chats and memberships for the in-memory store
    #[arg(long, env = "CHAT_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("send-queue-capacity", self.send_queue_capacity),
            ("broadcast-capacity", self.broadcast_capacity),
            ("max-frame-bytes", self.max_frame_bytes),
        ];
        if let Some((flag, _)) = positive.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(flag));
        }
        if self.pong_wait_secs == 0 {
            return Err(ConfigError::Zero("pong-wait-secs"));
        }
        if self.write_wait_secs == 0 {
            return Err(ConfigError::Zero("write-wait-secs"));
        }
        if self.ping_interval_secs != 0 && self.ping_interval_secs >= self.pong_wait_secs {
            return Err(ConfigError::PingNotBeforePong {
                ping: self.ping_interval_secs,
                pong: self.pong_wait_secs,
            });
        }
        Ok(())
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            ping_interval: (self.ping_interval_secs > 0)
                .then(|| Duration::from_secs(self.ping_interval_secs)),
            pong_wait: Duration::from_secs(self.pong_wait_secs),
            write_wait: Duration::from_secs(self.write_wait_secs),
            send_queue_capacity: self.send_queue_capacity,
            max_frame_bytes: self.max_frame_bytes,
        }
    }
}
