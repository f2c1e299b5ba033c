//! Real-time chat fan-out server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin corpchat-server -- --seed-file fixtures/seed.json
//! ```

use clap::Parser;
use corpchat_server::{ServerConfig, config::DEFAULT_JWT_SECRET};
use corpchat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    if config.jwt_secret == DEFAULT_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    // Run the server
    if let Err(e) = corpchat_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
