//! Tracing subscriber setup shared by every binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the binary's own target and the
/// server library log at `default_level`, and HTTP request traces at `info`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let default_directives = format!(
        "{bin}={level},corpchat_server={level},corpchat_shared={level},tower_http=info",
        bin = bin_name.replace('-', "_"),
        level = default_level,
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // try_init: integration tests may install a subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
