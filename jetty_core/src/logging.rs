//! Logging utilities for Jetty-wide output to stdout.
//!

// Re-exports for convenience
pub use tracing::metadata::LevelFilter;
pub use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{util::SubscriberInitExt, Layer};

/// Set up basic logging.
///
/// `RUST_LOG` filters which targets are emitted; `level` caps what reaches
/// stdout and defaults to INFO.
pub fn setup(level: Option<LevelFilter>) {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "jetty_jde=debug,jetty_core=debug".into());
    let mut logging_layers = vec![tracing_subscriber::EnvFilter::new(env).boxed()];

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(level.unwrap_or(LevelFilter::INFO))
        .boxed();
    logging_layers.push(layer);

    // try_init so repeated setup (e.g. across tests) doesn't panic
    if tracing_subscriber::registry()
        .with(logging_layers)
        .try_init()
        .is_err()
    {
        return;
    }

    debug!("logging set up");
}
