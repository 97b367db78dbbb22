//! Tracing/logging bootstrap for host applications embedding the engine.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::logging::LoggingConfig;

/// Initialize the global tracing subscriber from configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is a no-op: the second subscriber fails to install and the
/// error is discarded, since the host may already have its own.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init(),
        _ => fmt().with_env_filter(filter).try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {e}");
    }
}
