//! Structured logging configuration.
//!
//! Thin wrapper over `tracing-subscriber` so embedders get consistent
//! output from one call. Library code only emits `tracing` events and
//! never installs a subscriber on its own.

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber described by `config`.
///
/// # Errors
/// Returns a `ConfigError` if the filter directive is invalid or a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ProtocolError::ConfigError(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .try_init()
        .map_err(|e| ProtocolError::ConfigError(format!("Failed to install subscriber: {e}")))
}
