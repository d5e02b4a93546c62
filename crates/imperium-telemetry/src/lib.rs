//! # Telemetry
//!
//! Structured logging for the Imperium backend, built on `tracing`.
//! Call [`init`] once at process start; later calls are no-ops so tests
//! that each set up a subscriber do not fight over the global default.

pub mod config;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

pub use config::TelemetryConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter {0:?}")]
    InvalidFilter(String),
}

/// Install the global tracing subscriber from the given configuration.
///
/// Idempotent: if a subscriber is already installed, this silently keeps it.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|_| TelemetryError::InvalidFilter(config.log_filter.clone()))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logs {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.try_init()
    };
    // A pre-existing subscriber (tests, embedding) wins.
    let _ = result;

    tracing::debug!(
        service = %config.service_name,
        filter = %config.log_filter,
        json = config.json_logs,
        "telemetry initialized"
    );
    Ok(())
}
