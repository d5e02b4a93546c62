//! Telemetry configuration from environment variables.

use std::env;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on structured log lines.
    pub service_name: String,

    /// Log filter directive, `EnvFilter` syntax.
    pub log_filter: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "imperium-backend".to_string(),
            log_filter: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Read the configuration from the environment.
    ///
    /// - `IMPERIUM_LOG` or `RUST_LOG`: filter directive (default `info`)
    /// - `IMPERIUM_LOG_JSON`: `1`/`true` switches to JSON lines
    pub fn from_env() -> Self {
        Self {
            service_name: "imperium-backend".to_string(),
            log_filter: env::var("IMPERIUM_LOG")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("IMPERIUM_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
