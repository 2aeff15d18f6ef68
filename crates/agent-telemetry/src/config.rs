//! Telemetry configuration from environment variables.

use std::env;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "AGENT_LOG";

/// Environment variable selecting JSON output.
pub const JSON_LOGS_ENV: &str = "AGENT_JSON_LOGS";

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or per-target)
    pub log_level: String,

    /// Whether to emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Whether to use ANSI colors in human-readable output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "canister-agent".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AGENT_LOG` or `RUST_LOG`: Log filter (default: info)
    /// - `AGENT_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `NO_COLOR`: Disable ANSI colors when set
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: defaults.service_name,

            log_level: env::var(LOG_ENV)
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: env::var(JSON_LOGS_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.json_logs),

            ansi: env::var("NO_COLOR").is_err(),
        }
    }

    /// Override the filter, e.g. from a `--verbose` flag.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
