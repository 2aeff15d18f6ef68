//! # Agent Telemetry
//!
//! Structured logging for the canister agent via `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     init_tracing(&TelemetryConfig::from_env()).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AGENT_LOG` / `RUST_LOG` | `info` | Log filter directive |
//! | `AGENT_JSON_LOGS` | `false` | JSON lines instead of human-readable output |
//! | `NO_COLOR` | unset | Disable ANSI colors |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, JSON_LOGS_ENV, LOG_ENV};
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive does not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(String),
}
