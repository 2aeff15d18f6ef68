//! # Domain Errors
//!
//! Error types for the call agent.

use super::entities::CallStatus;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Agent error types.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The replica answered with an unexpected HTTP status.
    #[error("Transport error: HTTP {status}: {body}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },

    /// The HTTP exchange itself failed (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The canister rejected the call.
    #[error("Call rejected: code {code}: {message}")]
    CallRejected {
        /// Server-supplied reject code
        code: u64,
        /// Server-supplied reject message
        message: String,
    },

    /// Polling ran out of attempts or time without a terminal status.
    #[error("Poll timeout after {attempts} attempts (last status: {last_status:?})")]
    PollTimeout {
        /// Status queries issued
        attempts: u32,
        /// Last status observed, if any query succeeded
        last_status: Option<CallStatus>,
    },

    /// Envelope, response or argument encoding failed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// The identity could not sign; nothing was sent.
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// The actor's interface has no such method.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The agent was built from an invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the config file
        path: String,
        /// Underlying I/O message
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value failed validation.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
