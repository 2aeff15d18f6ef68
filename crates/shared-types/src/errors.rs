//! # Error Types
//!
//! Parsing errors for request ids.

use thiserror::Error;

/// Errors that can occur when building a `RequestId`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestIdError {
    /// Wrong number of bytes.
    #[error("Invalid request id length: expected 32, got {0}")]
    InvalidLength(usize),

    /// Hex form could not be decoded.
    #[error("Invalid request id hex: {0}")]
    InvalidHex(String),
}
