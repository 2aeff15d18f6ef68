//! Crypto error types.

use thiserror::Error;

/// Identity and signing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Encoded public key has the wrong length or algorithm prefix.
    #[error("Malformed public key: {0}")]
    MalformedKey(String),

    /// Private key bytes are not a valid scalar/seed for the curve.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Persisted identity uses the retired object format.
    #[error("Deprecated identity format: expected a [public, private] hex pair")]
    DeprecatedFormat,

    /// Persisted identity is not in any recognized shape.
    #[error("Invalid identity format: {0}")]
    InvalidFormat(String),

    /// Signature bytes could not be parsed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// The signing backend refused to sign.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Anonymous identities carry no key.
    #[error("Anonymous identity cannot sign")]
    AnonymousSigner,

    /// Reading or writing an identity file failed.
    #[error("Identity file I/O failed for {path}: {error}")]
    Io {
        /// Path of the identity file.
        path: String,
        /// Underlying I/O message.
        error: String,
    },
}
