//! # Shared Crypto - Request Signing Identities
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `identity` | - | `Identity` trait, anonymous sender |
//! | `ecdsa` | secp256k1 | Default signing identity |
//! | `signatures` | Ed25519 | Alternate signing identity |
//! | `persist` | - | `["<der hex>", "<private hex>"]` identity files |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, signs the SHA-256 prehash
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - Secret material is held in zeroizing buffers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod identity;
pub mod persist;
pub mod signatures;

// Re-exports
pub use ecdsa::{Secp256k1Identity, Secp256k1PublicKey};
pub use errors::CryptoError;
pub use identity::{AnonymousIdentity, Identity, Signature};
pub use persist::{identity_from_json, load_identity, save_identity, KeyCurve, KeyPairHex};
pub use signatures::{Ed25519Identity, Ed25519PublicKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
