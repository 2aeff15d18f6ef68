//! # Identity Capability
//!
//! An identity names the sender of a request and signs its request id.
//! Concrete variants are chosen by the caller at construction:
//!
//! | Variant | Public key | Signs |
//! |---------|-----------|-------|
//! | `AnonymousIdentity` | none | never |
//! | `Secp256k1Identity` | DER, 88 bytes | SHA-256 prehash, ECDSA |
//! | `Ed25519Identity` | DER, 44 bytes | raw challenge, EdDSA |

use crate::CryptoError;
use shared_types::Principal;

/// A raw signature produced by an identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Signing capability of a request sender.
///
/// Implementations must be safe to share across concurrent calls: signing
/// takes `&self` and has no side effects.
pub trait Identity: Send + Sync {
    /// Principal placed in the `sender` field of call requests.
    fn sender(&self) -> Principal;

    /// DER-encoded public key, or `None` for the anonymous identity.
    fn public_key(&self) -> Option<Vec<u8>>;

    /// Sign a challenge with this identity's private key.
    fn sign(&self, challenge: &[u8]) -> Result<Signature, CryptoError>;
}

/// The keyless anonymous caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

impl Identity for AnonymousIdentity {
    fn sender(&self) -> Principal {
        Principal::anonymous()
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        None
    }

    fn sign(&self, _challenge: &[u8]) -> Result<Signature, CryptoError> {
        Err(CryptoError::AnonymousSigner)
    }
}
