//! # Ed25519 Identity
//!
//! Twisted Edwards curve signatures with deterministic nonces. The challenge
//! is signed as-is; EdDSA hashes internally.
//!
//! ## Key Encoding
//!
//! The 32-byte public key is DER-encoded with a fixed 12-byte
//! `SubjectPublicKeyInfo` header (id-Ed25519 OID).

use crate::identity::{Identity, Signature};
use crate::persist::{self, KeyPairHex};
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::{CryptoRng, RngCore};
use shared_types::Principal;
use zeroize::Zeroizing;

/// Length of a raw Ed25519 public key.
pub const ED25519_RAW_KEY_LEN: usize = 32;

/// DER header for an Ed25519 `SubjectPublicKeyInfo`.
pub const ED25519_DER_PREFIX: [u8; 12] = [
    0x30, 0x2a, // SEQUENCE
    0x30, 0x05, // SEQUENCE
    0x06, 0x03, 0x2b, 0x65, 0x70, // OID id-Ed25519
    0x03, 0x21, // BIT STRING
    0x00, // no padding
];

const SEED_LEN: usize = 32;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey([u8; ED25519_RAW_KEY_LEN]);

impl Ed25519PublicKey {
    /// Create from raw bytes, checking that they decode to a curve point.
    pub fn from_raw(raw: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; ED25519_RAW_KEY_LEN] = raw.try_into().map_err(|_| {
            CryptoError::MalformedKey(format!(
                "ed25519 public key must be {} bytes long (is {})",
                ED25519_RAW_KEY_LEN,
                raw.len()
            ))
        })?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| CryptoError::MalformedKey("not an ed25519 point".to_string()))?;
        Ok(Self(bytes))
    }

    /// Create from a DER-encoded key.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let expected = ED25519_DER_PREFIX.len() + ED25519_RAW_KEY_LEN;
        if der.len() != expected {
            return Err(CryptoError::MalformedKey(format!(
                "ed25519 DER-encoded public key must be {} bytes long (is {})",
                expected,
                der.len()
            )));
        }
        let (prefix, raw) = der.split_at(ED25519_DER_PREFIX.len());
        if prefix != ED25519_DER_PREFIX {
            return Err(CryptoError::MalformedKey(
                "ed25519 DER-encoded public key has an unexpected prefix".to_string(),
            ));
        }
        Self::from_raw(raw)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; ED25519_RAW_KEY_LEN] {
        &self.0
    }

    /// DER encoding.
    pub fn to_der(&self) -> Vec<u8> {
        let mut der = Vec::with_capacity(ED25519_DER_PREFIX.len() + ED25519_RAW_KEY_LEN);
        der.extend_from_slice(&ED25519_DER_PREFIX);
        der.extend_from_slice(&self.0);
        der
    }

    /// Verify a signature.
    pub fn verify(&self, challenge: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| CryptoError::MalformedKey("not an ed25519 point".to_string()))?;

        let sig = ed25519_dalek::Signature::from_slice(signature.as_bytes())
            .map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify(challenge, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signing identity.
pub struct Ed25519Identity {
    signing_key: SigningKey,
}

impl Ed25519Identity {
    /// Generate random identity.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rngs::OsRng)
    }

    /// Generate from a caller-supplied RNG. Every 32-byte seed is valid.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        rng.fill_bytes(&mut seed[..]);
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_secret_key(secret: &[u8]) -> Result<Self, CryptoError> {
        let seed: Zeroizing<[u8; SEED_LEN]> = Zeroizing::new(
            secret
                .try_into()
                .map_err(|_| CryptoError::InvalidPrivateKey)?,
        );
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Secret seed, wiped when the returned buffer is dropped.
    pub fn secret_key(&self) -> Zeroizing<[u8; SEED_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// `(public key DER hex, seed hex)`.
    pub fn serialize(&self) -> KeyPairHex {
        KeyPairHex {
            public_key_der: hex::encode(self.public_key().to_der()),
            private_key: Zeroizing::new(hex::encode(&self.secret_key()[..])),
        }
    }

    /// Rebuild from a hex pair, checking that the stored public key matches.
    pub fn deserialize(pair: &KeyPairHex) -> Result<Self, CryptoError> {
        let der = persist::decode_hex(&pair.public_key_der)?;
        let stored = Ed25519PublicKey::from_der(&der)?;

        let secret = Zeroizing::new(persist::decode_hex(&pair.private_key)?);
        let identity = Self::from_secret_key(&secret)?;

        if identity.public_key() != stored {
            return Err(CryptoError::MalformedKey(
                "public key does not belong to the private key".to_string(),
            ));
        }
        Ok(identity)
    }

    /// JSON `["<der hex>", "<seed hex>"]`.
    pub fn to_json(&self) -> String {
        self.serialize().to_json()
    }

    /// Parse the JSON pair form.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        Self::deserialize(&KeyPairHex::from_json(json)?)
    }
}

impl std::fmt::Debug for Ed25519Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Identity")
            .field("public_key", &hex::encode(self.public_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

impl Identity for Ed25519Identity {
    fn sender(&self) -> Principal {
        Principal::self_authenticating(&self.public_key().to_der())
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        Some(Ed25519Identity::public_key(self).to_der())
    }

    fn sign(&self, challenge: &[u8]) -> Result<Signature, CryptoError> {
        let sig = self.signing_key.sign(challenge);
        Ok(Signature::from_bytes(sig.to_bytes().to_vec()))
    }
}
