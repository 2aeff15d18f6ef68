//! # ECDSA Identity (secp256k1)
//!
//! secp256k1 key pairs that sign the SHA-256 digest of a challenge.
//!
//! ## Key Encoding
//!
//! The 65-byte uncompressed SEC1 point is DER-encoded by prepending a fixed
//! 23-byte `SubjectPublicKeyInfo` header (ecPublicKey + secp256k1 OIDs).
//! Decoding checks the total length and the exact header.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalized signatures
//! - Secret scalar lives in `SigningKey`, which zeroizes on drop

use crate::identity::{Identity, Signature};
use crate::persist::{self, KeyPairHex};
use crate::CryptoError;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use shared_types::Principal;
use zeroize::Zeroizing;

/// Length of an uncompressed secp256k1 public key.
pub const SECP256K1_RAW_KEY_LEN: usize = 65;

/// DER header that turns a raw uncompressed key into `SubjectPublicKeyInfo`.
pub const SECP256K1_DER_PREFIX: [u8; 23] = [
    0x30, 0x56, // SEQUENCE
    0x30, 0x10, // SEQUENCE
    0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // OID ecPublicKey
    0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, // OID secp256k1
    0x03, 0x42, // BIT STRING
    0x00, // no padding
];

const SECRET_KEY_LEN: usize = 32;

// =============================================================================
// PUBLIC KEY
// =============================================================================

/// Uncompressed secp256k1 public key (65 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; SECP256K1_RAW_KEY_LEN]);

impl Secp256k1PublicKey {
    /// Create from raw uncompressed bytes.
    pub fn from_raw(raw: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SECP256K1_RAW_KEY_LEN] = raw.try_into().map_err(|_| {
            CryptoError::MalformedKey(format!(
                "secp256k1 public key must be {} bytes long (is {})",
                SECP256K1_RAW_KEY_LEN,
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Create from a DER-encoded key.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        Self::from_raw(&der_decode(der)?)
    }

    /// Get raw uncompressed bytes.
    pub fn as_bytes(&self) -> &[u8; SECP256K1_RAW_KEY_LEN] {
        &self.0
    }

    /// DER encoding.
    pub fn to_der(&self) -> Vec<u8> {
        let mut der = Vec::with_capacity(SECP256K1_DER_PREFIX.len() + SECP256K1_RAW_KEY_LEN);
        der.extend_from_slice(&SECP256K1_DER_PREFIX);
        der.extend_from_slice(&self.0);
        der
    }

    /// Verify a signature produced by `Secp256k1Identity::sign`.
    pub fn verify(&self, challenge: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::MalformedKey(
                "not a point on secp256k1".to_string(),
            ))?;

        let sig = EcdsaSignature::from_slice(signature.as_bytes())
            .map_err(|_| CryptoError::InvalidSignature)?;

        let digest = Sha256::digest(challenge);
        verifying_key
            .verify_prehash(&digest, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Prepend the DER header to a raw 65-byte key.
pub fn der_encode(raw: &[u8]) -> Result<Vec<u8>, CryptoError> {
    Ok(Secp256k1PublicKey::from_raw(raw)?.to_der())
}

/// Strip and check the DER header, returning the raw 65-byte key.
pub fn der_decode(der: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let expected = SECP256K1_DER_PREFIX.len() + SECP256K1_RAW_KEY_LEN;
    if der.len() != expected {
        return Err(CryptoError::MalformedKey(format!(
            "secp256k1 DER-encoded public key must be {} bytes long (is {})",
            expected,
            der.len()
        )));
    }

    let (prefix, raw) = der.split_at(SECP256K1_DER_PREFIX.len());
    if prefix != SECP256K1_DER_PREFIX {
        return Err(CryptoError::MalformedKey(
            "secp256k1 DER-encoded public key has an unexpected prefix".to_string(),
        ));
    }

    Ok(raw.to_vec())
}

// =============================================================================
// IDENTITY
// =============================================================================

/// secp256k1 ECDSA signing identity.
pub struct Secp256k1Identity {
    signing_key: SigningKey,
    public_key: Secp256k1PublicKey,
}

impl Secp256k1Identity {
    /// Generate a fresh identity from the operating system RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rngs::OsRng)
    }

    /// Generate a fresh identity, redrawing scalars until one is valid.
    ///
    /// A scalar is valid when it is non-zero and below the group order.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut candidate = Zeroizing::new([0u8; SECRET_KEY_LEN]);
            rng.fill_bytes(&mut candidate[..]);
            if let Ok(signing_key) = SigningKey::from_bytes((&*candidate).into()) {
                return Self::from_signing_key(signing_key);
            }
        }
    }

    /// Create from a 32-byte secret scalar.
    pub fn from_secret_key(secret: &[u8]) -> Result<Self, CryptoError> {
        let bytes: Zeroizing<[u8; SECRET_KEY_LEN]> = Zeroizing::new(
            secret
                .try_into()
                .map_err(|_| CryptoError::InvalidPrivateKey)?,
        );
        let signing_key =
            SigningKey::from_bytes((&*bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().as_affine().to_encoded_point(false);
        let mut raw = [0u8; SECP256K1_RAW_KEY_LEN];
        raw.copy_from_slice(point.as_bytes());
        Self {
            signing_key,
            public_key: Secp256k1PublicKey(raw),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        self.public_key
    }

    /// Secret scalar bytes, wiped when the returned buffer is dropped.
    pub fn secret_key(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// `(public key DER hex, private key hex)`.
    pub fn serialize(&self) -> KeyPairHex {
        KeyPairHex {
            public_key_der: hex::encode(self.public_key.to_der()),
            private_key: Zeroizing::new(hex::encode(&self.secret_key()[..])),
        }
    }

    /// Rebuild from a hex pair, checking that the stored public key matches.
    pub fn deserialize(pair: &KeyPairHex) -> Result<Self, CryptoError> {
        let der = persist::decode_hex(&pair.public_key_der)?;
        let stored = Secp256k1PublicKey::from_der(&der)?;

        let secret = Zeroizing::new(persist::decode_hex(&pair.private_key)?);
        let identity = Self::from_secret_key(&secret)?;

        if identity.public_key != stored {
            return Err(CryptoError::MalformedKey(
                "public key does not belong to the private key".to_string(),
            ));
        }
        Ok(identity)
    }

    /// JSON `["<der hex>", "<private hex>"]`.
    pub fn to_json(&self) -> String {
        self.serialize().to_json()
    }

    /// Parse the JSON pair form.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        Self::deserialize(&KeyPairHex::from_json(json)?)
    }
}

impl std::fmt::Debug for Secp256k1Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1Identity")
            .field("public_key", &hex::encode(self.public_key.as_bytes()))
            .finish_non_exhaustive()
    }
}

impl Identity for Secp256k1Identity {
    fn sender(&self) -> Principal {
        Principal::self_authenticating(&self.public_key.to_der())
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        Some(self.public_key.to_der())
    }

    fn sign(&self, challenge: &[u8]) -> Result<Signature, CryptoError> {
        let digest = Sha256::digest(challenge);
        let sig: EcdsaSignature = self
            .signing_key
            .sign_prehash(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(Signature::from_bytes(sig.to_bytes().to_vec()))
    }
}
