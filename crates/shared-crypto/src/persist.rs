//! # Identity Persistence
//!
//! Identities are stored as a two-element JSON array of hex strings:
//! `["<DER public key>", "<raw private key>"]`. The retired object format is
//! recognized and rejected explicitly so it is never misread as a key pair.

use crate::ecdsa::{Secp256k1Identity, SECP256K1_DER_PREFIX};
use crate::identity::Identity;
use crate::signatures::{Ed25519Identity, ED25519_DER_PREFIX};
use crate::CryptoError;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Permission bits for identity files on unix.
#[cfg(unix)]
const PRIVATE_FILE_MODE: u32 = 0o600;

/// Hex-encoded key pair as persisted.
#[derive(Clone)]
pub struct KeyPairHex {
    /// DER-encoded public key, hex.
    pub public_key_der: String,
    /// Raw private key, hex. Wiped on drop.
    pub private_key: Zeroizing<String>,
}

impl KeyPairHex {
    /// Parse the JSON pair form.
    ///
    /// # Errors
    ///
    /// - `DeprecatedFormat` for a JSON object
    /// - `InvalidFormat` for anything else that is not `[string, string, ..]`
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        let parsed: Value = serde_json::from_str(json)
            .map_err(|e| CryptoError::InvalidFormat(format!("not JSON: {e}")))?;

        match parsed {
            Value::Array(items) => match (items.first(), items.get(1)) {
                (Some(Value::String(public)), Some(Value::String(private))) => Ok(Self {
                    public_key_der: public.clone(),
                    private_key: Zeroizing::new(private.clone()),
                }),
                _ => Err(CryptoError::InvalidFormat(
                    "JSON must have at least 2 string items".to_string(),
                )),
            },
            Value::Object(_) => Err(CryptoError::DeprecatedFormat),
            other => Err(CryptoError::InvalidFormat(format!(
                "invalid JSON type for identity: {other}"
            ))),
        }
    }

    /// Render as `["<der hex>", "<private hex>"]`.
    pub fn to_json(&self) -> String {
        Value::Array(vec![
            Value::String(self.public_key_der.clone()),
            Value::String(self.private_key.to_string()),
        ])
        .to_string()
    }
}

impl std::fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("public_key_der", &self.public_key_der)
            .field("private_key", &"***")
            .finish()
    }
}

pub(crate) fn decode_hex(text: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(text).map_err(|e| CryptoError::InvalidFormat(format!("invalid hex: {e}")))
}

/// Key algorithm of a persisted identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCurve {
    /// ECDSA over secp256k1.
    Secp256k1,
    /// EdDSA over Curve25519.
    Ed25519,
}

impl KeyCurve {
    /// Identify the curve from a DER public key's header.
    pub fn detect(der: &[u8]) -> Result<Self, CryptoError> {
        if der.starts_with(&SECP256K1_DER_PREFIX) {
            Ok(Self::Secp256k1)
        } else if der.starts_with(&ED25519_DER_PREFIX) {
            Ok(Self::Ed25519)
        } else {
            Err(CryptoError::MalformedKey(
                "unrecognized public key algorithm".to_string(),
            ))
        }
    }
}

/// Rebuild an identity of whichever curve the pair was stored with.
pub fn identity_from_json(json: &str) -> Result<Box<dyn Identity>, CryptoError> {
    let pair = KeyPairHex::from_json(json)?;
    let der = decode_hex(&pair.public_key_der)?;

    match KeyCurve::detect(&der)? {
        KeyCurve::Secp256k1 => Ok(Box::new(Secp256k1Identity::deserialize(&pair)?)),
        KeyCurve::Ed25519 => Ok(Box::new(Ed25519Identity::deserialize(&pair)?)),
    }
}

/// Load an identity file.
pub fn load_identity<P: AsRef<Path>>(path: P) -> Result<Box<dyn Identity>, CryptoError> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| CryptoError::Io {
        path: path.as_ref().display().to_string(),
        error: e.to_string(),
    })?;
    identity_from_json(content.trim())
}

/// Write a key pair to an identity file.
///
/// On unix the file is owner-only (`0600`), including when an existing file
/// is overwritten.
pub fn save_identity<P: AsRef<Path>>(path: P, pair: &KeyPairHex) -> Result<(), CryptoError> {
    let path = path.as_ref();
    let io_error = |e: io::Error| CryptoError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    };

    let json = Zeroizing::new(pair.to_json());
    let mut file = open_private(path).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(PRIVATE_FILE_MODE)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(PRIVATE_FILE_MODE))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_format_is_deprecated() {
        let json = r#"{"publicKey": "abcd", "secretKey": "ef01"}"#;
        assert_eq!(
            KeyPairHex::from_json(json).err(),
            Some(CryptoError::DeprecatedFormat)
        );
    }

    #[test]
    fn test_short_array_is_invalid() {
        let result = KeyPairHex::from_json(r#"["abcd"]"#);
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));
    }

    #[test]
    fn test_non_string_items_are_invalid() {
        let result = KeyPairHex::from_json("[1, 2]");
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));
    }

    #[test]
    fn test_scalar_json_is_invalid() {
        let result = KeyPairHex::from_json(r#""just a string""#);
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let result = KeyPairHex::from_json("not json at all");
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));
    }

    #[test]
    fn test_pair_json_shape() {
        let pair = KeyPairHex {
            public_key_der: "aa".to_string(),
            private_key: Zeroizing::new("bb".to_string()),
        };
        assert_eq!(pair.to_json(), r#"["aa","bb"]"#);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let pair = KeyPairHex {
            public_key_der: "aa".to_string(),
            private_key: Zeroizing::new("deadbeef".to_string()),
        };
        assert!(!format!("{pair:?}").contains("deadbeef"));
    }

    #[test]
    fn test_detects_curves() {
        let secp = Secp256k1Identity::generate();
        let ed = Ed25519Identity::generate();
        assert_eq!(
            KeyCurve::detect(&secp.public_key().to_der()),
            Ok(KeyCurve::Secp256k1)
        );
        assert_eq!(
            KeyCurve::detect(&ed.public_key().to_der()),
            Ok(KeyCurve::Ed25519)
        );
        assert!(KeyCurve::detect(&[0x30, 0x00]).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        let original = Secp256k1Identity::generate();

        save_identity(&path, &original.serialize()).unwrap();
        let loaded = load_identity(&path).unwrap();

        assert_eq!(loaded.sender(), original.sender());
        assert_eq!(loaded.public_key(), Some(original.public_key().to_der()));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        save_identity(&path, &Secp256k1Identity::generate().serialize()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_tightens_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        fs::write(&path, "stale").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let original = Ed25519Identity::generate();
        save_identity(&path, &original.serialize()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(load_identity(&path).unwrap().sender(), original.sender());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_identity("/nonexistent/identity.json");
        assert!(matches!(result, Err(CryptoError::Io { .. })));
    }
}
