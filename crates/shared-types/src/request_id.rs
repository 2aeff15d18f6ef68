//! # Request Id
//!
//! 32-byte content hash of a request body. Computed by the agent crate; this
//! crate only owns the value type and its wire form.

use crate::errors::RequestIdError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a request id in bytes.
pub const REQUEST_ID_LEN: usize = 32;

/// Deterministic content hash of a request body.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId([u8; REQUEST_ID_LEN]);

impl RequestId {
    /// Wrap raw hash bytes.
    pub const fn new(bytes: [u8; REQUEST_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RequestIdError> {
        let array: [u8; REQUEST_ID_LEN] = bytes
            .try_into()
            .map_err(|_| RequestIdError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Parse a lowercase or uppercase hex string.
    pub fn from_hex(text: &str) -> Result<Self, RequestIdError> {
        let bytes = hex::decode(text).map_err(|e| RequestIdError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; REQUEST_ID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.to_hex())
    }
}

impl AsRef<[u8]> for RequestId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
        Self::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}
