//! # Value Objects
//!
//! Small immutable values stamped onto request bodies.

use serde::{Serialize, Serializer};
use std::fmt;

/// Default distance between "now" and a call's ingress expiry.
pub const DEFAULT_INGRESS_EXPIRY_MS: u64 = 300_000;

/// Length of a call nonce in bytes.
pub const NONCE_LEN: usize = 8;

/// Absolute ingress deadline, milliseconds since the Unix epoch.
///
/// Computed once per logical call and reused by every status query of
/// that call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Expiry(u64);

impl Expiry {
    /// Wrap a millisecond timestamp.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// `now + horizon`, saturating.
    pub fn after(now_ms: u64, horizon_ms: u64) -> Self {
        Self(now_ms.saturating_add(horizon_ms))
    }

    /// Milliseconds since the epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// 8-byte value that keeps otherwise identical calls from sharing an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Big-endian encoding of a counter; handy for deterministic sources.
    pub fn from_counter(counter: u64) -> Self {
        Self(counter.to_be_bytes())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl Serialize for Nonce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}
