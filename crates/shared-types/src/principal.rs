//! # Principal
//!
//! Opaque identifier naming either a caller or a canister. The type is
//! `candid::Principal`, so principals decoded from Candid replies and the
//! ones placed in request bodies are the same value.
//!
//! ## Wire Form
//!
//! - Binary serializers (CBOR) see a byte string.
//! - Text form: `base32_lower(crc32_be(bytes) ++ bytes)`, dash-grouped by five.
//! - Self-authenticating: `sha224(der_public_key) ++ [0x02]`.

pub use candid::Principal;
