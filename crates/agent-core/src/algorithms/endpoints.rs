//! # Endpoint Selection
//!
//! URL layout of the replica's HTTP interface, and the strategy that picks
//! a status endpoint per poll attempt.
//!
//! Replicas have been observed answering the first status query on the
//! versioned `read_state` endpoint and later ones on the legacy `read`
//! endpoint. Neither is treated as authoritative: the choice is a
//! `StatusEndpoint` value.

use serde::Deserialize;
use shared_types::Principal;
use std::fmt;
use std::str::FromStr;

/// Status endpoint strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEndpoint {
    /// `/api/v2/canister/{id}/read_state` on every attempt.
    ReadState,
    /// `/api/v1/read` on every attempt.
    LegacyRead,
    /// `read_state` on the first attempt, legacy `read` afterwards.
    #[default]
    ReadStateThenLegacy,
}

impl StatusEndpoint {
    /// Whether attempts use different endpoints.
    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::ReadStateThenLegacy)
    }

    /// Status URL for the zero-based `attempt`.
    pub fn url(&self, base: &str, canister_id: &Principal, attempt: u32) -> String {
        let legacy = match self {
            Self::ReadState => false,
            Self::LegacyRead => true,
            Self::ReadStateThenLegacy => attempt > 0,
        };
        if legacy {
            legacy_read_url(base)
        } else {
            read_state_url(base, canister_id)
        }
    }
}

impl fmt::Display for StatusEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadState => "read_state",
            Self::LegacyRead => "legacy_read",
            Self::ReadStateThenLegacy => "read_state_then_legacy",
        };
        f.write_str(name)
    }
}

impl FromStr for StatusEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read_state" => Ok(Self::ReadState),
            "legacy_read" => Ok(Self::LegacyRead),
            "read_state_then_legacy" => Ok(Self::ReadStateThenLegacy),
            other => Err(format!("unknown status endpoint: {other}")),
        }
    }
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

/// `{base}/api/v2/canister/{id}/call`
pub fn call_url(base: &str, canister_id: &Principal) -> String {
    format!("{}/api/v2/canister/{}/call", trim_base(base), canister_id)
}

/// `{base}/api/v2/canister/{id}/read_state`
pub fn read_state_url(base: &str, canister_id: &Principal) -> String {
    format!("{}/api/v2/canister/{}/read_state", trim_base(base), canister_id)
}

/// `{base}/api/v1/read`
pub fn legacy_read_url(base: &str) -> String {
    format!("{}/api/v1/read", trim_base(base))
}
