//! # Domain Entities
//!
//! Request bodies, the signed envelope, and call lifecycle states.
//!
//! Wire field names follow the replica's HTTP interface:
//!
//! | Body | `request_type` | Fields |
//! |------|----------------|--------|
//! | `Call` | `"call"` | `canister_id`, `method_name`, `arg`, `nonce?`, `sender`, `ingress_expiry` |
//! | `RequestStatus` | `"request_status"` | `request_id`, `ingress_expiry` |

use super::errors::AgentError;
use super::value_objects::{Expiry, Nonce};
use serde::{Deserialize, Serialize};
use shared_types::{Principal, RequestId};
use std::fmt;

// =============================================================================
// REQUEST CONTENT
// =============================================================================

/// Body of a request, before signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "request_type", rename_all = "snake_case")]
pub enum RequestContent {
    /// Invoke an update method.
    Call {
        /// Target canister
        canister_id: Principal,
        /// Method to invoke
        method_name: String,
        /// Encoded arguments
        #[serde(with = "serde_bytes")]
        arg: Vec<u8>,
        /// Set by the nonce transform
        #[serde(skip_serializing_if = "Option::is_none")]
        nonce: Option<Nonce>,
        /// Caller principal
        sender: Principal,
        /// Set by the expiry transform
        #[serde(skip_serializing_if = "Option::is_none")]
        ingress_expiry: Option<Expiry>,
    },
    /// Ask for the status of an earlier call.
    RequestStatus {
        /// Id of the call being queried
        request_id: RequestId,
        /// The originating call's expiry
        #[serde(skip_serializing_if = "Option::is_none")]
        ingress_expiry: Option<Expiry>,
    },
}

impl RequestContent {
    /// Build a call body with no nonce or expiry yet.
    pub fn call(
        canister_id: Principal,
        method_name: impl Into<String>,
        arg: Vec<u8>,
        sender: Principal,
    ) -> Self {
        Self::Call {
            canister_id,
            method_name: method_name.into(),
            arg,
            nonce: None,
            sender,
            ingress_expiry: None,
        }
    }

    /// Build a status query that reuses the originating call's expiry.
    pub fn request_status(request_id: RequestId, ingress_expiry: Expiry) -> Self {
        Self::RequestStatus {
            request_id,
            ingress_expiry: Some(ingress_expiry),
        }
    }

    /// Wire value of `request_type`.
    pub fn request_type(&self) -> &'static str {
        match self {
            Self::Call { .. } => "call",
            Self::RequestStatus { .. } => "request_status",
        }
    }

    /// Whether this is a call body.
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    /// Current ingress expiry, if stamped.
    pub fn ingress_expiry(&self) -> Option<Expiry> {
        match self {
            Self::Call { ingress_expiry, .. } | Self::RequestStatus { ingress_expiry, .. } => {
                *ingress_expiry
            }
        }
    }

    /// Stamp the ingress expiry.
    pub fn set_ingress_expiry(&mut self, expiry: Expiry) {
        match self {
            Self::Call { ingress_expiry, .. } | Self::RequestStatus { ingress_expiry, .. } => {
                *ingress_expiry = Some(expiry);
            }
        }
    }

    /// Current nonce. Always `None` for status queries.
    pub fn nonce(&self) -> Option<Nonce> {
        match self {
            Self::Call { nonce, .. } => *nonce,
            Self::RequestStatus { .. } => None,
        }
    }

    /// Set the nonce of a call body. Returns `false` for status queries,
    /// which never carry one.
    pub fn set_nonce(&mut self, value: Nonce) -> bool {
        match self {
            Self::Call { nonce, .. } => {
                *nonce = Some(value);
                true
            }
            Self::RequestStatus { .. } => false,
        }
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Signed wrapper around a request body.
///
/// Anonymous senders leave both optional fields out of the encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// The request body.
    pub content: RequestContent,
    /// DER-encoded public key of the sender.
    #[serde(skip_serializing_if = "Option::is_none", with = "serde_bytes")]
    pub sender_pubkey: Option<Vec<u8>>,
    /// Signature over the request id.
    #[serde(skip_serializing_if = "Option::is_none", with = "serde_bytes")]
    pub sender_sig: Option<Vec<u8>>,
}

impl Envelope {
    /// Whether the envelope carries a signature.
    pub fn is_signed(&self) -> bool {
        self.sender_sig.is_some()
    }
}

/// Ticket for a submitted call, carried through polling.
///
/// Holds everything a status query needs, so polls reuse the call's expiry
/// without any shared registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedCall {
    /// Id of the call request.
    pub request_id: RequestId,
    /// Canister the call targeted.
    pub canister_id: Principal,
    /// Expiry stamped on the call.
    pub expiry: Expiry,
}

// =============================================================================
// CALL STATUS
// =============================================================================

/// Lifecycle state reported by a status query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallStatus {
    /// The replica has the call but has not started it.
    Received,
    /// The call is executing.
    Processing,
    /// Terminal: the reply's argument bytes.
    Replied(Vec<u8>),
    /// Terminal: the canister rejected the call.
    Rejected {
        /// Reject code
        code: u64,
        /// Reject message
        message: String,
    },
    /// The replica does not (or no longer) know the request.
    Unknown,
}

impl CallStatus {
    /// `Replied` or `Rejected`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Replied(_) | Self::Rejected { .. })
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::Processing => write!(f, "processing"),
            Self::Replied(arg) => write!(f, "replied ({} bytes)", arg.len()),
            Self::Rejected { code, .. } => write!(f, "rejected (code {code})"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Raw status query response as decoded from the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StatusResponse {
    /// `received | processing | replied | rejected | unknown | done`
    pub status: String,
    /// Present when replied.
    #[serde(default)]
    pub reply: Option<ReplyBody>,
    /// Present when rejected.
    #[serde(default)]
    pub reject_code: Option<u64>,
    /// Present when rejected.
    #[serde(default)]
    pub reject_message: Option<String>,
}

/// `reply` map of a replied status.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReplyBody {
    /// Encoded return value.
    #[serde(with = "serde_bytes")]
    pub arg: Vec<u8>,
}

impl TryFrom<StatusResponse> for CallStatus {
    type Error = AgentError;

    fn try_from(response: StatusResponse) -> Result<Self, Self::Error> {
        match response.status.as_str() {
            "received" => Ok(Self::Received),
            "processing" => Ok(Self::Processing),
            "replied" => response
                .reply
                .map(|reply| Self::Replied(reply.arg))
                .ok_or_else(|| AgentError::Codec("replied status without reply".to_string())),
            "rejected" => Ok(Self::Rejected {
                code: response.reject_code.ok_or_else(|| {
                    AgentError::Codec("rejected status without reject_code".to_string())
                })?,
                message: response.reject_message.unwrap_or_default(),
            }),
            // Reply already pruned; indistinguishable from never-seen for the caller.
            "unknown" | "done" => Ok(Self::Unknown),
            other => Err(AgentError::Codec(format!("unrecognized status: {other}"))),
        }
    }
}
