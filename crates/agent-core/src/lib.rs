//! # Agent Core
//!
//! Signed, content-addressed canister calls with asynchronous status
//! polling.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Request Pipeline
//!
//! ```text
//! Actor ─► RequestContent ─► TransformPipeline ─► request_id_of ─► Identity::sign
//!                                                                      │
//!   reply bytes ◄─ poll_until_terminal ◄─ Agent::call ◄─ EnvelopeCodec ◄┘
//! ```
//!
//! ## Guarantees
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | Deterministic request ids | sorted per-field SHA-256 digests |
//! | One expiry per call | `SubmittedCall` carries it into every poll |
//! | Nonces only on calls | `NonceTransform` skips status queries |
//! | No partial envelopes | signing happens before any I/O |
//! | Bounded polling | `PollPolicy` attempt cap and deadline |
//!
//! ## Module Structure
//!
//! ```text
//! agent-core/
//! ├── domain/          # RequestContent, Envelope, CallStatus, request ids, errors
//! ├── algorithms/      # transforms, envelope assembly, endpoints, backoff
//! ├── ports/           # AgentApi, HttpTransport, TimeSource, NonceSource, codecs
//! ├── adapters/        # reqwest, system clock, StdRng nonces, CBOR, Candid, TOML
//! ├── service.rs       # Agent
//! └── actor.rs         # Actor, InterfaceDescription
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actor;
pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use actor::{Actor, InterfaceDescription, MethodKind};
pub use adapters::{
    AgentConfig, CandidCodec, CborCodec, RandomNonceSource, ReqwestTransport, SystemTimeSource,
    TomlConfigProvider,
};
pub use algorithms::{
    build_envelope, ExpiryTransform, NonceTransform, PollPolicy, StatusEndpoint, Transform,
    TransformPipeline,
};
pub use domain::{
    request_id_of, request_id_of_fields, AgentError, CallStatus, ConfigError, Envelope, Expiry,
    FieldValue, Nonce, RequestContent, SubmittedCall, DEFAULT_INGRESS_EXPIRY_MS,
};
pub use ports::{
    AgentApi, ArgumentCodec, EnvelopeCodec, HttpResponse, HttpTransport, NonceSource, TimeSource,
};
pub use service::Agent;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
