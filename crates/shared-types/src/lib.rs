//! # Shared Types Crate
//!
//! Identifiers that cross crate boundaries: the `Principal` naming a caller
//! or a canister, and the `RequestId` correlating a call with its status
//! queries.
//!
//! ## Design Principles
//!
//! - **Opaque bytes**: both identifiers are byte strings on the wire and are
//!   never reinterpreted by this crate.
//! - **Immutable**: once constructed, neither value can be mutated.

pub mod errors;
pub mod principal;
pub mod request_id;

pub use errors::*;
pub use principal::Principal;
pub use request_id::RequestId;
