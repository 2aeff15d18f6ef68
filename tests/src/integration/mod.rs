//! Integration flows across `shared-crypto`, `agent-core` and the actor.

pub mod call_flow;
pub mod identity_files;
