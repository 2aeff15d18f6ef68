//! # Canister Agent Test Suite
//!
//! Cross-crate tests that drive the identity, agent and actor layers
//! together against a scripted replica.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── call_flow.rs      # Actor -> Agent -> transport and back
//! │   └── identity_files.rs # key files through signing and principals
//! └── benches/              # request id, signing and envelope encoding
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p agent-tests
//! cargo test -p agent-tests integration::call_flow
//! cargo bench -p agent-tests
//! ```

pub mod integration;
