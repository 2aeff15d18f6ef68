//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! - `ReqwestTransport` - HTTP over `reqwest`
//! - `SystemTimeSource` - wall clock
//! - `RandomNonceSource` - mutex-guarded `StdRng`
//! - `CborCodec` / `CandidCodec` - wire and argument encoding
//! - `TomlConfigProvider` - config file loading

pub mod codec;
pub mod config;
pub mod http;
pub mod nonce;
pub mod time;

pub use codec::{CandidCodec, CborCodec, CBOR_CONTENT_TYPE, SELF_DESCRIBE_TAG};
pub use config::{AgentConfig, TomlConfigProvider, AGENT_URL_ENV, DEFAULT_URL};
pub use http::ReqwestTransport;
pub use nonce::RandomNonceSource;
pub use time::SystemTimeSource;
