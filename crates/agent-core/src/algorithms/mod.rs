//! Algorithms for the call agent: transforms, envelope assembly, endpoint
//! selection and polling backoff.

pub mod endpoints;
pub mod envelope;
pub mod poll;
pub mod transforms;

pub use endpoints::{call_url, legacy_read_url, read_state_url, StatusEndpoint};
pub use envelope::build_envelope;
pub use poll::PollPolicy;
pub use transforms::{ExpiryTransform, NonceTransform, Transform, TransformPipeline};
