//! Ports for the call agent.

pub mod inbound;
pub mod outbound;

pub use inbound::AgentApi;
pub use outbound::{
    ArgumentCodec, EnvelopeCodec, HttpResponse, HttpTransport, NonceSource, TimeSource,
};
