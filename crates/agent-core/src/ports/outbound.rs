//! # Outbound Ports
//!
//! Traits for external dependencies (transport, clock, nonces, codecs).

use crate::domain::{AgentError, CallStatus, Envelope, Nonce};
use async_trait::async_trait;
use candid::utils::{ArgumentDecoder, ArgumentEncoder};

/// Response of a single HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, for error reports.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport - outbound port.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with the given content type.
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, AgentError>;
}

/// Wall clock - outbound port.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Nonce generator - outbound port.
///
/// Implementations serialize draws so concurrent calls get distinct values.
pub trait NonceSource: Send + Sync {
    /// Draw the next nonce.
    fn next_nonce(&self) -> Nonce;
}

/// Canonical binary wire codec - outbound port.
pub trait EnvelopeCodec: Send + Sync {
    /// Media type sent with every request.
    fn content_type(&self) -> &'static str;

    /// Encode a signed envelope.
    fn encode_envelope(&self, envelope: &Envelope) -> Result<Vec<u8>, AgentError>;

    /// Decode a status query response.
    fn decode_status(&self, body: &[u8]) -> Result<CallStatus, AgentError>;
}

/// Interface-description argument codec - outbound port.
pub trait ArgumentCodec: Send + Sync {
    /// Encode a tuple of method arguments.
    fn encode<A: ArgumentEncoder>(&self, args: A) -> Result<Vec<u8>, AgentError>;

    /// Decode a tuple of return values.
    fn decode<R>(&self, bytes: &[u8]) -> Result<R, AgentError>
    where
        R: for<'a> ArgumentDecoder<'a>;
}
