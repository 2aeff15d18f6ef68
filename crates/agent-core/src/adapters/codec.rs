//! # Codec Adapters
//!
//! - `CborCodec`: envelopes and status responses as self-described CBOR
//! - `CandidCodec`: method arguments and replies as Candid

use crate::domain::{AgentError, CallStatus, Envelope, StatusResponse};
use crate::ports::{ArgumentCodec, EnvelopeCodec};
use candid::utils::{ArgumentDecoder, ArgumentEncoder};

/// Media type of every request body.
pub const CBOR_CONTENT_TYPE: &str = "application/cbor";

/// CBOR self-describe tag 55799, major type 6.
pub const SELF_DESCRIBE_TAG: [u8; 3] = [0xd9, 0xd9, 0xf7];

/// `serde_cbor` envelope codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl EnvelopeCodec for CborCodec {
    fn content_type(&self) -> &'static str {
        CBOR_CONTENT_TYPE
    }

    fn encode_envelope(&self, envelope: &Envelope) -> Result<Vec<u8>, AgentError> {
        let body = serde_cbor::to_vec(envelope)
            .map_err(|e| AgentError::Codec(format!("envelope encode: {e}")))?;

        let mut bytes = Vec::with_capacity(SELF_DESCRIBE_TAG.len() + body.len());
        bytes.extend_from_slice(&SELF_DESCRIBE_TAG);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn decode_status(&self, body: &[u8]) -> Result<CallStatus, AgentError> {
        let payload = body.strip_prefix(&SELF_DESCRIBE_TAG[..]).unwrap_or(body);
        let response: StatusResponse = serde_cbor::from_slice(payload)
            .map_err(|e| AgentError::Codec(format!("status decode: {e}")))?;
        CallStatus::try_from(response)
    }
}

/// Candid argument codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidCodec;

impl ArgumentCodec for CandidCodec {
    fn encode<A: ArgumentEncoder>(&self, args: A) -> Result<Vec<u8>, AgentError> {
        candid::encode_args(args).map_err(|e| AgentError::Codec(format!("candid encode: {e}")))
    }

    fn decode<R>(&self, bytes: &[u8]) -> Result<R, AgentError>
    where
        R: for<'a> ArgumentDecoder<'a>,
    {
        candid::decode_args(bytes).map_err(|e| AgentError::Codec(format!("candid decode: {e}")))
    }
}
