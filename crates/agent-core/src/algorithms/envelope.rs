//! # Envelope Assembly
//!
//! Hashes a fully transformed body and attaches the sender's signature.
//! The signature covers the 32 request id bytes, never the raw body.

use crate::domain::{request_id_of, AgentError, Envelope, RequestContent};
use shared_crypto::Identity;
use shared_types::RequestId;

/// Build the signed envelope for `content`.
///
/// Keyless identities produce an envelope without `sender_pubkey` and
/// `sender_sig`. Returns the request id alongside so callers hash once.
///
/// # Errors
///
/// `AgentError::Signing` if the identity refuses to sign. Nothing has been
/// sent at that point.
pub fn build_envelope(
    content: RequestContent,
    identity: &dyn Identity,
) -> Result<(Envelope, RequestId), AgentError> {
    let request_id = request_id_of(&content);

    let envelope = match identity.public_key() {
        Some(public_key) => {
            let signature = identity.sign(request_id.as_bytes())?;
            Envelope {
                content,
                sender_pubkey: Some(public_key),
                sender_sig: Some(signature.into_bytes()),
            }
        }
        None => Envelope {
            content,
            sender_pubkey: None,
            sender_sig: None,
        },
    };

    Ok((envelope, request_id))
}
