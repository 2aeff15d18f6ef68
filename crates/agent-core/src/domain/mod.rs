//! # Domain Layer
//!
//! Request bodies, envelopes, call states and the request id hash.

pub mod entities;
pub mod errors;
pub mod request_id;
pub mod value_objects;

pub use entities::{
    CallStatus, Envelope, ReplyBody, RequestContent, StatusResponse, SubmittedCall,
};
pub use errors::{AgentError, ConfigError};
pub use request_id::{leb128, request_id_of, request_id_of_fields, FieldValue};
pub use value_objects::{Expiry, Nonce, DEFAULT_INGRESS_EXPIRY_MS, NONCE_LEN};
