//! Test utilities for the call agent.
//!
//! Deterministic clocks, nonce sources and a scripted transport.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use agent_core::test_utils::FixedTimeSource;
//! use agent_core::ports::TimeSource;
//!
//! let clock = FixedTimeSource::new(1_000);
//! assert_eq!(clock.now_ms(), 1_000);
//! ```

use crate::adapters::SELF_DESCRIBE_TAG;
use crate::domain::{AgentError, Nonce};
use crate::ports::{HttpResponse, HttpTransport, NonceSource, TimeSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_cbor::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// Clocks
// =============================================================================

/// A time source that returns a fixed timestamp.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    millis: u64,
}

impl FixedTimeSource {
    /// Create a new fixed time source (milliseconds since epoch).
    pub fn new(millis: u64) -> Self {
        Self { millis }
    }
}

impl TimeSource for FixedTimeSource {
    fn now_ms(&self) -> u64 {
        self.millis
    }
}

/// A time source moved forward explicitly by the test.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    millis: AtomicU64,
}

impl ManualTimeSource {
    /// Start at `millis`.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Nonces
// =============================================================================

/// Yields `1, 2, 3, ...` as big-endian nonces and counts draws.
#[derive(Debug, Default)]
pub struct SequenceNonceSource {
    counter: AtomicU64,
}

impl SequenceNonceSource {
    /// Start before 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nonces drawn so far.
    pub fn draws(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl NonceSource for SequenceNonceSource {
    fn next_nonce(&self) -> Nonce {
        Nonce::from_counter(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

// =============================================================================
// Scripted transport
// =============================================================================

/// One POST seen by `ScriptedTransport`.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Target URL.
    pub url: String,
    /// Content-Type header.
    pub content_type: String,
    /// Raw body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Decode the envelope body into a CBOR map.
    pub fn envelope(&self) -> BTreeMap<Value, Value> {
        let payload = self
            .body
            .strip_prefix(&SELF_DESCRIBE_TAG[..])
            .unwrap_or(&self.body);
        match serde_cbor::from_slice(payload) {
            Ok(Value::Map(map)) => map,
            other => panic!("envelope is not a CBOR map: {other:?}"),
        }
    }

    /// Field of the envelope's `content` map.
    pub fn content_field(&self, name: &str) -> Option<Value> {
        match self.envelope().get(&text("content")) {
            Some(Value::Map(content)) => content.get(&text(name)).cloned(),
            _ => None,
        }
    }

    /// `content.request_type`.
    pub fn request_type(&self) -> Option<String> {
        match self.content_field("request_type") {
            Some(Value::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// `content.ingress_expiry`.
    pub fn ingress_expiry(&self) -> Option<u64> {
        match self.content_field("ingress_expiry") {
            Some(Value::Integer(value)) => u64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Whether the envelope carries `sender_sig`.
    pub fn is_signed(&self) -> bool {
        self.envelope().contains_key(&text("sender_sig"))
    }
}

/// Transport that answers from a script and records every request.
///
/// Responses are consumed in order; the last one repeats once the script
/// runs dry. An attached clock is advanced on every POST.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<HttpResponse>>,
    last: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    clock: Option<(Arc<ManualTimeSource>, u64)>,
}

impl ScriptedTransport {
    /// Transport answering with `responses` in order.
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Advance `clock` by `step_ms` on each POST.
    pub fn with_clock(mut self, clock: Arc<ManualTimeSource>, step_ms: u64) -> Self {
        self.clock = Some((clock, step_ms));
        self
    }

    /// All requests so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, AgentError> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        if let Some((clock, step)) = &self.clock {
            clock.advance(*step);
        }

        let next = self.script.lock().pop_front();
        let mut last = self.last.lock();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                Ok(response)
            }
            None => last.clone().ok_or_else(|| AgentError::Transport {
                status: 599,
                body: "script exhausted".to_string(),
            }),
        }
    }
}

// =============================================================================
// Canned responses
// =============================================================================

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn cbor_response(entries: Vec<(Value, Value)>) -> HttpResponse {
    let map: BTreeMap<Value, Value> = entries.into_iter().collect();
    let mut body = SELF_DESCRIBE_TAG.to_vec();
    body.extend(serde_cbor::to_vec(&Value::Map(map)).unwrap_or_default());
    HttpResponse { status: 200, body }
}

/// `202 Accepted`, empty body.
pub fn accepted() -> HttpResponse {
    HttpResponse {
        status: 202,
        body: Vec::new(),
    }
}

/// Non-terminal status such as `"processing"`.
pub fn status_response(status: &str) -> HttpResponse {
    cbor_response(vec![(text("status"), text(status))])
}

/// `replied` with the given reply argument bytes.
pub fn replied_response(arg: Vec<u8>) -> HttpResponse {
    let reply: BTreeMap<Value, Value> = [(text("arg"), Value::Bytes(arg))].into_iter().collect();
    cbor_response(vec![
        (text("status"), text("replied")),
        (text("reply"), Value::Map(reply)),
    ])
}

/// `rejected` with code and message.
pub fn rejected_response(code: u64, message: &str) -> HttpResponse {
    cbor_response(vec![
        (text("status"), text("rejected")),
        (text("reject_code"), Value::Integer(i128::from(code))),
        (text("reject_message"), text(message)),
    ])
}
