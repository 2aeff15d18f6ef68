//! # Request Transforms
//!
//! Ordered mutators applied to a request body before it is hashed and
//! signed.
//!
//! | Transform | Applies to | Effect |
//! |-----------|-----------|--------|
//! | `ExpiryTransform` | all bodies | stamps `now + horizon` if no expiry is set |
//! | `NonceTransform` | `Call` only | sets a fresh nonce |

use crate::domain::{AgentError, Expiry, RequestContent};
use crate::ports::{NonceSource, TimeSource};
use std::sync::Arc;

/// A single request mutator.
pub trait Transform: Send + Sync {
    /// Mutate the body in place.
    fn apply(&self, content: &mut RequestContent) -> Result<(), AgentError>;
}

/// Stamps the ingress expiry once per logical call.
///
/// Status queries arrive with their call's expiry already set and keep it.
pub struct ExpiryTransform {
    clock: Arc<dyn TimeSource>,
    horizon_ms: u64,
}

impl ExpiryTransform {
    /// Create with a clock and a horizon.
    pub fn new(clock: Arc<dyn TimeSource>, horizon_ms: u64) -> Self {
        Self { clock, horizon_ms }
    }
}

impl Transform for ExpiryTransform {
    fn apply(&self, content: &mut RequestContent) -> Result<(), AgentError> {
        if content.ingress_expiry().is_none() {
            content.set_ingress_expiry(Expiry::after(self.clock.now_ms(), self.horizon_ms));
        }
        Ok(())
    }
}

/// Sets a fresh nonce on call bodies.
pub struct NonceTransform {
    source: Arc<dyn NonceSource>,
}

impl NonceTransform {
    /// Create with a nonce source.
    pub fn new(source: Arc<dyn NonceSource>) -> Self {
        Self { source }
    }
}

impl Transform for NonceTransform {
    fn apply(&self, content: &mut RequestContent) -> Result<(), AgentError> {
        if content.is_call() {
            content.set_nonce(self.source.next_nonce());
        }
        Ok(())
    }
}

/// Transforms executed in registration order.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformPipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expiry stamping followed by nonce injection.
    pub fn standard(
        clock: Arc<dyn TimeSource>,
        nonce_source: Arc<dyn NonceSource>,
        horizon_ms: u64,
    ) -> Self {
        let mut pipeline = Self::new();
        pipeline.push(ExpiryTransform::new(clock, horizon_ms));
        pipeline.push(NonceTransform::new(nonce_source));
        pipeline
    }

    /// Register a transform after the existing ones.
    pub fn push<T: Transform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// No transforms registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run every transform over the body.
    pub fn apply(&self, content: &mut RequestContent) -> Result<(), AgentError> {
        for transform in &self.transforms {
            transform.apply(content)?;
        }
        Ok(())
    }
}
