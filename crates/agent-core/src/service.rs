//! Agent Service - call submission and status polling
//!
//! ```text
//! Submitted ─► {Received | Processing | Unknown}* ─► Replied  ─► reply bytes
//!                                                 ├► Rejected ─► CallRejected
//!                                                 └► budget   ─► PollTimeout
//! ```
//!
//! Each logical call is a `SubmittedCall` value owned by the task that made
//! it. Only the identity and the nonce source are shared between calls.

use crate::adapters::{
    AgentConfig, CborCodec, RandomNonceSource, ReqwestTransport, SystemTimeSource,
};
use crate::algorithms::{build_envelope, call_url, PollPolicy, StatusEndpoint, TransformPipeline};
use crate::domain::{AgentError, CallStatus, ConfigError, Expiry, RequestContent, SubmittedCall};
use crate::ports::{
    AgentApi, EnvelopeCodec, HttpResponse, HttpTransport, NonceSource, TimeSource,
};
use async_trait::async_trait;
use shared_crypto::Identity;
use shared_types::{Principal, RequestId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Call agent.
///
/// Generic over the transport so tests can script replica responses.
pub struct Agent<T>
where
    T: HttpTransport,
{
    url: String,
    transport: Arc<T>,
    identity: Arc<dyn Identity>,
    codec: Arc<dyn EnvelopeCodec>,
    pipeline: TransformPipeline,
    polling: PollPolicy,
    status_endpoint: StatusEndpoint,
    /// Set once the mixed-endpoint notice has been logged.
    endpoint_flagged: AtomicBool,
}

impl<T> Agent<T>
where
    T: HttpTransport,
{
    /// Create an agent with explicit clock and nonce source.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the configuration does not validate.
    pub fn new(
        config: AgentConfig,
        transport: Arc<T>,
        identity: Arc<dyn Identity>,
        clock: Arc<dyn TimeSource>,
        nonce_source: Arc<dyn NonceSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pipeline = TransformPipeline::standard(clock, nonce_source, config.ingress_expiry_ms);
        Ok(Self {
            url: config.url,
            transport,
            identity,
            codec: Arc::new(CborCodec),
            pipeline,
            polling: config.polling,
            status_endpoint: config.status_endpoint,
            endpoint_flagged: AtomicBool::new(false),
        })
    }

    /// Replace the transform pipeline.
    pub fn with_pipeline(mut self, pipeline: TransformPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Replace the envelope codec.
    pub fn with_envelope_codec(mut self, codec: Arc<dyn EnvelopeCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// The signing identity.
    pub fn identity(&self) -> &Arc<dyn Identity> {
        &self.identity
    }

    /// Replica base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Polling schedule.
    pub fn polling(&self) -> &PollPolicy {
        &self.polling
    }

    /// Run the pipeline, sign, encode and POST.
    async fn submit(
        &self,
        mut content: RequestContent,
        url: &str,
    ) -> Result<(RequestId, Expiry, HttpResponse), AgentError> {
        self.pipeline.apply(&mut content)?;
        let expiry = content.ingress_expiry().ok_or_else(|| {
            AgentError::Codec("request body left the pipeline without ingress_expiry".to_string())
        })?;

        let (envelope, request_id) = build_envelope(content, self.identity.as_ref())?;
        let body = self.codec.encode_envelope(&envelope)?;

        debug!(
            request_id = %request_id,
            request_type = envelope.content.request_type(),
            url,
            "sending request"
        );
        let response = self
            .transport
            .post(url, self.codec.content_type(), body)
            .await?;

        Ok((request_id, expiry, response))
    }

    fn flag_mixed_endpoints(&self) {
        if self.status_endpoint.is_mixed() && !self.endpoint_flagged.swap(true, Ordering::Relaxed)
        {
            warn!(
                strategy = %self.status_endpoint,
                "status polling moved from read_state to the legacy read endpoint"
            );
        }
    }
}

impl Agent<ReqwestTransport> {
    /// Agent over HTTP with the system clock and random nonces.
    pub fn from_config(
        config: AgentConfig,
        identity: Arc<dyn Identity>,
    ) -> Result<Self, AgentError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let agent = Self::new(
            config,
            transport,
            identity,
            Arc::new(SystemTimeSource::new()),
            Arc::new(RandomNonceSource::new()),
        )?;
        Ok(agent)
    }
}

#[async_trait]
impl<T> AgentApi for Agent<T>
where
    T: HttpTransport,
{
    async fn call(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<SubmittedCall, AgentError> {
        let content =
            RequestContent::call(*canister_id, method, arg, self.identity.sender());
        let url = call_url(&self.url, canister_id);

        let (request_id, expiry, response) = self.submit(content, &url).await?;
        if response.status != 202 {
            return Err(AgentError::Transport {
                status: response.status,
                body: response.body_text(),
            });
        }
        let submitted = SubmittedCall {
            request_id,
            canister_id: *canister_id,
            expiry,
        };

        info!(
            request_id = %submitted.request_id,
            canister = %canister_id,
            method,
            "call submitted"
        );
        Ok(submitted)
    }

    async fn request_status(
        &self,
        call: &SubmittedCall,
        attempt: u32,
    ) -> Result<CallStatus, AgentError> {
        if attempt > 0 {
            self.flag_mixed_endpoints();
        }
        let content = RequestContent::request_status(call.request_id, call.expiry);
        let url = self.status_endpoint.url(&self.url, &call.canister_id, attempt);

        let (_, _, response) = self.submit(content, &url).await?;
        if !response.is_success() {
            return Err(AgentError::Transport {
                status: response.status,
                body: response.body_text(),
            });
        }

        self.codec.decode_status(&response.body)
    }

    async fn poll_until_terminal(&self, call: &SubmittedCall) -> Result<Vec<u8>, AgentError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_status = None;

        while self.polling.allows(attempts, started.elapsed()) {
            let status = self.request_status(call, attempts).await?;
            attempts += 1;

            match status {
                CallStatus::Replied(arg) => {
                    info!(request_id = %call.request_id, attempts, "call replied");
                    return Ok(arg);
                }
                CallStatus::Rejected { code, message } => {
                    warn!(request_id = %call.request_id, code, %message, "call rejected");
                    return Err(AgentError::CallRejected { code, message });
                }
                pending => {
                    debug!(
                        request_id = %call.request_id,
                        status = %pending,
                        attempts,
                        "call pending"
                    );
                    last_status = Some(pending);
                }
            }

            if self.polling.allows(attempts, started.elapsed()) {
                tokio::time::sleep(self.polling.delay_after(attempts - 1)).await;
            }
        }

        warn!(request_id = %call.request_id, attempts, "poll budget exhausted");
        Err(AgentError::PollTimeout {
            attempts,
            last_status,
        })
    }
}
