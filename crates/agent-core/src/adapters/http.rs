//! # HTTP Transport Adapter
//!
//! `reqwest`-backed implementation of `HttpTransport`.

use crate::domain::AgentError;
use crate::ports::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport over `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default timeouts.
    pub fn new() -> Result<Self, AgentError> {
        Self::with_timeouts(DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a transport with explicit timeouts.
    pub fn with_timeouts(request: Duration, connect: Duration) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(request)
            .connect_timeout(connect)
            .build()
            .map_err(AgentError::Http)?;

        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, AgentError> {
        debug!(url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(url, status, bytes = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}
