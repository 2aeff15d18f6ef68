//! # Inbound Ports
//!
//! The API the agent offers to callers (actors, the CLI).

use crate::domain::{AgentError, CallStatus, SubmittedCall};
use async_trait::async_trait;
use shared_types::Principal;

/// Call agent API - inbound port.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Sign and submit an update call. Succeeds only on `202 Accepted`.
    async fn call(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<SubmittedCall, AgentError>;

    /// Query the status of a submitted call once. `attempt` is zero-based and
    /// selects the status endpoint.
    async fn request_status(
        &self,
        call: &SubmittedCall,
        attempt: u32,
    ) -> Result<CallStatus, AgentError>;

    /// Poll until the call is replied or rejected, or the budget runs out.
    async fn poll_until_terminal(&self, call: &SubmittedCall) -> Result<Vec<u8>, AgentError>;

    /// `call` followed by `poll_until_terminal`.
    async fn call_and_wait(
        &self,
        canister_id: &Principal,
        method: &str,
        arg: Vec<u8>,
    ) -> Result<Vec<u8>, AgentError> {
        let submitted = self.call(canister_id, method, arg).await?;
        self.poll_until_terminal(&submitted).await
    }
}
