//! # Actor
//!
//! Binds one canister's described interface to agent calls. Arguments and
//! replies go through an `ArgumentCodec`; the agent never sees typed values.

use crate::adapters::CandidCodec;
use crate::domain::AgentError;
use crate::ports::{AgentApi, ArgumentCodec};
use candid::utils::{ArgumentDecoder, ArgumentEncoder};
use shared_types::Principal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// How a method is invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MethodKind {
    /// Submitted as a call and polled for its reply.
    Update,
}

/// Method table of a canister interface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceDescription {
    methods: BTreeMap<String, MethodKind>,
}

impl InterfaceDescription {
    /// Empty interface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an update method.
    pub fn with_update(mut self, name: impl Into<String>) -> Self {
        self.methods.insert(name.into(), MethodKind::Update);
        self
    }

    /// Kind of `name`, if declared.
    pub fn kind(&self, name: &str) -> Option<MethodKind> {
        self.methods.get(name).copied()
    }

    /// Declared method names, sorted.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

/// Typed front end for one canister.
pub struct Actor<A, C = CandidCodec>
where
    A: AgentApi,
    C: ArgumentCodec,
{
    agent: Arc<A>,
    canister_id: Principal,
    interface: InterfaceDescription,
    codec: C,
}

impl<A> Actor<A, CandidCodec>
where
    A: AgentApi,
{
    /// Actor using Candid for arguments and replies.
    pub fn new(agent: Arc<A>, canister_id: Principal, interface: InterfaceDescription) -> Self {
        Self::with_codec(agent, canister_id, interface, CandidCodec)
    }
}

impl<A, C> Actor<A, C>
where
    A: AgentApi,
    C: ArgumentCodec,
{
    /// Actor with an explicit argument codec.
    pub fn with_codec(
        agent: Arc<A>,
        canister_id: Principal,
        interface: InterfaceDescription,
        codec: C,
    ) -> Self {
        Self {
            agent,
            canister_id,
            interface,
            codec,
        }
    }

    /// Target canister.
    pub fn canister_id(&self) -> &Principal {
        &self.canister_id
    }

    /// The interface this actor exposes.
    pub fn interface(&self) -> &InterfaceDescription {
        &self.interface
    }

    /// Invoke `method` and wait for its decoded reply.
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` if the interface does not declare `method`
    /// - `CallRejected` / `PollTimeout` from the agent
    /// - `Codec` if the arguments or the reply do not encode/decode
    pub async fn call<Args, R>(&self, method: &str, args: Args) -> Result<R, AgentError>
    where
        Args: ArgumentEncoder,
        R: for<'a> ArgumentDecoder<'a>,
    {
        match self.interface.kind(method) {
            Some(MethodKind::Update) => {}
            None => return Err(AgentError::MethodNotFound(method.to_string())),
        }

        let arg = self.codec.encode(args)?;
        debug!(canister = %self.canister_id, method, bytes = arg.len(), "actor call");

        let submitted = self.agent.call(&self.canister_id, method, arg).await?;
        let reply = self.agent.poll_until_terminal(&submitted).await?;
        self.codec.decode(&reply)
    }
}
