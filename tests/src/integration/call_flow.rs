//! # Call Flow
//!
//! An update call end to end: the actor encodes arguments, the agent signs
//! and submits the call, polls the status endpoint, and the actor decodes
//! the reply. The replica is a `ScriptedTransport`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use agent_core::test_utils::{
        accepted, rejected_response, replied_response, status_response, ManualTimeSource,
        ScriptedTransport, SequenceNonceSource,
    };
    use agent_core::{
        Actor, Agent, AgentApi, AgentConfig, AgentError, CallStatus, InterfaceDescription,
        PollPolicy, StatusEndpoint,
    };
    use serde_cbor::Value;
    use shared_crypto::{
        AnonymousIdentity, Ed25519Identity, Ed25519PublicKey, Identity, Secp256k1Identity,
        Secp256k1PublicKey, Signature,
    };
    use shared_types::Principal;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const REPLICA: &str = "http://replica.test";

    fn canister() -> Principal {
        Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap()
    }

    fn greet_interface() -> InterfaceDescription {
        InterfaceDescription::new().with_update("greet")
    }

    fn candid_text(text: &str) -> Vec<u8> {
        candid::encode_one(text.to_string()).unwrap()
    }

    fn config(strategy: StatusEndpoint, max_attempts: u32) -> AgentConfig {
        AgentConfig {
            status_endpoint: strategy,
            polling: PollPolicy::fixed(Duration::from_millis(250), max_attempts),
            ..AgentConfig::with_url(REPLICA)
        }
    }

    fn agent_with(
        script: Vec<agent_core::HttpResponse>,
        identity: Arc<dyn Identity>,
        config: AgentConfig,
    ) -> (Arc<Agent<ScriptedTransport>>, Arc<ScriptedTransport>) {
        let clock = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let transport = Arc::new(ScriptedTransport::new(script).with_clock(clock.clone(), 250));
        let agent = Agent::new(
            config,
            transport.clone(),
            identity,
            clock,
            Arc::new(SequenceNonceSource::new()),
        )
        .unwrap();
        (Arc::new(agent), transport)
    }

    fn bytes(value: Option<Value>) -> Vec<u8> {
        match value {
            Some(Value::Bytes(bytes)) => bytes,
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    fn envelope_bytes(request: &agent_core::test_utils::RecordedRequest, key: &str) -> Vec<u8> {
        bytes(request.envelope().get(&Value::Text(key.to_string())).cloned())
    }

    // =============================================================================
    // ACTOR ROUND TRIP
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_actor_echo_roundtrip() {
        let input = "hello from the agent".to_string();
        let identity = Arc::new(Secp256k1Identity::generate());
        let (agent, transport) = agent_with(
            vec![
                accepted(),
                status_response("received"),
                status_response("processing"),
                replied_response(candid_text(&input)),
            ],
            identity.clone(),
            config(StatusEndpoint::ReadState, 10),
        );

        let actor = Actor::new(agent, canister(), greet_interface());
        let (reply,): (String,) = actor.call("greet", (input.clone(),)).await.unwrap();
        assert_eq!(reply, input);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(
            requests[0].url,
            "http://replica.test/api/v2/canister/ryjl3-tyaaa-aaaaa-aaaba-cai/call"
        );
        assert_eq!(requests[0].request_type().as_deref(), Some("call"));
        assert_eq!(bytes(requests[0].content_field("arg")), candid_text(&input));
        for status in &requests[1..] {
            assert!(status.url.ends_with("/read_state"));
            assert_eq!(status.request_type().as_deref(), Some("request_status"));
            assert!(status.is_signed());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_queries_reference_the_call() {
        let identity = Arc::new(Ed25519Identity::generate());
        let (agent, transport) = agent_with(
            vec![
                accepted(),
                status_response("processing"),
                replied_response(candid_text("ok")),
            ],
            identity.clone(),
            config(StatusEndpoint::ReadStateThenLegacy, 10),
        );

        let submitted = agent.call(&canister(), "greet", candid_text("x")).await.unwrap();
        agent.poll_until_terminal(&submitted).await.unwrap();

        let requests = transport.requests();
        let call_expiry = requests[0].ingress_expiry();
        assert!(call_expiry.is_some());

        for status in &requests[1..] {
            assert_eq!(
                bytes(status.content_field("request_id")),
                submitted.request_id.as_bytes().to_vec()
            );
            assert_eq!(status.ingress_expiry(), call_expiry);
            assert!(status.content_field("nonce").is_none());
        }
        assert!(requests[1].url.ends_with("/read_state"));
        assert_eq!(requests[2].url, "http://replica.test/api/v1/read");
    }

    // =============================================================================
    // SIGNATURES
    // =============================================================================

    #[tokio::test]
    async fn test_secp256k1_signature_covers_request_id() {
        let identity = Arc::new(Secp256k1Identity::generate());
        let (agent, transport) = agent_with(
            vec![accepted()],
            identity.clone(),
            config(StatusEndpoint::ReadState, 1),
        );

        let submitted = agent.call(&canister(), "greet", vec![]).await.unwrap();
        let request = &transport.requests()[0];

        let public_key = envelope_bytes(request, "sender_pubkey");
        assert_eq!(public_key, identity.public_key().to_der());
        assert_eq!(
            bytes(request.content_field("sender")),
            identity.sender().as_slice().to_vec()
        );

        let signature = Signature::from_bytes(envelope_bytes(request, "sender_sig"));
        Secp256k1PublicKey::from_der(&public_key)
            .unwrap()
            .verify(submitted.request_id.as_bytes(), &signature)
            .unwrap();
    }

    #[tokio::test]
    async fn test_ed25519_signature_covers_request_id() {
        let identity = Arc::new(Ed25519Identity::generate());
        let (agent, transport) = agent_with(
            vec![accepted()],
            identity.clone(),
            config(StatusEndpoint::ReadState, 1),
        );

        let submitted = agent.call(&canister(), "greet", vec![]).await.unwrap();
        let request = &transport.requests()[0];

        let signature = Signature::from_bytes(envelope_bytes(request, "sender_sig"));
        Ed25519PublicKey::from_der(&envelope_bytes(request, "sender_pubkey"))
            .unwrap()
            .verify(submitted.request_id.as_bytes(), &signature)
            .unwrap();
    }

    #[tokio::test]
    async fn test_anonymous_call_is_unsigned() {
        let (agent, transport) = agent_with(
            vec![accepted()],
            Arc::new(AnonymousIdentity),
            config(StatusEndpoint::ReadState, 1),
        );

        agent.call(&canister(), "greet", vec![]).await.unwrap();
        let request = &transport.requests()[0];

        assert!(!request.is_signed());
        assert_eq!(
            bytes(request.content_field("sender")),
            Principal::anonymous().as_slice().to_vec()
        );
    }

    // =============================================================================
    // FAILURE PATHS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_rejection_reaches_actor_caller() {
        let (agent, _) = agent_with(
            vec![
                accepted(),
                rejected_response(4, "Canister trapped: greeting too long"),
            ],
            Arc::new(AnonymousIdentity),
            config(StatusEndpoint::ReadState, 10),
        );

        let actor = Actor::new(agent, canister(), greet_interface());
        let result: Result<(String,), _> = actor.call("greet", ("x".repeat(64),)).await;

        match result {
            Err(AgentError::CallRejected { code, message }) => {
                assert_eq!(code, 4);
                assert_eq!(message, "Canister trapped: greeting too long");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_endless_processing_times_out() {
        let (agent, transport) = agent_with(
            vec![accepted(), status_response("processing")],
            Arc::new(AnonymousIdentity),
            config(StatusEndpoint::ReadState, 4),
        );

        let actor = Actor::new(agent, canister(), greet_interface());
        let result: Result<(String,), _> = actor.call("greet", ("world".to_string(),)).await;

        match result {
            Err(AgentError::PollTimeout {
                attempts,
                last_status,
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_status, Some(CallStatus::Processing));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(transport.requests().len(), 5);
    }

    #[tokio::test]
    async fn test_refused_call_is_not_polled() {
        let (agent, transport) = agent_with(
            vec![agent_core::HttpResponse {
                status: 400,
                body: b"invalid signature".to_vec(),
            }],
            Arc::new(AnonymousIdentity),
            config(StatusEndpoint::ReadState, 10),
        );

        let actor = Actor::new(agent, canister(), greet_interface());
        let result: Result<(String,), _> = actor.call("greet", ("world".to_string(),)).await;

        assert!(matches!(
            result,
            Err(AgentError::Transport { status: 400, ref body }) if body == "invalid signature"
        ));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_undeclared_method_sends_nothing() {
        let (agent, transport) = agent_with(
            vec![accepted()],
            Arc::new(AnonymousIdentity),
            config(StatusEndpoint::ReadState, 1),
        );

        let actor = Actor::new(agent, canister(), greet_interface());
        let result: Result<(String,), _> = actor.call("farewell", ("world".to_string(),)).await;

        assert!(matches!(result, Err(AgentError::MethodNotFound(_))));
        assert!(transport.requests().is_empty());
    }
}
