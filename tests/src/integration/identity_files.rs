//! # Identity Files
//!
//! Key pairs written to disk, loaded back as trait objects, and used to
//! sign requests whose sender matches the stored key.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_core::test_utils::{accepted, FixedTimeSource, ScriptedTransport, SequenceNonceSource};
    use agent_core::{Agent, AgentApi, AgentConfig};
    use serde_cbor::Value;
    use shared_crypto::{
        load_identity, save_identity, CryptoError, Ed25519Identity, Identity, KeyPairHex,
        Secp256k1Identity,
    };
    use shared_types::Principal;

    #[test]
    fn test_secp256k1_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let original = Secp256k1Identity::generate();
        save_identity(&path, &original.serialize()).unwrap();
        let loaded = load_identity(&path).unwrap();

        assert_eq!(loaded.sender(), original.sender());
        assert_eq!(loaded.public_key(), Some(original.public_key().to_der()));
        assert_eq!(loaded.public_key().map(|der| der.len()), Some(88));
    }

    #[test]
    fn test_ed25519_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let original = Ed25519Identity::generate();
        save_identity(&path, &original.serialize()).unwrap();
        let loaded = load_identity(&path).unwrap();

        assert_eq!(loaded.sender(), original.sender());
        assert_eq!(loaded.public_key().map(|der| der.len()), Some(44));
    }

    #[test]
    fn test_sender_is_self_authenticating() {
        let identity = Secp256k1Identity::generate();
        let der = identity.public_key().to_der();

        let sender = identity.sender();
        assert_eq!(sender, Principal::self_authenticating(&der));
        assert_eq!(sender.as_slice().len(), 29);
        assert_eq!(sender.as_slice()[28], 0x02);
        assert_eq!(Principal::from_text(&sender.to_text()).unwrap(), sender);
    }

    #[test]
    fn test_object_format_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, r#"{"publicKey":"00","secretKey":"00"}"#).unwrap();

        assert!(matches!(
            load_identity(&path),
            Err(CryptoError::DeprecatedFormat)
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        match load_identity(&path) {
            Err(CryptoError::Io { path: reported, .. }) => {
                assert!(reported.ends_with("absent.json"));
            }
            Err(other) => panic!("expected I/O error, got {other:?}"),
            Ok(_) => panic!("expected I/O error"),
        }
    }

    #[test]
    fn test_mismatched_pair_is_refused() {
        let a = Secp256k1Identity::generate().serialize();
        let b = Secp256k1Identity::generate().serialize();
        let spliced = KeyPairHex {
            public_key_der: a.public_key_der.clone(),
            private_key: b.private_key.clone(),
        };
        assert!(Secp256k1Identity::deserialize(&spliced).is_err());
    }

    #[tokio::test]
    async fn test_loaded_identity_signs_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        let original = Ed25519Identity::generate();
        save_identity(&path, &original.serialize()).unwrap();

        let identity: Arc<dyn Identity> = Arc::from(load_identity(&path).unwrap());
        let transport = Arc::new(ScriptedTransport::new(vec![accepted()]));
        let agent = Agent::new(
            AgentConfig::with_url("http://replica.test"),
            transport.clone(),
            identity,
            Arc::new(FixedTimeSource::new(0)),
            Arc::new(SequenceNonceSource::new()),
        )
        .unwrap();

        agent
            .call(&Principal::management_canister(), "raw_rand", vec![])
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert!(request.is_signed());
        assert_eq!(
            request.content_field("sender"),
            Some(Value::Bytes(original.sender().as_slice().to_vec()))
        );
    }
}
