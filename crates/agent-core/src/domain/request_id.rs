//! # Request Id Hashing
//!
//! Deterministic content hash of a request body ("representation-independent
//! hash"):
//!
//! ```text
//! request_id = sha256( sort( sha256(name) ++ hash(value) for each field ) )
//! ```
//!
//! Field order never matters: the per-field digests are sorted bytewise
//! before the final hash.

use super::entities::RequestContent;
use sha2::{Digest, Sha256};
use shared_types::{Principal, RequestId};

/// A field value as seen by the hasher.
#[derive(Clone, Copy, Debug)]
pub enum FieldValue<'a> {
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// UTF-8 text.
    Text(&'a str),
    /// Natural number, hashed as unsigned LEB128.
    Nat(u64),
    /// Principal, hashed as its bytes.
    Principal(&'a Principal),
    /// Request id, hashed as its bytes.
    RequestId(&'a RequestId),
}

impl FieldValue<'_> {
    fn digest(&self) -> [u8; 32] {
        match self {
            Self::Bytes(bytes) => Sha256::digest(bytes).into(),
            Self::Text(text) => Sha256::digest(text.as_bytes()).into(),
            Self::Nat(n) => Sha256::digest(leb128(*n)).into(),
            Self::Principal(principal) => Sha256::digest(principal.as_slice()).into(),
            Self::RequestId(id) => Sha256::digest(id.as_bytes()).into(),
        }
    }
}

/// Unsigned LEB128 encoding.
pub fn leb128(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Hash an arbitrary set of named fields.
pub fn request_id_of_fields<'a, I>(fields: I) -> RequestId
where
    I: IntoIterator<Item = (&'a str, FieldValue<'a>)>,
{
    let mut pairs: Vec<[u8; 64]> = fields
        .into_iter()
        .map(|(name, value)| {
            let mut pair = [0u8; 64];
            pair[..32].copy_from_slice(&Sha256::digest(name.as_bytes()));
            pair[32..].copy_from_slice(&value.digest());
            pair
        })
        .collect();
    pairs.sort_unstable();

    let mut hasher = Sha256::new();
    for pair in &pairs {
        hasher.update(pair);
    }
    RequestId::new(hasher.finalize().into())
}

/// Hash a request body.
pub fn request_id_of(content: &RequestContent) -> RequestId {
    let mut fields: Vec<(&str, FieldValue<'_>)> =
        vec![("request_type", FieldValue::Text(content.request_type()))];

    match content {
        RequestContent::Call {
            canister_id,
            method_name,
            arg,
            nonce,
            sender,
            ingress_expiry,
        } => {
            fields.push(("canister_id", FieldValue::Principal(canister_id)));
            fields.push(("method_name", FieldValue::Text(method_name)));
            fields.push(("arg", FieldValue::Bytes(arg)));
            fields.push(("sender", FieldValue::Principal(sender)));
            if let Some(nonce) = nonce {
                fields.push(("nonce", FieldValue::Bytes(nonce.as_bytes())));
            }
            if let Some(expiry) = ingress_expiry {
                fields.push(("ingress_expiry", FieldValue::Nat(expiry.as_millis())));
            }
        }
        RequestContent::RequestStatus {
            request_id,
            ingress_expiry,
        } => {
            fields.push(("request_id", FieldValue::RequestId(request_id)));
            if let Some(expiry) = ingress_expiry {
                fields.push(("ingress_expiry", FieldValue::Nat(expiry.as_millis())));
            }
        }
    }

    request_id_of_fields(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Expiry, Nonce};
    use proptest::prelude::*;

    #[test]
    fn test_leb128() {
        assert_eq!(leb128(0), vec![0x00]);
        assert_eq!(leb128(127), vec![0x7f]);
        assert_eq!(leb128(128), vec![0x80, 0x01]);
        assert_eq!(leb128(624_485), vec![0xe5, 0x8e, 0x26]);
    }

    #[test]
    fn test_documented_call_vector() {
        let canister = Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0x04, 0xd2]);
        let sender = Principal::anonymous();
        let id = request_id_of_fields([
            ("request_type", FieldValue::Text("call")),
            ("sender", FieldValue::Principal(&sender)),
            ("ingress_expiry", FieldValue::Nat(1_685_570_400_000_000_000)),
            ("canister_id", FieldValue::Principal(&canister)),
            ("method_name", FieldValue::Text("hello")),
            ("arg", FieldValue::Bytes(b"DIDL\x00\xFD*")),
        ]);
        assert_eq!(
            id.to_hex(),
            "1d1091364d6bb8a6c16b203ee75467d59ead468f523eb058880ae8ec80e2b101"
        );
    }

    #[test]
    fn test_content_matches_field_hash() {
        let canister = Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0x04, 0xd2]);
        let mut content = RequestContent::call(
            canister,
            "hello",
            b"DIDL\x00\xFD*".to_vec(),
            Principal::anonymous(),
        );
        content.set_ingress_expiry(Expiry::from_millis(1_685_570_400_000_000_000));

        assert_eq!(
            request_id_of(&content).to_hex(),
            "1d1091364d6bb8a6c16b203ee75467d59ead468f523eb058880ae8ec80e2b101"
        );
    }

    #[test]
    fn test_nonce_changes_id() {
        let mut a = RequestContent::call(
            Principal::management_canister(),
            "m",
            vec![],
            Principal::anonymous(),
        );
        let mut b = a.clone();
        a.set_nonce(Nonce::from_counter(1));
        b.set_nonce(Nonce::from_counter(2));
        assert_ne!(request_id_of(&a), request_id_of(&b));
    }

    #[test]
    fn test_status_query_hash_differs_from_queried_id() {
        let call = RequestContent::call(
            Principal::management_canister(),
            "m",
            vec![],
            Principal::anonymous(),
        );
        let call_id = request_id_of(&call);
        let status = RequestContent::request_status(call_id, Expiry::from_millis(5));
        assert_ne!(request_id_of(&status), call_id);
    }

    proptest! {
        #[test]
        fn prop_field_order_is_irrelevant(
            method in "[a-z_]{1,16}",
            arg in proptest::collection::vec(any::<u8>(), 0..64),
            expiry in any::<u64>(),
            rotation in 0usize..5,
        ) {
            let sender = Principal::anonymous();
            let fields = vec![
                ("request_type", FieldValue::Text("call")),
                ("method_name", FieldValue::Text(&method)),
                ("arg", FieldValue::Bytes(&arg)),
                ("sender", FieldValue::Principal(&sender)),
                ("ingress_expiry", FieldValue::Nat(expiry)),
            ];
            let mut rotated = fields.clone();
            rotated.rotate_left(rotation);
            let mut reversed = fields.clone();
            reversed.reverse();

            let expected = request_id_of_fields(fields);
            prop_assert_eq!(request_id_of_fields(rotated), expected);
            prop_assert_eq!(request_id_of_fields(reversed), expected);
        }
    }
}
