//! # Canister Agent Benchmarks
//!
//! | Stage | Work per call |
//! |-------|---------------|
//! | Request id | one SHA-256 per field plus one over the sorted pairs |
//! | Signing | secp256k1 ECDSA or Ed25519 over 32 bytes |
//! | Envelope | CBOR encoding with the self-describe tag |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use agent_core::{
    build_envelope, request_id_of, CborCodec, EnvelopeCodec, Expiry, Nonce, RequestContent,
};
use shared_crypto::{AnonymousIdentity, Ed25519Identity, Identity, Secp256k1Identity};
use shared_types::Principal;

fn sample_call(arg_len: usize) -> RequestContent {
    let mut content = RequestContent::call(
        Principal::management_canister(),
        "greet",
        vec![0xAB; arg_len],
        Principal::anonymous(),
    );
    content.set_ingress_expiry(Expiry::from_millis(1_700_000_300_000));
    content.set_nonce(Nonce::from_counter(7));
    content
}

// ============================================================================
// Request id
// ============================================================================

fn bench_request_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("request-id");

    for size in [0usize, 1_024, 65_536] {
        let content = sample_call(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("call", size), &content, |b, content| {
            b.iter(|| black_box(request_id_of(content)))
        });
    }

    group.finish();
}

// ============================================================================
// Signed envelopes
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    group.measurement_time(Duration::from_secs(5));

    let identities: Vec<(&str, Box<dyn Identity>)> = vec![
        ("anonymous", Box::new(AnonymousIdentity)),
        ("secp256k1", Box::new(Secp256k1Identity::generate())),
        ("ed25519", Box::new(Ed25519Identity::generate())),
    ];

    for (name, identity) in &identities {
        group.bench_function(BenchmarkId::new("build", name), |b| {
            b.iter(|| black_box(build_envelope(sample_call(256), identity.as_ref())))
        });
    }

    let signed = build_envelope(sample_call(256), identities[1].1.as_ref());
    if let Ok((envelope, _)) = signed {
        group.bench_function("cbor_encode", |b| {
            b.iter(|| black_box(CborCodec.encode_envelope(&envelope)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_request_id, bench_envelope);
criterion_main!(benches);
