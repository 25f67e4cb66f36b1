//! # Verification Benchmarks
//!
//! Block hashing plus signature check per block, for both verifier variants.

use bn_03_signature_verification::{Ed25519SignatureVerifier, SignatureVerifier, SignatureVerifierDummy};
use criterion::{black_box, Criterion, Throughput};
use shared_types::test_utils::block_items;
use shared_types::{compute_block_hash, sha384};

pub fn bench_block_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification-block-hash");
    let items = block_items(7);
    let len = items.len();
    let content = &items[..len - 1];

    group.throughput(Throughput::Elements(1));
    group.bench_function("sha384_block", |b| b.iter(|| black_box(compute_block_hash(content))));
    group.finish();
}

pub fn bench_verifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("verification-signature");
    let hash = sha384(b"benchmark block");

    let dummy = SignatureVerifierDummy;
    let dummy_signature = sha384(&hash);
    group.bench_function("dummy", |b| {
        b.iter(|| black_box(dummy.verify_signature(&hash, &dummy_signature)))
    });

    // RFC 8032 test vector 1: secret key and public key.
    let secret = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60").unwrap();
    let public = hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a").unwrap();
    let verifier = Ed25519SignatureVerifier::from_bytes(&public).unwrap();
    let signature = ed25519_sign(&secret, &hash);
    assert!(verifier.verify_signature(&hash, &signature));

    group.bench_function("ed25519", |b| {
        b.iter(|| black_box(verifier.verify_signature(&hash, &signature)))
    });
    group.finish();
}

fn ed25519_sign(secret: &[u8], message: &[u8]) -> Vec<u8> {
    use ed25519_dalek::{Signer, SigningKey};
    let key: [u8; 32] = secret.try_into().unwrap();
    SigningKey::from_bytes(&key).sign(message).to_bytes().to_vec()
}
