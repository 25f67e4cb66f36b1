//! # Block Node Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | ring-buffer-append | publisher claim + slot write, no subscribers |
//! | ring-buffer-append-poll | single-thread append and drain per poll batch size |
//! | ring-buffer-fan-out | batches/s delivered to 1, 2, 4 subscriber threads |
//! | verification-* | block hashing and signature check |

use bn_tests::benchmarks::{mediator, verification};
use criterion::{criterion_group, criterion_main};

criterion_group!(
    benches,
    mediator::bench_append,
    mediator::bench_append_poll,
    mediator::bench_fan_out,
    verification::bench_block_hash,
    verification::bench_verifiers,
);

criterion_main!(benches);
