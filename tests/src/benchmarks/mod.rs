//! # Block Node Benchmarks
//!
//! Criterion bodies shared with `benches/mediator_benchmarks.rs`.

pub mod mediator;
pub mod verification;
