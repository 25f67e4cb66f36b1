//! # Block Node Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion bodies, driven from benches/
//! │   ├── mediator.rs
//! │   └── verification.rs
//! │
//! └── integration/      # Cross-crate flows
//!     ├── flows.rs
//!     └── backpressure.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bn-tests
//! cargo test -p bn-tests integration::backpressure::
//! cargo bench -p bn-tests
//! ```

pub mod benchmarks;
pub mod integration;
