//! # Signature Verification (bn-03)
//!
//! Verifies block proof signatures against SHA-384 block hashes as blocks
//! stream through the ring buffer.
//!
//! ## Variants
//!
//! | Verifier | Accepts |
//! |----------|---------|
//! | [`Ed25519SignatureVerifier`] | ed25519 signature of the block hash under the ledger key |
//! | [`SignatureVerifierDummy`] | `SHA-384(block hash)`, for reproducible fixtures only |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - verification results and key errors
//! - `ports/` - the `SignatureVerifier` capability
//! - `adapters/` - production and dummy verifiers
//! - `service.rs` - the verification subscriber

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{Ed25519SignatureVerifier, SignatureVerifierDummy};
pub use domain::{KeyError, VerificationResult, VerificationStatus};
pub use ports::SignatureVerifier;
pub use service::VerificationHandler;
