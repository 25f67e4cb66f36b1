//! # Adapters Module
//!
//! - `dummy` - SHA-384 fixture verifier
//! - `ed25519` - production verifier

pub mod dummy;
pub mod ed25519;

pub use dummy::SignatureVerifierDummy;
pub use ed25519::Ed25519SignatureVerifier;
