//! # Key Errors
//!
//! Failures loading the ledger public key. Verification itself never errors;
//! a bad signature is simply `false`.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KeyError {
    #[error("Public key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Public key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Public key is not a valid ed25519 point")]
    InvalidKey,
}
