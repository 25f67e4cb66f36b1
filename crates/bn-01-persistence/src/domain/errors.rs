//! # Domain Errors
//!
//! Failures of the persistence collaborator. Readers surface them to the
//! access service, which translates every variant into `NOT_AVAILABLE`.

use shared_types::{BlockNumber, ItemParseError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored block could not be decoded.
    #[error("Stored block {block_number} is unreadable: {message}")]
    Parse {
        block_number: BlockNumber,
        message: String,
    },

    /// A block could not be encoded for storage.
    #[error("Failed to encode block {block_number}: {message}")]
    Encode {
        block_number: BlockNumber,
        message: String,
    },

    /// A framing item in the stream did not decode.
    #[error("Malformed framing item: {0}")]
    Item(#[from] ItemParseError),
}

impl PersistenceError {
    /// Whether the failure came from reading or decoding stored data rather
    /// than from the incoming stream.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            PersistenceError::Io(_) | PersistenceError::Parse { .. } | PersistenceError::Encode { .. }
        )
    }
}
