//! # Error Types
//!
//! Errors shared by every crate that touches block items.

use crate::entities::BlockItemKind;
use thiserror::Error;

/// Failure to encode or decode a framing item payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemParseError {
    /// The item is not of the kind being decoded.
    #[error("Expected {expected:?} item, found {actual:?}")]
    UnexpectedKind {
        expected: BlockItemKind,
        actual: BlockItemKind,
    },

    /// The payload bytes do not decode.
    #[error("Malformed {kind:?} payload: {message}")]
    Malformed { kind: BlockItemKind, message: String },

    /// The value could not be encoded.
    #[error("Failed to encode {kind:?} payload: {message}")]
    Encode { kind: BlockItemKind, message: String },
}

/// A batch was constructed without any item.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("A block item batch must contain at least one item")]
pub struct EmptyBatchError;
