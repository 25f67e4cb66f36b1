//! # Domain Layer
//!
//! Request and response values of the single block access API.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockNumber};

/// Request for one stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRequest {
    pub block_number: BlockNumber,
}

impl BlockRequest {
    #[must_use]
    pub fn new(block_number: BlockNumber) -> Self {
        Self { block_number }
    }
}

/// Outcome of a block read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockResponseCode {
    /// The block was read and is returned.
    ReadBlockSuccess,
    /// No block with the requested number is stored.
    ReadBlockNotFound,
    /// The service is not running or storage failed.
    ReadBlockNotAvailable,
}

/// Response to a [`BlockRequest`]. `block` is set only on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub status: BlockResponseCode,
    pub block: Option<Block>,
}

impl BlockResponse {
    #[must_use]
    pub fn success(block: Block) -> Self {
        Self {
            status: BlockResponseCode::ReadBlockSuccess,
            block: Some(block),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: BlockResponseCode::ReadBlockNotFound,
            block: None,
        }
    }

    #[must_use]
    pub fn not_available() -> Self {
        Self {
            status: BlockResponseCode::ReadBlockNotAvailable,
            block: None,
        }
    }
}
