//! # Publish Stream Responses
//!
//! Messages sent back to the upstream publisher as blocks become durable.

use crate::entities::BlockNumber;
use serde::{Deserialize, Serialize};

/// Reason a publish stream was ended by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndStreamCode {
    /// A block could not be written.
    PersistenceFailed,
    /// Any other unrecoverable node-side failure.
    InternalError,
}

/// Response emitted towards the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishStreamResponse {
    /// The block is complete and durable.
    Acknowledgement {
        block_number: BlockNumber,
        block_already_exists: bool,
    },
    /// The node stopped accepting the stream.
    EndOfStream {
        status: EndStreamCode,
        /// Last block number acknowledged before the failure.
        block_number: BlockNumber,
    },
}

impl PublishStreamResponse {
    #[must_use]
    pub fn ack(block_number: BlockNumber) -> Self {
        PublishStreamResponse::Acknowledgement {
            block_number,
            block_already_exists: false,
        }
    }

    #[must_use]
    pub fn block_number(&self) -> BlockNumber {
        match self {
            PublishStreamResponse::Acknowledgement { block_number, .. }
            | PublishStreamResponse::EndOfStream { block_number, .. } => *block_number,
        }
    }
}
