//! # Block Boundary Detection
//!
//! Decides which batch closes a logical block and which number to acknowledge.
//!
//! 1. A batch whose first item is a header sets the current block number.
//! 2. A batch whose last item is a proof completes the current block.
//!
//! Both steps may fire on the same batch, always in that order. Batches must
//! arrive in publish order; reordering or duplication is not detected and
//! yields a wrong number. `observe` takes `&mut self`, so a detector has a
//! single sequential owner.

use shared_types::{BlockItemBatch, BlockNumber, ItemParseError};
use tracing::trace;

/// Stateful completion detector for one writer session.
#[derive(Debug, Default, Clone)]
pub struct BlockBoundary {
    current_block_number: BlockNumber,
}

impl BlockBoundary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the block currently being received.
    #[must_use]
    pub fn current_block_number(&self) -> BlockNumber {
        self.current_block_number
    }

    /// Feed the next batch. Returns the completed block number, if any.
    ///
    /// # Errors
    ///
    /// `ItemParseError` if the leading header does not decode. State is left
    /// unchanged in that case.
    pub fn observe(&mut self, batch: &BlockItemBatch) -> Result<Option<BlockNumber>, ItemParseError> {
        let first = batch.first_item();
        if first.is_block_header() {
            self.current_block_number = first.parse_block_header()?.number;
            trace!(block_number = self.current_block_number, "Block opened");
        }

        if batch.last_item().is_block_proof() {
            trace!(block_number = self.current_block_number, "Block closed");
            Ok(Some(self.current_block_number))
        } else {
            Ok(None)
        }
    }
}
