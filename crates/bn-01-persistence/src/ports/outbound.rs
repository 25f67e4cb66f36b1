//! # Outbound Ports
//!
//! Storage abstractions selected at startup.

use crate::domain::errors::PersistenceError;
use shared_types::{Block, BlockItemBatch, BlockNumber};

/// Sequential sink for block item batches.
///
/// Implementations run the block boundary contract and return the number of
/// a block once it is complete and durable. Batches must be fed in publish
/// order by a single owner.
pub trait BlockWriter: Send + 'static {
    /// # Errors
    ///
    /// `PersistenceError` if a framing item does not decode or the block
    /// cannot be stored.
    fn write(&mut self, batch: &BlockItemBatch) -> Result<Option<BlockNumber>, PersistenceError>;
}

/// Random access to stored blocks.
pub trait BlockReader: Send + Sync {
    /// Returns `Ok(None)` when no block with `number` is stored.
    ///
    /// # Errors
    ///
    /// `PersistenceError::Io` or `PersistenceError::Parse` if the block exists
    /// but cannot be read.
    fn read(&self, number: BlockNumber) -> Result<Option<Block>, PersistenceError>;
}

impl<R: BlockReader + ?Sized> BlockReader for std::sync::Arc<R> {
    fn read(&self, number: BlockNumber) -> Result<Option<Block>, PersistenceError> {
        (**self).read(number)
    }
}

impl<W: BlockWriter + ?Sized> BlockWriter for Box<W> {
    fn write(&mut self, batch: &BlockItemBatch) -> Result<Option<BlockNumber>, PersistenceError> {
        (**self).write(batch)
    }
}
