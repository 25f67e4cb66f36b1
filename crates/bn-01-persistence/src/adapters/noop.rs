use crate::domain::boundary::BlockBoundary;
use crate::domain::errors::PersistenceError;
use crate::ports::outbound::{BlockReader, BlockWriter};
use shared_types::{Block, BlockItemBatch, BlockNumber};

/// Writer that stores nothing and acknowledges every completed block.
///
/// Isolates the producer and the ring buffer from storage in tests and
/// throughput runs.
#[derive(Debug, Default)]
pub struct NoOpBlockWriter {
    boundary: BlockBoundary,
}

impl NoOpBlockWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockWriter for NoOpBlockWriter {
    fn write(&mut self, batch: &BlockItemBatch) -> Result<Option<BlockNumber>, PersistenceError> {
        Ok(self.boundary.observe(batch)?)
    }
}

/// Reader for a node without storage. Every block is absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBlockReader;

impl BlockReader for NoOpBlockReader {
    fn read(&self, _number: BlockNumber) -> Result<Option<Block>, PersistenceError> {
        Ok(None)
    }
}
