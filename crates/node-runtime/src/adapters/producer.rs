//! # Stream Producers
//!
//! Entry points that feed block item batches into the node.

use shared_bus::{Publisher, RingBufferError};
use shared_types::{BlockItemBatch, ServiceStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Service is not running")]
    NotRunning,

    #[error(transparent)]
    RingBuffer(#[from] RingBufferError),
}

/// Source side of the block stream.
pub trait StreamProducer: Send {
    /// Publish `batch`, waiting while the slowest subscriber is a full ring
    /// behind.
    ///
    /// # Errors
    ///
    /// `ProducerError::NotRunning` once the node is shutting down or failed.
    fn publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError>;

    /// Publish `batch` only if there is room now.
    ///
    /// # Errors
    ///
    /// Those of [`Self::publish`], plus `ProducerError::RingBuffer` when the
    /// ring buffer is full.
    fn try_publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError>;

    /// Batches accepted so far.
    fn published(&self) -> u64;
}

/// Production producer: the single writer of the ring buffer.
pub struct RingBufferProducer {
    publisher: Publisher<BlockItemBatch>,
    status: Arc<ServiceStatus>,
    published: u64,
}

impl RingBufferProducer {
    pub fn new(publisher: Publisher<BlockItemBatch>, status: Arc<ServiceStatus>) -> Self {
        Self {
            publisher,
            status,
            published: 0,
        }
    }

    fn ensure_running(&self) -> Result<(), ProducerError> {
        if self.status.is_running() {
            Ok(())
        } else {
            Err(ProducerError::NotRunning)
        }
    }
}

impl StreamProducer for RingBufferProducer {
    fn publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError> {
        self.ensure_running()?;
        let items = batch.len();
        let sequence = self.publisher.append(batch);
        self.published += 1;
        trace!(sequence, items, "Batch published");
        Ok(())
    }

    fn try_publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError> {
        self.ensure_running()?;
        self.publisher.try_append(batch)?;
        self.published += 1;
        Ok(())
    }

    fn published(&self) -> u64 {
        self.published
    }
}

/// Drops every batch. For isolating upstream clients while troubleshooting.
#[derive(Debug, Default)]
pub struct NoOpStreamProducer {
    dropped: u64,
}

impl StreamProducer for NoOpStreamProducer {
    fn publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError> {
        self.dropped += 1;
        debug!(items = batch.len(), dropped = self.dropped, "Batch dropped by no-op producer");
        Ok(())
    }

    fn try_publish(&mut self, batch: BlockItemBatch) -> Result<(), ProducerError> {
        self.publish(batch)
    }

    fn published(&self) -> u64 {
        self.dropped
    }
}
