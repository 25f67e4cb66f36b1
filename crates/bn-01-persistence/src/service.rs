//! # Persistence Subscriber
//!
//! Drives a [`BlockWriter`] from the ring buffer and turns completed blocks
//! into acknowledgements for the publisher.

use crate::ports::outbound::BlockWriter;
use shared_bus::BlockItemHandler;
use shared_types::{BlockItemBatch, BlockNumber, EndStreamCode, PublishStreamResponse, ServiceStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Subscriber that persists batches and reports completed blocks.
///
/// After the first writer failure it sends `EndOfStream`, clears the
/// service status, and ignores every later batch. Storage failures end the
/// stream with `PersistenceFailed`, malformed framing items with
/// `InternalError`.
pub struct PersistenceHandler<W> {
    writer: W,
    responses: mpsc::UnboundedSender<PublishStreamResponse>,
    status: Arc<ServiceStatus>,
    last_acknowledged: Option<BlockNumber>,
    failed: bool,
}

impl<W: BlockWriter> PersistenceHandler<W> {
    pub fn new(
        writer: W,
        responses: mpsc::UnboundedSender<PublishStreamResponse>,
        status: Arc<ServiceStatus>,
    ) -> Self {
        Self {
            writer,
            responses,
            status,
            last_acknowledged: None,
            failed: false,
        }
    }

    #[must_use]
    pub fn last_acknowledged(&self) -> Option<BlockNumber> {
        self.last_acknowledged
    }

    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    fn respond(&self, response: PublishStreamResponse) {
        if self.responses.send(response).is_err() {
            debug!("Acknowledgement receiver dropped");
        }
    }
}

impl<W: BlockWriter> BlockItemHandler for PersistenceHandler<W> {
    fn handle_block_items_received(&mut self, batch: &BlockItemBatch) {
        if self.failed {
            return;
        }

        match self.writer.write(batch) {
            Ok(Some(block_number)) => {
                self.last_acknowledged = Some(block_number);
                debug!(block_number, "Block persisted, acknowledging");
                self.respond(PublishStreamResponse::ack(block_number));
            }
            Ok(None) => {}
            Err(e) => {
                let block_number = self.last_acknowledged.unwrap_or_default();
                let status = if e.is_storage_failure() {
                    EndStreamCode::PersistenceFailed
                } else {
                    EndStreamCode::InternalError
                };
                error!(error = %e, ?status, last_acknowledged = block_number, "Persistence failed, ending stream");
                self.failed = true;
                self.status.set_running(false);
                self.respond(PublishStreamResponse::EndOfStream { status, block_number });
            }
        }
    }
}

impl<W> Drop for PersistenceHandler<W> {
    fn drop(&mut self) {
        if self.failed {
            warn!(
                last_acknowledged = ?self.last_acknowledged,
                "Persistence subscriber stopped after failure"
            );
        }
    }
}
