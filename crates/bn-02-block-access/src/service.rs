//! # Block Access Service
//!
//! Maps reads from a [`BlockReader`] to response statuses:
//!
//! | Read outcome | Status |
//! |--------------|--------|
//! | service not running | `ReadBlockNotAvailable`, no read attempted |
//! | `Ok(Some(block))` | `ReadBlockSuccess` |
//! | `Ok(None)` | `ReadBlockNotFound` |
//! | `Err(_)` | `ReadBlockNotAvailable` |

use crate::domain::{BlockRequest, BlockResponse};
use crate::ports::BlockAccessApi;
use bn_01_persistence::BlockReader;
use shared_types::ServiceStatus;
use std::sync::Arc;
use tracing::{debug, error};

pub struct BlockAccessService<R> {
    status: Arc<ServiceStatus>,
    reader: R,
}

impl<R: BlockReader> BlockAccessService<R> {
    pub fn new(status: Arc<ServiceStatus>, reader: R) -> Self {
        Self { status, reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R: BlockReader> BlockAccessApi for BlockAccessService<R> {
    fn single_block(&self, request: &BlockRequest) -> BlockResponse {
        let block_number = request.block_number;

        if !self.status.is_running() {
            error!(block_number, "Single block request while service is not running");
            return BlockResponse::not_available();
        }

        match self.reader.read(block_number) {
            Ok(Some(block)) => {
                debug!(block_number, "Returning block");
                BlockResponse::success(block)
            }
            Ok(None) => {
                debug!(block_number, "Block not found");
                BlockResponse::not_found()
            }
            Err(e) => {
                error!(block_number, error = %e, "Failed to read block");
                BlockResponse::not_available()
            }
        }
    }
}
