//! # Inbound Ports
//!
//! The API exposed to request-serving front ends.

use crate::domain::{BlockRequest, BlockResponse};

/// Single block access API.
///
/// Never fails: storage problems and unavailability are reported through
/// the response status.
pub trait BlockAccessApi: Send + Sync {
    fn single_block(&self, request: &BlockRequest) -> BlockResponse;
}
