//! # Persistence (bn-01)
//!
//! The persisting subscriber of the block node. It consumes batches in
//! publish order, decides which batch closes a logical block, stores the
//! block, and acknowledges it back to the publisher.
//!
//! ```text
//! RingBuffer ──poll──→ PersistenceHandler ──write──→ BlockWriter
//!                            │                       ├─ NoOpBlockWriter
//!                            │                       └─ BlockAsFileWriter ──→ <root>/<n>.blk
//!                            └──Acknowledgement / EndOfStream──→ publisher
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant |
//! |----|-----------|
//! | 1 | A leading header sets the current block number before a trailing proof reports it |
//! | 2 | Completion is reported only for a batch whose last item is a proof |
//! | 3 | A block file is visible only once fully written (temp file + rename) |
//! | 4 | After a writer failure no further batch is written or acknowledged |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - boundary detection and errors
//! - `ports/` - `BlockWriter` and `BlockReader`
//! - `adapters/` - no-op and block-as-file storage
//! - `service.rs` - the persistence subscriber

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{BlockAsFileReader, BlockAsFileWriter, NoOpBlockReader, NoOpBlockWriter};
pub use domain::{BlockBoundary, PersistenceError};
pub use ports::{BlockReader, BlockWriter};
pub use service::PersistenceHandler;
