//! # Shared Types Crate
//!
//! Block stream entities shared by the distribution core and every
//! subscriber.
//!
//! ## Design Principles
//!
//! - **Unparsed items**: a [`BlockItem`] keeps its payload encoded. Only the
//!   framing markers (block header, block proof) are ever decoded, and only by
//!   the consumer that needs them.
//! - **Immutable batches**: a [`BlockItemBatch`] is published once and shared by
//!   reference between all subscribers. Cloning never copies items.

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod status;
pub mod stream;

pub use entities::*;
pub use errors::*;
pub use hashing::{compute_block_hash, sha384, BlockHasher, HASH_LENGTH};
pub use status::ServiceStatus;
pub use stream::{EndStreamCode, PublishStreamResponse};

/// Block item fixtures.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
