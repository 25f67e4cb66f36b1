//! # Shared Bus - Block Item Ring Buffer
//!
//! In-process distribution of block item batches from a single publisher to
//! any number of independently paced subscribers.
//!
//! ```text
//!                 append()                 poll()
//! ┌───────────┐ ─────────→ ┌────────────┐ ←───────── Poller (persistence)
//! │ Publisher │            │ RingBuffer │ ←───────── Poller (verification)
//! └───────────┘ ←───────── └────────────┘ ←───────── Poller (live stream)
//!              backpressure  cursor + gating set
//! ```
//!
//! ## Invariants
//!
//! | ID | Invariant |
//! |----|-----------|
//! | 1 | `consumer sequence <= cursor` for every registered subscriber |
//! | 2 | `cursor - min(gating set) <= capacity`; `append` waits, never overwrites |
//! | 3 | Every subscriber observes batches in append order, without gaps |
//! | 4 | New subscribers start at the current cursor (live tail, no replay) |
//!
//! ## Crate Structure
//!
//! - `ring_buffer` - slots, cursor, gating set and the single [`Publisher`]
//! - `sequence` - cache-padded atomic sequence counters
//! - `batched` - per-poller staging buffer
//! - `poller` - pull-based, one-item-at-a-time consumption
//! - `wait` - idle strategies for blocked publishers and empty polls
//! - `subscriber` - the [`BlockItemHandler`] capability and its worker thread

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod batched;
pub mod poller;
pub mod ring_buffer;
pub mod sequence;
pub mod subscriber;
pub mod wait;

pub use batched::{BatchedData, BatchedDataError, PollResult};
pub use poller::{Poller, PollerError};
pub use ring_buffer::{Publisher, RingBuffer, RingBufferError};
pub use sequence::{Sequence, INITIAL_CURSOR_VALUE};
pub use subscriber::{spawn_subscriber, BlockItemHandler, SubscriberError, SubscriberHandle};
pub use wait::WaitStrategy;

use shared_types::BlockItemBatch;

/// Ring buffer carrying block item batches.
pub type BlockItemRingBuffer = RingBuffer<BlockItemBatch>;

/// Default number of slots in the ring buffer.
pub const DEFAULT_RING_BUFFER_SIZE: usize = 1024;

/// Default number of batches a poller drains per cycle.
pub const DEFAULT_POLLER_BATCH_SIZE: usize = 16;
