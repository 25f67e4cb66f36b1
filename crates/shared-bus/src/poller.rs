//! # Poller
//!
//! Pull-based consumption of a [`RingBuffer`].
//!
//! A poller owns one consumer sequence and a [`BatchedData`] staging buffer.
//! `poll()` serves from the staging buffer first and only consults the ring
//! buffer cursor once the staging buffer is empty. Draining stops when the
//! staging buffer is full; the rest is picked up by later polls.

use crate::batched::{BatchedData, BatchedDataError, PollResult};
use crate::ring_buffer::RingBuffer;
use crate::sequence::Sequence;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised while draining the ring buffer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollerError {
    /// The staging buffer contract was violated.
    #[error(transparent)]
    Batch(#[from] BatchedDataError),

    /// A published sequence had no value in its slot.
    #[error("Ring buffer slot for sequence {sequence} is empty")]
    EmptySlot { sequence: i64 },
}

/// Single-subscriber view of a ring buffer.
pub struct Poller<T> {
    ring: Arc<RingBuffer<T>>,
    sequence: Arc<Sequence>,
    polled: BatchedData<T>,
    subscribed: bool,
}

impl<T: Clone> Poller<T> {
    /// Register a consumer sequence on `ring` and stage up to `batch_size`
    /// values per drain.
    ///
    /// # Errors
    ///
    /// `PollerError::Batch(ZeroCapacity)` if `batch_size == 0`.
    pub fn new(ring: Arc<RingBuffer<T>>, batch_size: usize) -> Result<Self, PollerError> {
        let polled = BatchedData::new(batch_size)?;
        let sequence = ring.add_gating_sequence();
        Ok(Self {
            ring,
            sequence,
            polled,
            subscribed: true,
        })
    }

    /// Next value, or `NoData` if nothing new was published.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Propagates staging buffer bounds violations; they are never swallowed.
    pub fn poll(&mut self) -> Result<PollResult<T>, PollerError> {
        if self.polled.count() > 0 {
            return Ok(self.polled.poll_message());
        }

        if self.subscribed {
            self.load_next_values()?;
        }
        Ok(self.polled.poll_message())
    }

    /// Drain published values between the consumer sequence and the cursor
    /// into the staging buffer.
    fn load_next_values(&mut self) -> Result<usize, PollerError> {
        let current = self.sequence.get();
        let available = self.ring.cursor();
        let mut next = current + 1;
        let mut loaded = 0;

        while next <= available {
            let value = self
                .ring
                .get(next)
                .ok_or(PollerError::EmptySlot { sequence: next })?;
            let has_room = self.polled.add_data_item(value)?;
            next += 1;
            loaded += 1;
            if !has_room {
                break;
            }
        }

        if loaded > 0 {
            self.sequence.set(next - 1);
            trace!(from = current + 1, to = next - 1, available, "Drained ring buffer");
        }
        Ok(loaded)
    }
}

impl<T> Poller<T> {
    /// Deregister the consumer sequence. Idempotent.
    ///
    /// Values already staged stay available to `poll()`; nothing new is
    /// drained afterwards.
    pub fn unsubscribe(&mut self) {
        if !self.subscribed {
            return;
        }
        self.subscribed = false;
        self.ring.remove_gating_sequence(&self.sequence);
        debug!(
            sequence = self.sequence.get(),
            staged = self.polled.count(),
            "Poller unsubscribed"
        );
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Highest sequence drained into the staging buffer.
    #[must_use]
    pub fn sequence(&self) -> i64 {
        self.sequence.get()
    }

    /// Shared handle to the consumer sequence, for out-of-band deregistration.
    #[must_use]
    pub fn sequence_handle(&self) -> Arc<Sequence> {
        Arc::clone(&self.sequence)
    }

    /// Values staged but not yet served.
    #[must_use]
    pub fn staged(&self) -> usize {
        self.polled.count()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
