//! # Ring Buffer
//!
//! Fixed-capacity circular sequence of slots with one publisher and a gating
//! set of consumer sequences.
//!
//! ## Backpressure
//!
//! The publisher may claim sequence `next` only when
//! `next - min(gating set) <= capacity`. Until then [`Publisher::append`]
//! waits according to the configured [`WaitStrategy`]. Nothing is dropped.
//!
//! ## Slot Access
//!
//! Slots are indexed by `sequence & mask`. The gating invariant guarantees a
//! slot is never written while a registered consumer may still read it, so
//! the per-slot lock is uncontended in steady state. Readers only clone the
//! stored value out (a reference count bump for batches).

use crate::sequence::{Sequence, INITIAL_CURSOR_VALUE};
use crate::wait::WaitStrategy;
use arc_swap::ArcSwap;
use crossbeam_utils::Backoff;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from ring buffer construction and publication.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RingBufferError {
    /// Capacity must be a non-zero power of two.
    #[error("Invalid ring buffer capacity {capacity}: must be a non-zero power of two")]
    InvalidCapacity { capacity: usize },

    /// The single publisher handle was already handed out.
    #[error("Ring buffer publisher already taken")]
    PublisherTaken,

    /// `try_append` found no free slot.
    #[error("Insufficient capacity: cursor {cursor}, slowest consumer {slowest}, capacity {capacity}")]
    InsufficientCapacity {
        cursor: i64,
        slowest: i64,
        capacity: usize,
    },
}

/// Bounded, multi-subscriber ring buffer.
pub struct RingBuffer<T> {
    slots: Box<[RwLock<Option<T>>]>,
    capacity: usize,
    mask: i64,
    /// Highest published sequence.
    cursor: Sequence,
    /// Copy-on-write set of registered consumer sequences.
    gating_sequences: ArcSwap<Vec<Arc<Sequence>>>,
    publisher_taken: AtomicBool,
    wait_strategy: WaitStrategy,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a ring buffer with `capacity` slots.
    ///
    /// # Errors
    ///
    /// `RingBufferError::InvalidCapacity` unless `capacity` is a non-zero
    /// power of two.
    pub fn new(capacity: usize, wait_strategy: WaitStrategy) -> Result<Self, RingBufferError> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(RingBufferError::InvalidCapacity { capacity });
        }

        let slots = (0..capacity)
            .map(|_| RwLock::new(None))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        debug!(capacity, wait_strategy = %wait_strategy, "Ring buffer created");

        Ok(Self {
            slots,
            capacity,
            mask: capacity as i64 - 1,
            cursor: Sequence::new(INITIAL_CURSOR_VALUE),
            gating_sequences: ArcSwap::from_pointee(Vec::new()),
            publisher_taken: AtomicBool::new(false),
            wait_strategy,
        })
    }

    /// Hand out the single publisher.
    ///
    /// # Errors
    ///
    /// `RingBufferError::PublisherTaken` on every call after the first.
    pub fn publisher(self: &Arc<Self>) -> Result<Publisher<T>, RingBufferError> {
        if self.publisher_taken.swap(true, Ordering::AcqRel) {
            return Err(RingBufferError::PublisherTaken);
        }
        Ok(Publisher {
            ring: Arc::clone(self),
        })
    }

    /// Value published at `sequence`, if the slot holds one.
    ///
    /// Only meaningful for `cursor - capacity < sequence <= cursor` while the
    /// caller's consumer sequence is registered.
    pub(crate) fn get(&self, sequence: i64) -> Option<T> {
        self.slots[self.index_of(sequence)].read().clone()
    }

    fn index_of(&self, sequence: i64) -> usize {
        (sequence & self.mask) as usize
    }

    fn has_capacity_for(&self, next: i64) -> bool {
        next - self.capacity as i64 <= self.minimum_gating_sequence()
    }

    fn publish(&self, sequence: i64, value: T) -> i64 {
        *self.slots[self.index_of(sequence)].write() = Some(value);
        self.cursor.set(sequence);
        trace!(sequence, "Slot published");
        sequence
    }
}

impl<T> RingBuffer<T> {
    /// Highest published sequence, `-1` before the first append.
    #[must_use]
    pub fn cursor(&self) -> i64 {
        self.cursor.get()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of registered consumer sequences.
    #[must_use]
    pub fn gating_sequence_count(&self) -> usize {
        self.gating_sequences.load().len()
    }

    /// Slowest registered consumer sequence, or the cursor when none is registered.
    #[must_use]
    pub fn minimum_gating_sequence(&self) -> i64 {
        let cursor = self.cursor.get();
        self.gating_sequences
            .load()
            .iter()
            .map(|sequence| sequence.get())
            .fold(cursor, i64::min)
    }

    /// Slots the publisher may still claim without waiting.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        let in_flight = self.cursor.get() - self.minimum_gating_sequence();
        self.capacity.saturating_sub(in_flight.max(0) as usize)
    }

    /// Register a new consumer sequence positioned at the current cursor.
    ///
    /// The consumer observes only batches published after registration.
    pub fn add_gating_sequence(&self) -> Arc<Sequence> {
        let sequence = Arc::new(Sequence::new(self.cursor.get()));
        self.gating_sequences.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&sequence));
            next
        });
        // The publisher may have advanced between creation and insertion.
        sequence.set(self.cursor.get());

        debug!(
            sequence = sequence.get(),
            consumers = self.gating_sequence_count(),
            "Consumer sequence registered"
        );
        sequence
    }

    /// Remove `sequence` from the gating set. Returns `false` if it was not present.
    ///
    /// Takes effect immediately and may unblock a waiting publisher.
    pub fn remove_gating_sequence(&self, sequence: &Arc<Sequence>) -> bool {
        let mut removed = false;
        self.gating_sequences.rcu(|current| {
            let next: Vec<Arc<Sequence>> = current
                .iter()
                .filter(|candidate| !Arc::ptr_eq(candidate, sequence))
                .cloned()
                .collect();
            removed = next.len() != current.len();
            next
        });

        if removed {
            debug!(
                sequence = sequence.get(),
                consumers = self.gating_sequence_count(),
                "Consumer sequence deregistered"
            );
        }
        removed
    }
}

/// The single writer of a [`RingBuffer`].
///
/// Not `Clone`: holding the publisher is what makes the caller the only
/// producer.
pub struct Publisher<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T: Clone> Publisher<T> {
    /// Publish `value` into the next slot, waiting while the slowest consumer
    /// is a full ring behind.
    ///
    /// Returns the sequence the value was published at.
    pub fn append(&mut self, value: T) -> i64 {
        let next = self.ring.cursor.get() + 1;

        if !self.ring.has_capacity_for(next) {
            debug!(
                sequence = next,
                slowest = self.ring.minimum_gating_sequence(),
                "Ring buffer full, waiting for consumers"
            );
            let backoff = Backoff::new();
            while !self.ring.has_capacity_for(next) {
                self.ring.wait_strategy.idle(&backoff);
            }
        }

        self.ring.publish(next, value)
    }

    /// Publish `value` only if a slot is free right now.
    ///
    /// # Errors
    ///
    /// `RingBufferError::InsufficientCapacity` if the slowest consumer is a
    /// full ring behind.
    pub fn try_append(&mut self, value: T) -> Result<i64, RingBufferError> {
        let next = self.ring.cursor.get() + 1;
        if !self.ring.has_capacity_for(next) {
            return Err(RingBufferError::InsufficientCapacity {
                cursor: next - 1,
                slowest: self.ring.minimum_gating_sequence(),
                capacity: self.ring.capacity,
            });
        }
        Ok(self.ring.publish(next, value))
    }

    /// The ring buffer this publisher writes to.
    #[must_use]
    pub fn ring(&self) -> &Arc<RingBuffer<T>> {
        &self.ring
    }
}
