//! # Sequences
//!
//! Monotonic logical positions in the ring buffer. Physical slot index is
//! `sequence & (capacity - 1)`.

use crossbeam_utils::CachePadded;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Value of a cursor before anything was published or consumed.
pub const INITIAL_CURSOR_VALUE: i64 = -1;

/// Cache-line padded atomic sequence counter.
///
/// Used both as the ring buffer cursor (highest published sequence) and as a
/// consumer sequence (highest fully consumed sequence).
pub struct Sequence {
    value: CachePadded<AtomicI64>,
}

impl Sequence {
    #[must_use]
    pub fn new(initial: i64) -> Self {
        Self {
            value: CachePadded::new(AtomicI64::new(initial)),
        }
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(INITIAL_CURSOR_VALUE)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sequence").field(&self.get()).finish()
    }
}
