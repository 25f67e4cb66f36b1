//! # Batched Data
//!
//! Bounded staging buffer holding the values drained in one poll cycle and
//! serving them one at a time.
//!
//! Counters satisfy `0 <= cursor <= msg_high_bound <= capacity` and are reset
//! to `(0, 0)` as soon as the buffer is fully drained.

use thiserror::Error;

/// Outcome of a poll: a value, or nothing available yet.
///
/// `NoData` is not a failure; callers retry later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult<T> {
    Data(T),
    NoData,
}

impl<T> PollResult<T> {
    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self, PollResult::Data(_))
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            PollResult::Data(value) => Some(value),
            PollResult::NoData => None,
        }
    }
}

/// Contract violations of the staging buffer.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BatchedDataError {
    /// A value was added past capacity. Indicates a drain loop bug.
    #[error("Attempting to add item to full batch (capacity {capacity})")]
    Full { capacity: usize },

    #[error("Batch capacity must be greater than zero")]
    ZeroCapacity,
}

/// Per-poller staging buffer.
#[derive(Debug)]
pub struct BatchedData<T> {
    data: Box<[Option<T>]>,
    capacity: usize,
    msg_high_bound: usize,
    cursor: usize,
}

impl<T> BatchedData<T> {
    /// # Errors
    ///
    /// `BatchedDataError::ZeroCapacity` if `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self, BatchedDataError> {
        if capacity == 0 {
            return Err(BatchedDataError::ZeroCapacity);
        }
        Ok(Self {
            data: (0..capacity).map(|_| None).collect(),
            capacity,
            msg_high_bound: 0,
            cursor: 0,
        })
    }

    /// Values added but not yet served.
    #[must_use]
    pub fn count(&self) -> usize {
        self.msg_high_bound - self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.msg_high_bound >= self.capacity
    }

    /// `(cursor, msg_high_bound)`.
    #[must_use]
    pub fn counters(&self) -> (usize, usize) {
        (self.cursor, self.msg_high_bound)
    }

    /// Append `item`. Returns whether there is room for another.
    ///
    /// # Errors
    ///
    /// `BatchedDataError::Full` if called at capacity; the item is not stored.
    pub fn add_data_item(&mut self, item: T) -> Result<bool, BatchedDataError> {
        if self.msg_high_bound >= self.capacity {
            return Err(BatchedDataError::Full {
                capacity: self.capacity,
            });
        }
        self.data[self.msg_high_bound] = Some(item);
        self.msg_high_bound += 1;
        Ok(self.msg_high_bound < self.capacity)
    }

    /// Serve the next value in insertion order.
    pub fn poll_message(&mut self) -> PollResult<T> {
        let mut result = PollResult::NoData;
        if self.cursor < self.msg_high_bound {
            if let Some(item) = self.data[self.cursor].take() {
                result = PollResult::Data(item);
            }
            self.cursor += 1;
        }
        if self.cursor > 0 && self.cursor >= self.msg_high_bound {
            self.clear_count();
        }
        result
    }

    fn clear_count(&mut self) {
        self.msg_high_bound = 0;
        self.cursor = 0;
    }
}
