//! # Subscribers
//!
//! The [`BlockItemHandler`] capability and the worker thread that drives it.
//!
//! Each subscriber gets its own [`Poller`] and its own OS thread. The thread
//! polls, hands every batch to the handler in order, and idles according to
//! the configured [`WaitStrategy`] when nothing new is published.
//!
//! Registration happens on the caller's thread, so a subscriber observes every
//! batch appended after `spawn_subscriber` returns.

use crate::batched::PollResult;
use crate::poller::{Poller, PollerError};
use crate::sequence::Sequence;
use crate::wait::WaitStrategy;
use crate::BlockItemRingBuffer;
use crossbeam_utils::Backoff;
use shared_types::BlockItemBatch;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Consumer of block item batches.
///
/// Invoked once per batch, in append order, on the subscriber's own thread.
/// A slow handler throttles the publisher once it falls a full ring behind.
pub trait BlockItemHandler: Send + 'static {
    fn handle_block_items_received(&mut self, batch: &BlockItemBatch);
}

impl<F> BlockItemHandler for F
where
    F: FnMut(&BlockItemBatch) + Send + 'static,
{
    fn handle_block_items_received(&mut self, batch: &BlockItemBatch) {
        self(batch)
    }
}

/// Errors starting a subscriber.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("Failed to create poller: {0}")]
    Poller(#[from] PollerError),

    #[error("Failed to spawn subscriber thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Register a consumer on `ring` and run `handler` on a dedicated thread.
///
/// # Errors
///
/// - `SubscriberError::Poller` if `batch_size` is zero
/// - `SubscriberError::Spawn` if the OS refuses the thread
pub fn spawn_subscriber<H: BlockItemHandler>(
    name: impl Into<String>,
    ring: &Arc<BlockItemRingBuffer>,
    batch_size: usize,
    wait_strategy: WaitStrategy,
    mut handler: H,
) -> Result<SubscriberHandle, SubscriberError> {
    let name = name.into();
    let mut poller = Poller::new(Arc::clone(ring), batch_size)?;
    let sequence = poller.sequence_handle();
    let stop = Arc::new(AtomicBool::new(false));

    let thread_stop = Arc::clone(&stop);
    let thread_name = name.clone();
    let thread = thread::Builder::new()
        .name(format!("bn-{name}"))
        .spawn(move || {
            debug!(subscriber = %thread_name, "Subscriber started");
            let backoff = Backoff::new();
            while !thread_stop.load(Ordering::Acquire) {
                match poller.poll() {
                    Ok(PollResult::Data(batch)) => {
                        if thread_stop.load(Ordering::Acquire) {
                            break;
                        }
                        handler.handle_block_items_received(&batch);
                        backoff.reset();
                    }
                    Ok(PollResult::NoData) => wait_strategy.idle(&backoff),
                    Err(e) => {
                        error!(subscriber = %thread_name, error = %e, "Poll failed, stopping subscriber");
                        break;
                    }
                }
            }
            debug!(
                subscriber = %thread_name,
                sequence = poller.sequence(),
                "Subscriber loop exited"
            );
        })?;

    info!(subscriber = %name, batch_size, "Subscriber registered");

    Ok(SubscriberHandle {
        name,
        ring: Arc::clone(ring),
        sequence,
        stop,
        thread: Some(thread),
    })
}

/// Owner of a running subscriber.
///
/// Dropping the handle stops the subscriber and deregisters it.
pub struct SubscriberHandle {
    name: String,
    ring: Arc<BlockItemRingBuffer>,
    sequence: Arc<Sequence>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SubscriberHandle {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highest sequence this subscriber has drained.
    #[must_use]
    pub fn sequence(&self) -> i64 {
        self.sequence.get()
    }

    /// Whether the worker thread has exited, either stopped or panicked.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the worker and deregister its consumer sequence. Idempotent.
    ///
    /// Deregistration happens before the join, so a publisher waiting on this
    /// subscriber is released even while the handler is still busy.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        self.ring.remove_gating_sequence(&self.sequence);

        if thread.join().is_err() {
            warn!(subscriber = %self.name, "Subscriber thread panicked");
        } else {
            info!(subscriber = %self.name, sequence = self.sequence(), "Subscriber stopped");
        }
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SubscriberHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberHandle")
            .field("name", &self.name)
            .field("sequence", &self.sequence.get())
            .field("finished", &self.is_finished())
            .finish()
    }
}
