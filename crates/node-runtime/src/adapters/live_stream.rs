//! # Live Streams
//!
//! Bridges a ring buffer subscriber thread to an async client through a
//! bounded channel. A client that stops reading fills its channel, which
//! stalls its own subscriber and, after a full ring, the publisher.

use shared_bus::{BlockItemHandler, SubscriberHandle};
use shared_types::BlockItemBatch;
use tokio::sync::mpsc;
use tracing::debug;

/// Subscriber side of a live stream.
pub struct LiveStreamHandler {
    name: String,
    sender: mpsc::Sender<BlockItemBatch>,
    disconnected: bool,
}

impl LiveStreamHandler {
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<BlockItemBatch>) -> Self {
        Self {
            name: name.into(),
            sender,
            disconnected: false,
        }
    }
}

impl BlockItemHandler for LiveStreamHandler {
    fn handle_block_items_received(&mut self, batch: &BlockItemBatch) {
        if self.disconnected {
            return;
        }
        // Runs on the subscriber's own OS thread, never inside the runtime.
        if self.sender.blocking_send(batch.clone()).is_err() {
            self.disconnected = true;
            debug!(stream = %self.name, "Live stream client disconnected");
        }
    }
}

/// Client side of a live stream.
///
/// Dropping it closes the channel first and then stops the subscriber.
pub struct LiveStream {
    receiver: mpsc::Receiver<BlockItemBatch>,
    handle: SubscriberHandle,
}

impl LiveStream {
    pub fn new(receiver: mpsc::Receiver<BlockItemBatch>, handle: SubscriberHandle) -> Self {
        Self { receiver, handle }
    }

    /// Next batch, or `None` once the subscriber is gone.
    pub async fn recv(&mut self) -> Option<BlockItemBatch> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<BlockItemBatch> {
        self.receiver.try_recv().ok()
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Highest sequence drained by the subscriber.
    pub fn sequence(&self) -> i64 {
        self.handle.sequence()
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        // Wake a subscriber blocked on a full channel before joining it.
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
        self.handle.stop();
    }
}
