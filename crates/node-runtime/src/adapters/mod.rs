//! # Adapter Implementations
//!
//! Runtime-side components plugged around the ring buffer:
//!
//! ```text
//! StreamProducer ──append──→ RingBuffer ──poll──→ LiveStreamHandler ──mpsc──→ LiveStream
//! ```
//!
//! - `producer` - production and no-op producers
//! - `live_stream` - bounded async fan-out to live clients

pub mod live_stream;
pub mod producer;

pub use live_stream::{LiveStream, LiveStreamHandler};
pub use producer::{NoOpStreamProducer, ProducerError, RingBufferProducer, StreamProducer};
