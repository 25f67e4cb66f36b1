//! # Node Runtime Library
//!
//! Wiring of the block node distribution core. The binary entry point is
//! `main.rs`.
//!
//! - `container` - configuration, variant selection, component ownership
//! - `adapters` - producers and live-stream subscribers

#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod container;

pub use adapters::{LiveStream, NoOpStreamProducer, ProducerError, RingBufferProducer, StreamProducer};
pub use container::{BlockNodeContainer, ConfigError, NodeConfig};
