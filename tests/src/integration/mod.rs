//! # Integration Tests
//!
//! - `flows` - publish → ring buffer → persistence / verification / live
//!   streams → block access
//! - `backpressure` - slow and departing subscribers, persistence failure

mod backpressure;
mod flows;
