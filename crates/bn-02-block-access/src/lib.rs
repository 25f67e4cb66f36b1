//! # Block Access (bn-02)
//!
//! Serves single stored blocks by number. Availability is checked before any
//! read; storage failures never escape as errors, they become
//! `ReadBlockNotAvailable`.
//!
//! ## Crate Structure
//!
//! - `domain/` - request, response and status code
//! - `ports/` - `BlockAccessApi`
//! - `service.rs` - `BlockAccessService` over any `BlockReader`

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{BlockRequest, BlockResponse, BlockResponseCode};
pub use ports::BlockAccessApi;
pub use service::BlockAccessService;
