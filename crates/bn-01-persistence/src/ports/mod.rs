//! # Ports Layer
//!
//! Driven ports of the persistence collaborator.

pub mod outbound;

pub use outbound::{BlockReader, BlockWriter};
