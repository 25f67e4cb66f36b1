//! # Domain Layer
//!
//! - `boundary` - block completion detection
//! - `errors` - persistence failures

pub mod boundary;
pub mod errors;

pub use boundary::BlockBoundary;
pub use errors::PersistenceError;
