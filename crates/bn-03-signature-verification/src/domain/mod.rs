pub mod entities;
pub mod errors;

pub use entities::{VerificationResult, VerificationStatus};
pub use errors::KeyError;
