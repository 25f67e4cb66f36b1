use serde::{Deserialize, Serialize};
use shared_types::BlockNumber;

/// Verdict for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// The proof signature matches the block hash.
    Verified,
    /// The proof signature does not match the block hash.
    SignatureInvalid,
    /// The proof item did not decode.
    ProofUnreadable,
}

/// Emitted once per block whose header and proof were both observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub block_number: BlockNumber,
    /// SHA-384 block hash.
    pub block_hash: Vec<u8>,
    pub status: VerificationStatus,
}

impl VerificationResult {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}
