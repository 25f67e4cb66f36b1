//! # Verification Subscriber
//!
//! Walks every item of every batch, hashes each block from header to proof,
//! and checks the proof signature with the configured [`SignatureVerifier`].
//!
//! Batches may split blocks anywhere or carry several blocks; state is kept
//! per item, not per batch. Items seen before the first header (a subscriber
//! joining mid-block) are skipped.

use crate::domain::entities::{VerificationResult, VerificationStatus};
use crate::ports::SignatureVerifier;
use shared_bus::BlockItemHandler;
use shared_types::{BlockHasher, BlockItem, BlockItemBatch, BlockNumber};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Block currently being hashed.
struct BlockSession {
    block_number: BlockNumber,
    hasher: BlockHasher,
}

pub struct VerificationHandler<V> {
    verifier: V,
    results: mpsc::UnboundedSender<VerificationResult>,
    session: Option<BlockSession>,
}

impl<V: SignatureVerifier> VerificationHandler<V> {
    pub fn new(verifier: V, results: mpsc::UnboundedSender<VerificationResult>) -> Self {
        Self {
            verifier,
            results,
            session: None,
        }
    }

    /// Number of the block being hashed, if any.
    #[must_use]
    pub fn current_block(&self) -> Option<BlockNumber> {
        self.session.as_ref().map(|s| s.block_number)
    }

    fn on_item(&mut self, item: &BlockItem) {
        if item.is_block_header() {
            self.open_block(item);
        }

        let Some(session) = self.session.as_mut() else {
            trace!(kind = ?item.kind(), "Skipping item outside of a block");
            return;
        };
        session.hasher.update(item);

        if item.is_block_proof() {
            if let Some(session) = self.session.take() {
                self.close_block(session, item);
            }
        }
    }

    fn open_block(&mut self, header: &BlockItem) {
        if let Some(unfinished) = self.session.take() {
            warn!(
                block_number = unfinished.block_number,
                items = unfinished.hasher.item_count(),
                "Header before proof, dropping unfinished block"
            );
        }

        match header.parse_block_header() {
            Ok(parsed) => {
                self.session = Some(BlockSession {
                    block_number: parsed.number,
                    hasher: BlockHasher::new(),
                });
            }
            Err(e) => warn!(error = %e, "Unreadable block header, skipping block"),
        }
    }

    fn close_block(&self, session: BlockSession, proof: &BlockItem) {
        let block_number = session.block_number;
        let block_hash = session.hasher.finalize();

        let status = match proof.parse_block_proof() {
            Ok(parsed) if self.verifier.verify_signature(&block_hash, &parsed.block_signature) => {
                VerificationStatus::Verified
            }
            Ok(_) => VerificationStatus::SignatureInvalid,
            Err(e) => {
                warn!(block_number, error = %e, "Unreadable block proof");
                VerificationStatus::ProofUnreadable
            }
        };

        match status {
            VerificationStatus::Verified => debug!(block_number, "Block verified"),
            _ => warn!(block_number, ?status, "Block failed verification"),
        }

        let result = VerificationResult {
            block_number,
            block_hash,
            status,
        };
        if self.results.send(result).is_err() {
            debug!(block_number, "Verification result receiver dropped");
        }
    }
}

impl<V: SignatureVerifier> BlockItemHandler for VerificationHandler<V> {
    fn handle_block_items_received(&mut self, batch: &BlockItemBatch) {
        for item in batch.iter() {
            self.on_item(item);
        }
    }
}
