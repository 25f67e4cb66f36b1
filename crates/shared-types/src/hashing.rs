//! # Block Hashing
//!
//! SHA-384 over the canonical encoding of a block's items.
//!
//! Canonical item encoding: `[kind tag: u8][payload length: u64 LE][payload]`.
//! Block proof items are excluded; the proof carries the signature over the
//! resulting hash.

use crate::entities::BlockItem;
use sha2::{Digest, Sha384};

/// Length of a SHA-384 digest in bytes.
pub const HASH_LENGTH: usize = 48;

/// SHA-384 digest of `data`.
#[must_use]
pub fn sha384(data: &[u8]) -> Vec<u8> {
    Sha384::digest(data).to_vec()
}

/// Incremental block hash, fed one item at a time.
#[derive(Clone, Default)]
pub struct BlockHasher {
    inner: Sha384,
    items: usize,
}

impl BlockHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one item. Proof items are ignored.
    pub fn update(&mut self, item: &BlockItem) {
        if item.is_block_proof() {
            return;
        }
        self.inner.update([item.kind().tag()]);
        self.inner.update((item.payload().len() as u64).to_le_bytes());
        self.inner.update(item.payload());
        self.items += 1;
    }

    /// Number of items hashed so far.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items
    }

    #[must_use]
    pub fn finalize(self) -> Vec<u8> {
        self.inner.finalize().to_vec()
    }
}

/// Hash of a complete sequence of block items.
#[must_use]
pub fn compute_block_hash(items: &[BlockItem]) -> Vec<u8> {
    let mut hasher = BlockHasher::new();
    for item in items {
        hasher.update(item);
    }
    hasher.finalize()
}
