//! # Test Utilities
//!
//! Builders for well-formed blocks. Enable with the `test-utils` feature flag.
//!
//! Proof signatures follow the deterministic fixture rule
//! `signature = SHA-384(block hash)` so that dummy verification succeeds.

use crate::entities::{
    BlockHeader, BlockItem, BlockItemBatch, BlockItemKind, BlockNumber, BlockProof,
};
use crate::hashing::{compute_block_hash, sha384};

/// Middle-of-block items generated per block.
pub const ITEMS_PER_BLOCK: usize = 8;

/// A block header item for `number`.
#[must_use]
pub fn header_item(number: BlockNumber) -> BlockItem {
    let header = BlockHeader {
        number,
        previous_block_hash: vec![0u8; 48],
        timestamp_secs: 1_700_000_000 + number,
    };
    match BlockItem::from_header(&header) {
        Ok(item) => item,
        Err(e) => panic!("fixture header must encode: {e}"),
    }
}

/// A proof item closing `number` with the given signature.
#[must_use]
pub fn proof_item(number: BlockNumber, block_signature: Vec<u8>) -> BlockItem {
    let proof = BlockProof {
        block: number,
        previous_block_root_hash: vec![0u8; 48],
        start_of_block_state_root_hash: vec![0u8; 48],
        block_signature,
    };
    match BlockItem::from_proof(&proof) {
        Ok(item) => item,
        Err(e) => panic!("fixture proof must encode: {e}"),
    }
}

/// A content item that is neither header nor proof.
#[must_use]
pub fn content_item(number: BlockNumber, index: usize) -> BlockItem {
    let kind = if index % 2 == 0 {
        BlockItemKind::EventTransaction
    } else {
        BlockItemKind::TransactionResult
    };
    let mut payload = number.to_le_bytes().to_vec();
    payload.extend_from_slice(&(index as u64).to_le_bytes());
    BlockItem::new(kind, payload)
}

/// Every item of block `number`: header, content items, signed proof.
#[must_use]
pub fn block_items(number: BlockNumber) -> Vec<BlockItem> {
    let mut items = Vec::with_capacity(ITEMS_PER_BLOCK + 2);
    items.push(header_item(number));
    items.extend((0..ITEMS_PER_BLOCK).map(|i| content_item(number, i)));
    let signature = sha384(&compute_block_hash(&items));
    items.push(proof_item(number, signature));
    items
}

/// One batch holding an entire block.
#[must_use]
pub fn block_batch(number: BlockNumber) -> BlockItemBatch {
    batch(block_items(number))
}

/// Freeze a non-empty vector into a batch.
#[must_use]
pub fn batch(items: Vec<BlockItem>) -> BlockItemBatch {
    match BlockItemBatch::new(items) {
        Ok(batch) => batch,
        Err(e) => panic!("fixture batch must not be empty: {e}"),
    }
}

/// Split the items of blocks `start..=end` into batches of at most `chunk` items.
#[must_use]
pub fn chunked_batches(start: BlockNumber, end: BlockNumber, chunk: usize) -> Vec<BlockItemBatch> {
    let items: Vec<BlockItem> = (start..=end).flat_map(block_items).collect();
    items
        .chunks(chunk.max(1))
        .map(|c| batch(c.to_vec()))
        .collect()
}
