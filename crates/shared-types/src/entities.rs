//! # Block Stream Entities
//!
//! - **Items**: [`BlockItem`], the unparsed protocol-level payload unit.
//! - **Framing**: [`BlockHeader`] opens a block, [`BlockProof`] closes it.
//! - **Grouping**: [`BlockItemBatch`] (one publisher append) and [`Block`]
//!   (one complete logical block).

use crate::errors::{EmptyBatchError, ItemParseError};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Monotonic number of a logical block in the stream.
pub type BlockNumber = u64;

/// Discriminates the payload carried by a [`BlockItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockItemKind {
    BlockHeader,
    EventHeader,
    EventTransaction,
    TransactionResult,
    TransactionOutput,
    StateChanges,
    BlockProof,
}

impl BlockItemKind {
    /// Stable one-byte tag used in the canonical item encoding.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            BlockItemKind::BlockHeader => 1,
            BlockItemKind::EventHeader => 2,
            BlockItemKind::EventTransaction => 3,
            BlockItemKind::TransactionResult => 4,
            BlockItemKind::TransactionOutput => 5,
            BlockItemKind::StateChanges => 6,
            BlockItemKind::BlockProof => 7,
        }
    }
}

/// An opaque, immutable block stream item.
///
/// The payload stays encoded; header and proof payloads are decoded on
/// demand with [`BlockItem::parse_block_header`] and
/// [`BlockItem::parse_block_proof`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockItem {
    kind: BlockItemKind,
    payload: Vec<u8>,
}

impl BlockItem {
    /// Wrap an already encoded payload.
    #[must_use]
    pub fn new(kind: BlockItemKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Encode a header into a block header item.
    pub fn from_header(header: &BlockHeader) -> Result<Self, ItemParseError> {
        let payload = bincode::serialize(header).map_err(|e| ItemParseError::Encode {
            kind: BlockItemKind::BlockHeader,
            message: e.to_string(),
        })?;
        Ok(Self::new(BlockItemKind::BlockHeader, payload))
    }

    /// Encode a proof into a block proof item.
    pub fn from_proof(proof: &BlockProof) -> Result<Self, ItemParseError> {
        let payload = bincode::serialize(proof).map_err(|e| ItemParseError::Encode {
            kind: BlockItemKind::BlockProof,
            message: e.to_string(),
        })?;
        Ok(Self::new(BlockItemKind::BlockProof, payload))
    }

    #[must_use]
    pub fn kind(&self) -> BlockItemKind {
        self.kind
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn is_block_header(&self) -> bool {
        self.kind == BlockItemKind::BlockHeader
    }

    #[must_use]
    pub fn is_block_proof(&self) -> bool {
        self.kind == BlockItemKind::BlockProof
    }

    /// Decode the header payload.
    ///
    /// # Errors
    ///
    /// - `ItemParseError::UnexpectedKind` if this item is not a block header
    /// - `ItemParseError::Malformed` if the payload does not decode
    pub fn parse_block_header(&self) -> Result<BlockHeader, ItemParseError> {
        self.decode(BlockItemKind::BlockHeader)
    }

    /// Decode the proof payload.
    ///
    /// # Errors
    ///
    /// Same as [`BlockItem::parse_block_header`].
    pub fn parse_block_proof(&self) -> Result<BlockProof, ItemParseError> {
        self.decode(BlockItemKind::BlockProof)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        &self,
        expected: BlockItemKind,
    ) -> Result<T, ItemParseError> {
        if self.kind != expected {
            return Err(ItemParseError::UnexpectedKind {
                expected,
                actual: self.kind,
            });
        }
        bincode::deserialize(&self.payload).map_err(|e| ItemParseError::Malformed {
            kind: expected,
            message: e.to_string(),
        })
    }
}

/// Opening marker of a logical block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Number of the block this header opens.
    pub number: BlockNumber,
    /// SHA-384 hash of the previous block.
    pub previous_block_hash: Vec<u8>,
    /// Consensus timestamp, seconds since epoch.
    pub timestamp_secs: u64,
}

/// Closing marker of a logical block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockProof {
    /// Number of the block this proof closes.
    pub block: BlockNumber,
    pub previous_block_root_hash: Vec<u8>,
    pub start_of_block_state_root_hash: Vec<u8>,
    /// Signature over the block hash.
    pub block_signature: Vec<u8>,
}

/// An ordered, immutable, non-empty group of items published in one append.
///
/// A batch may hold part of a block, one block, several blocks, or the tail
/// of one block followed by the head of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockItemBatch(Arc<[BlockItem]>);

impl BlockItemBatch {
    /// Freeze `items` into a shareable batch.
    ///
    /// # Errors
    ///
    /// Returns `EmptyBatchError` if `items` is empty.
    pub fn new(items: Vec<BlockItem>) -> Result<Self, EmptyBatchError> {
        if items.is_empty() {
            return Err(EmptyBatchError);
        }
        Ok(Self(items.into()))
    }

    /// First item. Batches are never empty.
    #[must_use]
    pub fn first_item(&self) -> &BlockItem {
        &self.0[0]
    }

    /// Last item. Batches are never empty.
    #[must_use]
    pub fn last_item(&self) -> &BlockItem {
        &self.0[self.0.len() - 1]
    }

    /// True when this batch and `other` share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for BlockItemBatch {
    type Target = [BlockItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<BlockItem>> for BlockItemBatch {
    type Error = EmptyBatchError;

    fn try_from(items: Vec<BlockItem>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

/// All items of one logical block, header first and proof last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

impl Block {
    #[must_use]
    pub fn new(items: Vec<BlockItem>) -> Self {
        Self { items }
    }

    /// Number from the leading header item, if there is one.
    pub fn number(&self) -> Option<Result<BlockNumber, ItemParseError>> {
        self.items
            .first()
            .filter(|item| item.is_block_header())
            .map(|item| item.parse_block_header().map(|h| h.number))
    }
}
