//! Block-as-file storage: one bincode encoded [`Block`] per file, named
//! `<number>.blk` under a root directory.

use crate::domain::boundary::BlockBoundary;
use crate::domain::errors::PersistenceError;
use crate::ports::outbound::{BlockReader, BlockWriter};
use shared_types::{Block, BlockItem, BlockItemBatch, BlockNumber};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension of stored block files.
pub const BLOCK_FILE_EXTENSION: &str = "blk";

/// Path of the file holding block `number`.
#[must_use]
pub fn block_path(root: &Path, number: BlockNumber) -> PathBuf {
    root.join(format!("{number}.{BLOCK_FILE_EXTENSION}"))
}

/// Writer that accumulates the items of the current block and stores the
/// block once its proof arrives.
///
/// Items are split on their own headers and proofs, so a batch may carry
/// several blocks or the tail of one block and the head of the next. The
/// returned number still follows [`BlockBoundary`].
#[derive(Debug)]
pub struct BlockAsFileWriter {
    root: PathBuf,
    boundary: BlockBoundary,
    pending: Vec<BlockItem>,
    pending_number: Option<BlockNumber>,
}

impl BlockAsFileWriter {
    /// Create the writer, creating `root` if needed.
    ///
    /// # Errors
    ///
    /// `PersistenceError::Io` if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!(root = %root.display(), "Block file writer ready");
        Ok(Self {
            root,
            boundary: BlockBoundary::new(),
            pending: Vec::new(),
            pending_number: None,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Items of the block still being received.
    #[must_use]
    pub fn pending_items(&self) -> usize {
        self.pending.len()
    }

    fn open(&mut self, number: BlockNumber) {
        if let Some(unterminated) = self.pending_number {
            warn!(
                block_number = unterminated,
                discarded = self.pending.len(),
                "Discarding unterminated block"
            );
        }
        self.pending.clear();
        self.pending_number = Some(number);
    }

    fn close(&mut self) -> Result<(), PersistenceError> {
        let Some(number) = self.pending_number.take() else {
            return Ok(());
        };
        let block = Block::new(std::mem::take(&mut self.pending));
        self.persist(number, &block)
    }

    fn persist(&self, number: BlockNumber, block: &Block) -> Result<(), PersistenceError> {
        let bytes = bincode::serialize(block).map_err(|e| PersistenceError::Encode {
            block_number: number,
            message: e.to_string(),
        })?;

        let path = block_path(&self.root, number);
        let temp_path = path.with_extension(format!("{BLOCK_FILE_EXTENSION}.tmp"));
        write_synced(&temp_path, &bytes)?;
        fs::rename(&temp_path, &path)?;

        debug!(
            block_number = number,
            items = block.items.len(),
            bytes = bytes.len(),
            "Block written"
        );
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl BlockWriter for BlockAsFileWriter {
    fn write(&mut self, batch: &BlockItemBatch) -> Result<Option<BlockNumber>, PersistenceError> {
        let reported = self.boundary.observe(batch)?;

        let mut skipped = 0usize;
        for item in batch.iter() {
            if item.is_block_header() {
                self.open(item.parse_block_header()?.number);
            } else if self.pending_number.is_none() {
                skipped += 1;
                continue;
            }
            self.pending.push(item.clone());
            if item.is_block_proof() {
                self.close()?;
            }
        }
        if skipped > 0 {
            debug!(skipped, "Items outside any block skipped");
        }

        Ok(reported)
    }
}

/// Reader over the files produced by [`BlockAsFileWriter`].
#[derive(Debug, Clone)]
pub struct BlockAsFileReader {
    root: PathBuf,
}

impl BlockAsFileReader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlockReader for BlockAsFileReader {
    fn read(&self, number: BlockNumber) -> Result<Option<Block>, PersistenceError> {
        let path = block_path(&self.root, number);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let block: Block = bincode::deserialize(&bytes).map_err(|e| PersistenceError::Parse {
            block_number: number,
            message: e.to_string(),
        })?;

        match block.number() {
            Some(Ok(stored)) if stored == number => Ok(Some(block)),
            Some(Ok(stored)) => Err(PersistenceError::Parse {
                block_number: number,
                message: format!("file holds block {stored}"),
            }),
            Some(Err(e)) => Err(PersistenceError::Parse {
                block_number: number,
                message: e.to_string(),
            }),
            None => Err(PersistenceError::Parse {
                block_number: number,
                message: "missing block header".to_string(),
            }),
        }
    }
}
