//! # Adapters Module
//!
//! - `noop` - boundary-only writer and empty reader
//! - `file` - one file per completed block

pub mod file;
pub mod noop;

pub use file::{block_path, BlockAsFileReader, BlockAsFileWriter, BLOCK_FILE_EXTENSION};
pub use noop::{NoOpBlockReader, NoOpBlockWriter};
