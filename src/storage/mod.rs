//! Storage abstraction for index files.
//!
//! All disk artifacts (block shards, final index shards, metadata) go
//! through the [`Storage`] trait, keyed by slash-separated file names such
//! as `blocks/block-0/shard-3`. Two backends are provided:
//!
//! - [`file::FileStorage`] for real on-disk indexes
//! - [`memory::MemoryStorage`] for tests

pub mod file;
pub mod memory;
pub mod structured;

use std::fmt::Debug;
use std::io::{Read, Write};

use crate::error::Result;

/// Input stream for reading a stored file.
pub trait StorageInput: Read + Send {
    /// Total size of the underlying file in bytes.
    fn size(&self) -> Result<u64>;
}

/// Output stream for writing a stored file.
pub trait StorageOutput: Write + Send {
    /// Flush buffered bytes and sync them to durable storage.
    fn flush_and_sync(&mut self) -> Result<()>;
}

/// Abstraction over the place index files live.
///
/// Implementations must be shareable across components via `Arc<dyn Storage>`.
pub trait Storage: Debug + Send + Sync {
    /// Open an existing file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create (or truncate) a file for writing.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check whether a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a file.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// List file names starting with the given prefix.
    fn list_files(&self, prefix: &str) -> Result<Vec<String>>;
}
