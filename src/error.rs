//! Error types for the calla library.

use thiserror::Error;

/// Result type alias for calla operations.
pub type Result<T> = std::result::Result<T, CallaError>;

/// Errors produced while building or querying an index.
#[derive(Error, Debug)]
pub enum CallaError {
    /// I/O failure on a block or index file. Fatal for the current build
    /// or query; storage errors are assumed non-transient.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A shard declared a length that does not match the bytes on disk.
    #[error("corrupt shard: {0}")]
    CorruptShard(String),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Index construction or query failure.
    #[error("index error: {0}")]
    Index(String),

    /// Metadata serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CallaError {
    /// Create a corrupt shard error.
    pub fn corrupt_shard<S: Into<String>>(message: S) -> Self {
        CallaError::CorruptShard(message.into())
    }

    /// Create a storage error.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        CallaError::Storage(message.into())
    }

    /// Create an index error.
    pub fn index<S: Into<String>>(message: S) -> Self {
        CallaError::Index(message.into())
    }
}
