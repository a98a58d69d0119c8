//! # Calla
//!
//! A disk-backed inverted index library using blocked sort-based
//! indexing (BSBI).
//!
//! ## Features
//!
//! - External construction: bounded in-memory sorted runs written as
//!   blocks, then k-way merged into one term-ordered index
//! - Compact binary shard format with corruption detection
//! - Boolean AND/OR/NOT queries over two interchangeable posting-list
//!   representations (sorted ID lists and bitsets)
//! - Pluggable storage backends
//!
//! Document conversion and tokenization are external collaborators: the
//! library consumes token streams and never extracts text itself.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use calla::storage::Storage;
//! use calla::storage::memory::MemoryStorage;
//! use calla::{IndexConfig, IndexWriter, QueryExpr, Token};
//!
//! # fn main() -> calla::Result<()> {
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let mut writer = IndexWriter::new(storage, IndexConfig::default());
//!
//! writer.add_document("texts/a.txt", vec![Token::new("hello"), Token::new("world")])?;
//! writer.add_document("texts/b.txt", vec![Token::new("hello")])?;
//!
//! let searcher = writer.commit()?;
//! let hits = searcher.search(&QueryExpr::term("world"))?;
//! assert_eq!(hits, vec!["texts/a.txt"]);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod dictionary;
mod error;
pub mod index;
pub mod postings;
pub mod query;
pub mod storage;

// Re-exports for the public API
pub use analysis::{DEFAULT_PUNCTUATION, Token, TokenFilter};
pub use dictionary::{DocDictionary, TermDictionary};
pub use error::{CallaError, Result};
pub use index::writer::IndexWriter;
pub use index::{IndexConfig, IndexMeta};
pub use postings::{PostingList, Representation};
pub use query::{QueryExpr, Searcher};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
