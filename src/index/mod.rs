//! Disk-resident inverted index construction.
//!
//! The build follows blocked sort-based indexing (BSBI):
//!
//! ```text
//! token stream ──▶ IndexWriter ──▶ BlockWriter ──▶ blocks/block-<n>/shard-<i>
//!                                                        │
//!                                  BlockMerger ◀─────────┘
//!                                        │
//!                                        ▼
//!                            index/shard-<i> + index/meta.json
//! ```
//!
//! Blocks are bounded sorted runs written during ingestion; the merger
//! combines them into one globally term-ordered final index.

pub mod block;
pub mod codec;
pub mod merge;
pub mod writer;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

use crate::error::Result;
use crate::postings::Representation;
use crate::storage::Storage;

/// File name of the index metadata, written last as the publish marker.
pub const META_FILE: &str = "index/meta.json";

/// Storage name of one block shard file.
pub fn block_shard_path(block: usize, shard: usize) -> String {
    format!("blocks/block-{block}/shard-{shard}")
}

/// Storage name of one final index shard file.
pub fn index_shard_path(shard: u32) -> String {
    format!("index/shard-{shard}")
}

/// A `(term_id, doc_id)` pair, the atomic unit processed during indexing.
///
/// Records only exist inside an in-memory block buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub term_id: i32,
    pub doc_id: i32,
}

/// One inverted index entry: a term and its posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingEntry {
    pub term_id: i32,
    /// Doc IDs containing the term. Duplicates may occur in block files
    /// (a term repeated within one document); the final index is
    /// duplicate-free and sorted ascending.
    pub postings: Vec<i32>,
}

impl PostingEntry {
    /// Create an entry for a term with no postings yet.
    pub fn new(term_id: i32) -> Self {
        PostingEntry {
            term_id,
            postings: Vec::new(),
        }
    }
}

/// A bounded, term-ordered sequence of index entries: the unit of disk I/O.
///
/// Within one shard, entries are sorted ascending by `term_id` and no
/// `term_id` appears twice. Shard boundaries never split an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shard {
    pub entries: Vec<PostingEntry>,
}

impl Shard {
    /// Number of entries in the shard.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the shard holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build and query configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Maximum records buffered before a block is flushed to disk.
    pub block_capacity: usize,
    /// Maximum entries per shard, for blocks and the final index alike.
    pub shard_capacity: usize,
    /// Posting-list representation used when answering queries.
    pub representation: Representation,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            block_capacity: 10_000,
            shard_capacity: 1_000,
            representation: Representation::SortedList,
        }
    }
}

/// Metadata describing a published final index.
///
/// Written to [`META_FILE`] only after every final shard is on disk, so
/// its presence marks a complete index; an aborted build leaves no
/// metadata and the partial output is never promoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Number of `index/shard-<i>` files.
    pub shard_count: u32,
    /// Total number of documents, the closed doc-ID universe.
    pub doc_count: u32,
}

impl IndexMeta {
    /// Write the metadata as JSON, flushed and synced.
    pub fn write(&self, storage: &Arc<dyn Storage>) -> Result<()> {
        let mut output = storage.create_output(META_FILE)?;
        serde_json::to_writer(&mut output, self)?;
        output.flush_and_sync()?;
        Ok(())
    }

    /// Read the metadata of a published index.
    pub fn read(storage: &Arc<dyn Storage>) -> Result<Self> {
        let mut input = storage.open_input(META_FILE)?;
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
