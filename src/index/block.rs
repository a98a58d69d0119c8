//! Block construction: bounded sorted runs written to disk.
//!
//! [`BlockWriter`] buffers `(term_id, doc_id)` records up to the block
//! capacity, then sorts the buffer by term, groups equal-term runs into
//! index entries, cuts the entries into shards and writes each shard to
//! `blocks/block-<n>/shard-<i>`. Each block's shards are globally
//! term-ordered and no term spans two entries of one block, which is what
//! the merge phase relies on.
//!
//! Stale `blocks/` directories from an aborted earlier build can corrupt
//! the next one; clearing them is a deployment responsibility, not the
//! writer's.

use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::index::codec;
use crate::index::{IndexConfig, PostingEntry, Record, Shard, block_shard_path};
use crate::storage::Storage;

/// Writer producing on-disk blocks from a record stream.
#[derive(Debug)]
pub struct BlockWriter {
    storage: Arc<dyn Storage>,
    block_capacity: usize,
    shard_capacity: usize,
    records: Vec<Record>,
    /// Shard count of every block written so far, in block order. The
    /// merge phase needs these to know how many files to expect.
    shard_counts: Vec<usize>,
}

impl BlockWriter {
    /// Create a block writer.
    pub fn new(storage: Arc<dyn Storage>, config: &IndexConfig) -> Self {
        BlockWriter {
            storage,
            block_capacity: config.block_capacity.max(1),
            shard_capacity: config.shard_capacity.max(1),
            records: Vec::with_capacity(config.block_capacity.clamp(1, 16_384)),
            shard_counts: Vec::new(),
        }
    }

    /// Buffer one record, flushing a full block to disk.
    pub fn push(&mut self, record: Record) -> Result<()> {
        self.records.push(record);
        if self.records.len() >= self.block_capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Flush the partial tail block and return the shard count of every
    /// block written. No buffered record is dropped; an empty buffer
    /// produces no block.
    pub fn finish(mut self) -> Result<Vec<usize>> {
        if !self.records.is_empty() {
            self.flush()?;
        }
        Ok(self.shard_counts)
    }

    /// Number of blocks written so far.
    pub fn blocks_written(&self) -> usize {
        self.shard_counts.len()
    }

    fn flush(&mut self) -> Result<()> {
        let block = self.shard_counts.len();

        // Stable sort keeps arrival order within a term.
        self.records.sort_by_key(|r| r.term_id);

        let mut shards: Vec<Shard> = vec![Shard::default()];
        for record in self.records.drain(..) {
            if let Some(entry) = shards.last_mut().unwrap().entries.last_mut()
                && entry.term_id == record.term_id
            {
                entry.postings.push(record.doc_id);
                continue;
            }

            // New term: cut a shard when the current one is at capacity,
            // so an entry never splits across shards.
            if shards.last().unwrap().len() >= self.shard_capacity {
                shards.push(Shard::default());
            }
            let mut entry = PostingEntry::new(record.term_id);
            entry.postings.push(record.doc_id);
            shards.last_mut().unwrap().entries.push(entry);
        }

        for (i, shard) in shards.iter().enumerate() {
            codec::write_shard_file(&self.storage, &block_shard_path(block, i), shard)?;
        }

        debug!("block {block}: wrote {} shards", shards.len());
        self.shard_counts.push(shards.len());
        Ok(())
    }
}
