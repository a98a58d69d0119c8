//! k-way merge of block shards into the final index.
//!
//! Each block is a term-sorted, non-overlapping sequence of shards; the
//! merger walks all blocks in parallel with one owned cursor per block,
//! holding a single decoded shard per block in memory. Peak memory is
//! therefore bounded by `blocks × shard_capacity` entries. Postings for
//! equal terms are unioned and deduplicated, so a term is emitted exactly
//! once across the whole final index.

use std::sync::Arc;

use log::{debug, info};

use crate::error::Result;
use crate::index::codec;
use crate::index::{PostingEntry, Shard, block_shard_path, index_shard_path};
use crate::storage::Storage;

/// Read cursor over one block's shard sequence.
///
/// Owns the currently decoded shard plus an entry index into it; nothing
/// aliases into another block's buffer.
#[derive(Debug)]
struct BlockCursor {
    block: usize,
    shard: Shard,
    entry_idx: usize,
    next_shard: usize,
    shards_remaining: usize,
    finished: bool,
}

impl BlockCursor {
    fn new(block: usize, shard_count: usize) -> Self {
        BlockCursor {
            block,
            shard: Shard::default(),
            entry_idx: 0,
            next_shard: 0,
            shards_remaining: shard_count,
            finished: shard_count == 0,
        }
    }

    /// Load shard files until the cursor sits on an unread entry; mark
    /// the block finished when none remain. Loops past empty shards so
    /// an exhausted-looking cursor never hides unread entries.
    fn refill(&mut self, storage: &Arc<dyn Storage>) -> Result<()> {
        while !self.finished && self.entry_idx >= self.shard.entries.len() {
            if self.shards_remaining == 0 {
                self.finished = true;
                break;
            }
            let name = block_shard_path(self.block, self.next_shard);
            self.shard = codec::read_shard_file(storage, &name)?;
            self.next_shard += 1;
            self.shards_remaining -= 1;
            self.entry_idx = 0;
        }
        Ok(())
    }

    /// The entry under the cursor, if any.
    fn current(&self) -> Option<&PostingEntry> {
        if self.finished {
            return None;
        }
        self.shard.entries.get(self.entry_idx)
    }
}

/// Merger producing the final index from all on-disk blocks.
#[derive(Debug)]
pub struct BlockMerger {
    storage: Arc<dyn Storage>,
    shard_capacity: usize,
}

impl BlockMerger {
    /// Create a merger writing final shards of at most `shard_capacity`
    /// entries.
    pub fn new(storage: Arc<dyn Storage>, shard_capacity: usize) -> Self {
        BlockMerger {
            storage,
            shard_capacity: shard_capacity.max(1),
        }
    }

    /// Merge all blocks into `index/shard-<i>` files and return how many
    /// final shards were written.
    ///
    /// `shard_counts[b]` is the number of shard files block `b` produced.
    /// The merge terminates exactly when every block's shards have been
    /// consumed; the last partially filled output shard is flushed even
    /// if not at capacity.
    pub fn merge(&self, shard_counts: &[usize]) -> Result<u32> {
        let mut cursors: Vec<BlockCursor> = shard_counts
            .iter()
            .enumerate()
            .map(|(block, &count)| BlockCursor::new(block, count))
            .collect();

        let mut out_shard = Shard::default();
        let mut shards_written: u32 = 0;

        loop {
            for cursor in &mut cursors {
                cursor.refill(&self.storage)?;
            }

            // Smallest term under any cursor; ties across blocks are all
            // consumed in this same step.
            let Some(min_term_id) = cursors
                .iter()
                .filter_map(|c| c.current())
                .map(|e| e.term_id)
                .min()
            else {
                break;
            };

            let mut postings: Vec<i32> = Vec::new();
            for cursor in &mut cursors {
                if let Some(entry) = cursor.current()
                    && entry.term_id == min_term_id
                {
                    postings.extend_from_slice(&entry.postings);
                    cursor.entry_idx += 1;
                }
            }
            postings.sort_unstable();
            postings.dedup();

            out_shard.entries.push(PostingEntry {
                term_id: min_term_id,
                postings,
            });

            if out_shard.len() >= self.shard_capacity {
                self.write_final_shard(shards_written, &out_shard)?;
                shards_written += 1;
                out_shard = Shard::default();
            }
        }

        if !out_shard.is_empty() {
            self.write_final_shard(shards_written, &out_shard)?;
            shards_written += 1;
        }

        info!(
            "merged {} blocks into {} index shards",
            shard_counts.len(),
            shards_written
        );
        Ok(shards_written)
    }

    fn write_final_shard(&self, index: u32, shard: &Shard) -> Result<()> {
        debug!("index shard {index}: {} entries", shard.len());
        codec::write_shard_file(&self.storage, &index_shard_path(index), shard)
    }
}
