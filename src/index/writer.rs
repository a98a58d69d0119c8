//! Index construction orchestration.
//!
//! [`IndexWriter`] ties the pipeline together: it assigns dictionary IDs
//! for incoming documents and tokens, feeds records to the block writer,
//! and on [`commit`](IndexWriter::commit) merges all blocks into the
//! final index, publishes the metadata and hands back a read-only
//! [`Searcher`]. Construction is single-writer and sequential; flushing
//! a block blocks ingestion.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::{Token, TokenFilter};
use crate::dictionary::{DocDictionary, TermDictionary};
use crate::error::Result;
use crate::index::block::BlockWriter;
use crate::index::merge::BlockMerger;
use crate::index::{IndexConfig, IndexMeta, Record};
use crate::query::Searcher;
use crate::storage::Storage;

/// Writer building a disk-resident inverted index from token streams.
pub struct IndexWriter {
    storage: Arc<dyn Storage>,
    config: IndexConfig,
    filter: TokenFilter,
    terms: TermDictionary,
    docs: DocDictionary,
    blocks: BlockWriter,
}

impl IndexWriter {
    /// Create an index writer with the default punctuation filter.
    pub fn new(storage: Arc<dyn Storage>, config: IndexConfig) -> Self {
        IndexWriter::with_filter(storage, config, TokenFilter::default())
    }

    /// Create an index writer with a custom token filter.
    pub fn with_filter(
        storage: Arc<dyn Storage>,
        config: IndexConfig,
        filter: TokenFilter,
    ) -> Self {
        let blocks = BlockWriter::new(storage.clone(), &config);
        IndexWriter {
            storage,
            config,
            filter,
            terms: TermDictionary::new(),
            docs: DocDictionary::new(),
            blocks,
        }
    }

    /// Index one document's token stream.
    ///
    /// The document is identified by its source path and assigned the
    /// next doc ID on first sight. Tokenization happens outside; this
    /// only filters punctuation and assigns term IDs.
    pub fn add_document<I>(&mut self, path: &str, tokens: I) -> Result<i32>
    where
        I: IntoIterator<Item = Token>,
    {
        let doc_id = self.docs.assign(path);

        let mut indexed = 0usize;
        for token in tokens {
            if !self.filter.accept(&token) {
                continue;
            }
            let term_id = self.terms.assign(&token.text);
            self.blocks.push(Record { term_id, doc_id })?;
            indexed += 1;
        }

        debug!("{path}: indexed {indexed} tokens");
        Ok(doc_id)
    }

    /// Number of documents seen so far.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    /// Number of distinct terms seen so far.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Flush the tail block, merge all blocks into the final index,
    /// publish the metadata and return a searcher over the result.
    ///
    /// Any I/O or codec failure aborts the build; the metadata publish
    /// marker is written last, so a failed build never yields a
    /// queryable index.
    pub fn commit(self) -> Result<Searcher> {
        let doc_count = self.docs.len() as u32;
        let term_count = self.terms.len();

        let shard_counts = self.blocks.finish()?;
        info!(
            "indexed {doc_count} documents, {term_count} terms, {} blocks",
            shard_counts.len()
        );

        let merger = BlockMerger::new(self.storage.clone(), self.config.shard_capacity);
        let shard_count = merger.merge(&shard_counts)?;

        let meta = IndexMeta {
            shard_count,
            doc_count,
        };
        meta.write(&self.storage)?;

        Ok(Searcher::new(
            self.storage,
            meta,
            self.terms,
            self.docs,
            self.config.representation,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    fn tokens(text: &str) -> Vec<Token> {
        text.split_whitespace().map(Token::new).collect()
    }

    #[test]
    fn test_build_and_query() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut writer = IndexWriter::new(storage, IndexConfig::default());

        writer.add_document("d0", tokens("rust index . rust")).unwrap();
        writer.add_document("d1", tokens("merge index !")).unwrap();
        assert_eq!(writer.doc_count(), 2);
        // Punctuation never reaches the dictionary.
        assert_eq!(writer.term_count(), 3);

        let searcher = writer.commit().unwrap();
        assert_eq!(searcher.doc_count(), 2);
        assert_eq!(searcher.lookup("rust").unwrap().to_doc_ids(), vec![0]);
        assert_eq!(searcher.lookup("index").unwrap().to_doc_ids(), vec![0, 1]);
        assert_eq!(searcher.lookup(".").unwrap().to_doc_ids(), Vec::<i32>::new());
    }

    #[test]
    fn test_small_blocks_merge_correctly() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let config = IndexConfig {
            block_capacity: 3, // force many tiny blocks
            shard_capacity: 2,
            ..IndexConfig::default()
        };
        let mut writer = IndexWriter::new(storage, config);

        writer.add_document("d0", tokens("a b c d e")).unwrap();
        writer.add_document("d1", tokens("c d e f g")).unwrap();
        writer.add_document("d2", tokens("a g")).unwrap();

        let searcher = writer.commit().unwrap();
        assert_eq!(searcher.lookup("a").unwrap().to_doc_ids(), vec![0, 2]);
        assert_eq!(searcher.lookup("c").unwrap().to_doc_ids(), vec![0, 1]);
        assert_eq!(searcher.lookup("g").unwrap().to_doc_ids(), vec![1, 2]);
    }

    #[test]
    fn test_empty_corpus_commits_empty_index() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let writer = IndexWriter::new(storage, IndexConfig::default());

        let searcher = writer.commit().unwrap();
        assert_eq!(searcher.doc_count(), 0);
        assert!(searcher.lookup("anything").unwrap().is_empty());
    }
}
