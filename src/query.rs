//! Boolean term queries against a published index.
//!
//! A [`Searcher`] resolves term leaves by scanning final-index shards in
//! order and combines them with the posting-list algebra. An unknown term
//! is an empty result, never an error; I/O or corruption failures fail
//! the query and are surfaced to the caller. All methods take `&self`, so
//! a searcher can serve concurrent queries over the immutable index.

use std::sync::Arc;

use crate::dictionary::{DocDictionary, TermDictionary};
use crate::error::{CallaError, Result};
use crate::index::{IndexMeta, META_FILE, codec, index_shard_path};
use crate::postings::{PostingList, Representation};
use crate::storage::Storage;

/// A boolean expression over terms.
///
/// No precedence parsing happens here; callers build the tree they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// All documents containing the term.
    Term(String),
    /// Documents matching both operands.
    And(Box<QueryExpr>, Box<QueryExpr>),
    /// Documents matching either operand.
    Or(Box<QueryExpr>, Box<QueryExpr>),
    /// Documents not matching the operand.
    Not(Box<QueryExpr>),
}

impl QueryExpr {
    /// A term leaf.
    pub fn term<S: Into<String>>(term: S) -> Self {
        QueryExpr::Term(term.into())
    }

    /// Conjunction of two expressions.
    pub fn and(left: QueryExpr, right: QueryExpr) -> Self {
        QueryExpr::And(Box::new(left), Box::new(right))
    }

    /// Disjunction of two expressions.
    pub fn or(left: QueryExpr, right: QueryExpr) -> Self {
        QueryExpr::Or(Box::new(left), Box::new(right))
    }

    /// Negation of an expression.
    pub fn not(inner: QueryExpr) -> Self {
        QueryExpr::Not(Box::new(inner))
    }
}

/// Read-only query engine over a published final index.
///
/// Owns the build's dictionaries: terms resolve to IDs without touching
/// disk, and result doc IDs translate back to source paths.
#[derive(Debug)]
pub struct Searcher {
    storage: Arc<dyn Storage>,
    meta: IndexMeta,
    terms: TermDictionary,
    docs: DocDictionary,
    representation: Representation,
}

impl Searcher {
    /// Create a searcher over a published index.
    pub(crate) fn new(
        storage: Arc<dyn Storage>,
        meta: IndexMeta,
        terms: TermDictionary,
        docs: DocDictionary,
        representation: Representation,
    ) -> Self {
        Searcher {
            storage,
            meta,
            terms,
            docs,
            representation,
        }
    }

    /// Open a searcher over an index published earlier in this process.
    ///
    /// Fails if no index metadata exists, which means no complete index
    /// was ever published to this storage.
    pub fn open(
        storage: Arc<dyn Storage>,
        terms: TermDictionary,
        docs: DocDictionary,
        representation: Representation,
    ) -> Result<Self> {
        if !storage.file_exists(META_FILE) {
            return Err(CallaError::index(
                "no published index: metadata file missing",
            ));
        }
        let meta = IndexMeta::read(&storage)?;
        Ok(Searcher::new(storage, meta, terms, docs, representation))
    }

    /// Number of documents in the index, the closed doc-ID universe.
    pub fn doc_count(&self) -> usize {
        self.meta.doc_count as usize
    }

    /// The posting list for a term.
    ///
    /// Scans final-index shards from the start and returns the first
    /// matching entry. Terms absent from the dictionary or the index
    /// yield an empty posting list.
    pub fn lookup(&self, term: &str) -> Result<PostingList> {
        let universe = self.doc_count();
        let Some(term_id) = self.terms.get(term) else {
            return Ok(PostingList::empty(self.representation, universe));
        };

        for i in 0..self.meta.shard_count {
            let shard = codec::read_shard_file(&self.storage, &index_shard_path(i))?;
            for entry in &shard.entries {
                if entry.term_id == term_id {
                    return Ok(PostingList::from_doc_ids(
                        self.representation,
                        universe,
                        &entry.postings,
                    ));
                }
                // Shards are globally term-ordered; past the target ID
                // the term cannot appear anymore.
                if entry.term_id > term_id {
                    return Ok(PostingList::empty(self.representation, universe));
                }
            }
        }

        Ok(PostingList::empty(self.representation, universe))
    }

    /// Evaluate a boolean expression to a posting list.
    pub fn evaluate(&self, expr: &QueryExpr) -> Result<PostingList> {
        match expr {
            QueryExpr::Term(term) => self.lookup(term),
            QueryExpr::And(left, right) => self.evaluate(left)?.and(&self.evaluate(right)?),
            QueryExpr::Or(left, right) => self.evaluate(left)?.or(&self.evaluate(right)?),
            QueryExpr::Not(inner) => Ok(self.evaluate(inner)?.not(self.doc_count())),
        }
    }

    /// Evaluate an expression and translate the result to document
    /// paths, ascending by doc ID.
    pub fn search(&self, expr: &QueryExpr) -> Result<Vec<String>> {
        let matches = self.evaluate(expr)?;
        matches
            .to_doc_ids()
            .into_iter()
            .map(|doc_id| {
                self.docs
                    .path(doc_id)
                    .map(str::to_string)
                    .ok_or_else(|| CallaError::index(format!("unmapped doc id {doc_id}")))
            })
            .collect()
    }
}
