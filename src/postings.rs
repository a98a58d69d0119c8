//! Boolean posting-list algebra.
//!
//! Two interchangeable representations implement the same logical
//! contract over a closed universe of doc IDs (the full document set
//! known at build time):
//!
//! - [`PostingList::Sorted`]: strictly ascending doc IDs; AND/OR are
//!   linear merge walks and NOT materializes the complement against the
//!   universe.
//! - [`PostingList::Bits`]: one bit per document; AND/OR/NOT are bitwise
//!   operations and the complement is intrinsic to the bitset width.
//!
//! Both forms produce identical document sets for the same logical
//! query. Operands of a boolean operation must share a representation;
//! the query engine never mixes them.

use bit_vec::BitVec;
use serde::{Deserialize, Serialize};

use crate::error::{CallaError, Result};

/// Posting-list representation used when answering queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    /// Sorted doc-ID lists.
    SortedList,
    /// Fixed-width bitsets, one bit per document.
    Bitset,
}

/// The set of documents containing one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingList {
    /// Strictly ascending doc IDs, no duplicates.
    Sorted(Vec<i32>),
    /// One bit per document in the universe.
    Bits(BitVec),
}

impl PostingList {
    /// An empty posting list in the given representation.
    pub fn empty(representation: Representation, universe: usize) -> Self {
        match representation {
            Representation::SortedList => PostingList::Sorted(Vec::new()),
            Representation::Bitset => PostingList::Bits(BitVec::from_elem(universe, false)),
        }
    }

    /// Build a posting list from ascending, duplicate-free doc IDs.
    pub fn from_doc_ids(
        representation: Representation,
        universe: usize,
        doc_ids: &[i32],
    ) -> Self {
        match representation {
            Representation::SortedList => PostingList::Sorted(doc_ids.to_vec()),
            Representation::Bitset => {
                let mut bits = BitVec::from_elem(universe, false);
                for &doc_id in doc_ids {
                    bits.set(doc_id as usize, true);
                }
                PostingList::Bits(bits)
            }
        }
    }

    /// The representation of this list.
    pub fn representation(&self) -> Representation {
        match self {
            PostingList::Sorted(_) => Representation::SortedList,
            PostingList::Bits(_) => Representation::Bitset,
        }
    }

    /// Documents present in both lists.
    pub fn and(&self, other: &PostingList) -> Result<PostingList> {
        match (self, other) {
            (PostingList::Sorted(a), PostingList::Sorted(b)) => {
                Ok(PostingList::Sorted(intersect_sorted(a, b)))
            }
            (PostingList::Bits(a), PostingList::Bits(b)) => {
                let mut bits = a.clone();
                let _ = bits.intersect(b);
                Ok(PostingList::Bits(bits))
            }
            _ => Err(mixed_representations()),
        }
    }

    /// Documents present in either list.
    pub fn or(&self, other: &PostingList) -> Result<PostingList> {
        match (self, other) {
            (PostingList::Sorted(a), PostingList::Sorted(b)) => {
                Ok(PostingList::Sorted(union_sorted(a, b)))
            }
            (PostingList::Bits(a), PostingList::Bits(b)) => {
                let mut bits = a.clone();
                let _ = bits.union(b);
                Ok(PostingList::Bits(bits))
            }
            _ => Err(mixed_representations()),
        }
    }

    /// Documents of the universe absent from this list.
    ///
    /// The sorted form needs the universe size as a parameter; the bitset
    /// form carries its width already, so the parameter only matters for
    /// the sorted walk.
    pub fn not(&self, universe: usize) -> PostingList {
        match self {
            PostingList::Sorted(a) => {
                let mut complement = Vec::with_capacity(universe.saturating_sub(a.len()));
                let mut members = a.iter().copied().peekable();
                for doc_id in 0..universe as i32 {
                    if members.peek() == Some(&doc_id) {
                        members.next();
                    } else {
                        complement.push(doc_id);
                    }
                }
                PostingList::Sorted(complement)
            }
            PostingList::Bits(a) => {
                let mut bits = a.clone();
                bits.negate();
                PostingList::Bits(bits)
            }
        }
    }

    /// Whether a document is in the list.
    pub fn contains(&self, doc_id: i32) -> bool {
        match self {
            PostingList::Sorted(a) => a.binary_search(&doc_id).is_ok(),
            PostingList::Bits(a) => doc_id >= 0 && a.get(doc_id as usize).unwrap_or(false),
        }
    }

    /// Number of documents in the list.
    pub fn len(&self) -> usize {
        match self {
            PostingList::Sorted(a) => a.len(),
            PostingList::Bits(a) => a.iter().filter(|&b| b).count(),
        }
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            PostingList::Sorted(a) => a.is_empty(),
            PostingList::Bits(a) => a.iter().all(|b| !b),
        }
    }

    /// The doc IDs of this list, ascending.
    pub fn to_doc_ids(&self) -> Vec<i32> {
        match self {
            PostingList::Sorted(a) => a.clone(),
            PostingList::Bits(a) => a
                .iter()
                .enumerate()
                .filter(|&(_, bit)| bit)
                .map(|(i, _)| i as i32)
                .collect(),
        }
    }
}

fn mixed_representations() -> CallaError {
    CallaError::index("boolean operands use different posting representations")
}

fn intersect_sorted(a: &[i32], b: &[i32]) -> Vec<i32> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

fn union_sorted(a: &[i32], b: &[i32]) -> Vec<i32> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                result.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}
