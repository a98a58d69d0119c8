//! Term and document dictionaries.
//!
//! Both dictionaries assign dense, zero-based `i32` IDs in first-seen
//! order and never reassign within a build. They perform no I/O and are
//! single-writer: the indexing pipeline is the only mutator.

use ahash::AHashMap;

/// Mapping from normalized terms to dense term IDs.
#[derive(Debug, Default)]
pub struct TermDictionary {
    ids: AHashMap<String, i32>,
}

impl TermDictionary {
    /// Create an empty term dictionary.
    pub fn new() -> Self {
        TermDictionary::default()
    }

    /// Return the ID for a term, assigning the next sequential ID on
    /// first occurrence.
    pub fn assign(&mut self, term: &str) -> i32 {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.ids.len() as i32;
        self.ids.insert(term.to_string(), id);
        id
    }

    /// Look up a term without assigning an ID.
    pub fn get(&self, term: &str) -> Option<i32> {
        self.ids.get(term).copied()
    }

    /// Number of distinct terms seen.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no terms have been seen.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Mapping between document paths and dense doc IDs.
///
/// Unlike terms, documents need a reverse lookup: query results are
/// translated from doc IDs back to the source paths.
#[derive(Debug, Default)]
pub struct DocDictionary {
    ids: AHashMap<String, i32>,
    paths: Vec<String>,
}

impl DocDictionary {
    /// Create an empty document dictionary.
    pub fn new() -> Self {
        DocDictionary::default()
    }

    /// Return the ID for a document path, assigning the next sequential
    /// ID on first occurrence.
    pub fn assign(&mut self, path: &str) -> i32 {
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = self.paths.len() as i32;
        self.ids.insert(path.to_string(), id);
        self.paths.push(path.to_string());
        id
    }

    /// Source path for a doc ID.
    pub fn path(&self, doc_id: i32) -> Option<&str> {
        if doc_id < 0 {
            return None;
        }
        self.paths.get(doc_id as usize).map(String::as_str)
    }

    /// Number of documents seen. This is the closed doc-ID universe used
    /// by the posting-list algebra.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no documents have been seen.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_dense_and_idempotent() {
        let mut terms = TermDictionary::new();

        assert_eq!(terms.assign("alpha"), 0);
        assert_eq!(terms.assign("beta"), 1);
        assert_eq!(terms.assign("gamma"), 2);

        // Re-assigning yields the same IDs.
        assert_eq!(terms.assign("alpha"), 0);
        assert_eq!(terms.assign("gamma"), 2);
        assert_eq!(terms.len(), 3);

        assert_eq!(terms.get("beta"), Some(1));
        assert_eq!(terms.get("missing"), None);
    }

    #[test]
    fn test_n_distinct_terms_fill_range() {
        let mut terms = TermDictionary::new();
        let mut ids: Vec<i32> = (0..100).map(|i| terms.assign(&format!("t{i}"))).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..100).collect::<Vec<i32>>());
    }

    #[test]
    fn test_docs_assign_and_reverse_lookup() {
        let mut docs = DocDictionary::new();

        assert_eq!(docs.assign("texts/a.txt"), 0);
        assert_eq!(docs.assign("texts/b.txt"), 1);
        assert_eq!(docs.assign("texts/a.txt"), 0);
        assert_eq!(docs.len(), 2);

        assert_eq!(docs.path(0), Some("texts/a.txt"));
        assert_eq!(docs.path(1), Some("texts/b.txt"));
        assert_eq!(docs.path(2), None);
        assert_eq!(docs.path(-1), None);
    }
}
