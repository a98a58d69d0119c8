//! Token contract and punctuation filtering.
//!
//! Text extraction and tokenization are external collaborators: the
//! indexing pipeline consumes already-produced [`Token`] streams and only
//! filters out punctuation. The punctuation set is explicit configuration
//! on [`TokenFilter`], not ambient state.

use ahash::AHashSet;

/// Punctuation tokens excluded from indexing by default.
pub const DEFAULT_PUNCTUATION: &[&str] = &[".", "!", "?", ":", ";", ",", "(", ")", "—", "·"];

/// A token produced by an external tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Whether the tokenizer classified this token as punctuation.
    pub is_punctuation: bool,
}

impl Token {
    /// Create a word token.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            is_punctuation: false,
        }
    }

    /// Create a punctuation token.
    pub fn punctuation<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            is_punctuation: true,
        }
    }
}

/// Filter deciding which tokens enter the index.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    punctuation: AHashSet<String>,
}

impl TokenFilter {
    /// Create a filter with a custom punctuation set.
    pub fn new(punctuation: &[&str]) -> Self {
        TokenFilter {
            punctuation: punctuation.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Whether a token should be indexed.
    pub fn accept(&self, token: &Token) -> bool {
        !token.is_punctuation && !self.punctuation.contains(&token.text)
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        TokenFilter::new(DEFAULT_PUNCTUATION)
    }
}
