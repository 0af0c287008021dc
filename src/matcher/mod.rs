//! Matcher capability and query types.
//!
//! The scan never searches text itself. It asks an injected [`Matcher`] for the
//! next occurrence of a [`SearchQuery`] starting at a byte offset, and keeps
//! asking from the previous match's end until the matcher reports nothing.

mod regex_matcher;

pub use regex_matcher::RegexMatcher;

use serde::Deserialize;

// ===== Matcher =====

/// Finds query occurrences inside a piece of text.
///
/// Implementations must be shareable with the worker context. Returned offsets
/// are byte offsets into `text`, `start <= end`, and `start >= from_offset`.
pub trait Matcher: Send + Sync {
    /// First occurrence of `query` in `text` at or after `from_offset`.
    fn find_next(&self, text: &str, from_offset: usize, query: &SearchQuery)
        -> Option<(usize, usize)>;
}

impl<F> Matcher for F
where
    F: Fn(&str, usize, &SearchQuery) -> Option<(usize, usize)> + Send + Sync,
{
    fn find_next(
        &self,
        text: &str,
        from_offset: usize,
        query: &SearchQuery,
    ) -> Option<(usize, usize)> {
        self(text, from_offset, query)
    }
}

// ===== FindOptions =====

/// How a query's text is interpreted by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct FindOptions {
    /// Distinguish upper and lower case.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match whole words.
    #[serde(default)]
    pub whole_words: bool,
    /// Treat the query text as a regular expression.
    #[serde(default)]
    pub regex: bool,
}

// ===== SearchQuery =====

/// Validated search query. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    text: String,
    options: FindOptions,
}

impl SearchQuery {
    /// Smart constructor: returns None if the text is empty or whitespace-only.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let text = raw.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self {
                text,
                options: FindOptions::default(),
            })
        }
    }

    /// Replace the find options.
    pub fn with_options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    /// Query text as entered.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Find options the matcher applies.
    pub fn options(&self) -> FindOptions {
        self.options
    }
}
