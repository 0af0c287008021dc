//! Matcher backed by the `regex` crate.

use crate::matcher::{Matcher, SearchQuery};
use crate::model::QueryError;
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Matcher that compiles each query once and reuses it for every cell.
///
/// Literal queries are escaped before compilation. A query that fails to
/// compile is remembered as unmatchable, so the scan simply finds nothing.
#[derive(Debug, Default)]
pub struct RegexMatcher {
    compiled: Mutex<Option<CompiledQuery>>,
}

#[derive(Debug)]
struct CompiledQuery {
    query: SearchQuery,
    regex: Option<Regex>,
}

impl RegexMatcher {
    /// Matcher with an empty compile cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the regex a query maps to.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPattern` if the pattern does not compile.
    pub fn compile(query: &SearchQuery) -> Result<Regex, QueryError> {
        let options = query.options();
        let mut pattern = if options.regex {
            query.as_str().to_string()
        } else {
            regex::escape(query.as_str())
        };
        if options.whole_words {
            pattern = format!(r"\b(?:{pattern})\b");
        }

        RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| QueryError::InvalidPattern {
                pattern,
                reason: e.to_string(),
            })
    }

    fn regex_for(&self, query: &SearchQuery) -> Option<Regex> {
        let mut compiled = self.compiled.lock();
        if let Some(cached) = compiled.as_ref().filter(|c| &c.query == query) {
            return cached.regex.clone();
        }

        let regex = match Self::compile(query) {
            Ok(regex) => Some(regex),
            Err(error) => {
                warn!(%error, "query does not compile, nothing will match");
                None
            }
        };
        *compiled = Some(CompiledQuery {
            query: query.clone(),
            regex: regex.clone(),
        });
        regex
    }
}

impl Matcher for RegexMatcher {
    fn find_next(
        &self,
        text: &str,
        from_offset: usize,
        query: &SearchQuery,
    ) -> Option<(usize, usize)> {
        if from_offset > text.len() || !text.is_char_boundary(from_offset) {
            return None;
        }
        let regex = self.regex_for(query)?;
        regex
            .find_at(text, from_offset)
            .map(|found| (found.start(), found.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FindOptions;

    fn query(text: &str, options: FindOptions) -> SearchQuery {
        SearchQuery::new(text)
            .expect("valid query")
            .with_options(options)
    }

    fn all_matches(matcher: &RegexMatcher, text: &str, query: &SearchQuery) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut offset = 0;
        while let Some((start, end)) = matcher.find_next(text, offset, query) {
            found.push((start, end));
            offset = end.max(start + 1);
        }
        found
    }

    #[test]
    fn literal_search_finds_every_occurrence() {
        let matcher = RegexMatcher::new();
        let q = query("foo", FindOptions::default());

        assert_eq!(all_matches(&matcher, "foo bar foo", &q), vec![(0, 3), (8, 11)]);
    }

    #[test]
    fn literal_search_escapes_metacharacters() {
        let matcher = RegexMatcher::new();
        let q = query("a.*b", FindOptions::default());

        assert_eq!(matcher.find_next("aXXb", 0, &q), None);
        assert_eq!(matcher.find_next("xa.*b", 0, &q), Some((1, 5)));
    }

    #[test]
    fn search_is_case_insensitive_by_default() {
        let matcher = RegexMatcher::new();
        let q = query("HELLO", FindOptions::default());

        assert_eq!(matcher.find_next("say hello", 0, &q), Some((4, 9)));
    }

    #[test]
    fn case_sensitive_search_respects_case() {
        let matcher = RegexMatcher::new();
        let q = query(
            "HELLO",
            FindOptions {
                case_sensitive: true,
                ..FindOptions::default()
            },
        );

        assert_eq!(matcher.find_next("say hello", 0, &q), None);
        assert_eq!(matcher.find_next("say HELLO", 0, &q), Some((4, 9)));
    }

    #[test]
    fn whole_words_skips_partial_words() {
        let matcher = RegexMatcher::new();
        let q = query(
            "cat",
            FindOptions {
                whole_words: true,
                ..FindOptions::default()
            },
        );

        assert_eq!(all_matches(&matcher, "concat cat catalog", &q), vec![(7, 10)]);
    }

    #[test]
    fn regex_mode_uses_pattern() {
        let matcher = RegexMatcher::new();
        let q = query(
            r"\d+",
            FindOptions {
                regex: true,
                ..FindOptions::default()
            },
        );

        assert_eq!(all_matches(&matcher, "id 42 and 7", &q), vec![(3, 5), (10, 11)]);
    }

    #[test]
    fn invalid_regex_matches_nothing() {
        let matcher = RegexMatcher::new();
        let q = query(
            "[unclosed",
            FindOptions {
                regex: true,
                ..FindOptions::default()
            },
        );

        assert_eq!(matcher.find_next("[unclosed", 0, &q), None);
    }

    #[test]
    fn compile_reports_invalid_pattern() {
        let q = query(
            "(",
            FindOptions {
                regex: true,
                ..FindOptions::default()
            },
        );

        let err = RegexMatcher::compile(&q).expect_err("pattern should not compile");
        assert!(matches!(err, QueryError::InvalidPattern { .. }));
    }

    #[test]
    fn offset_past_end_finds_nothing() {
        let matcher = RegexMatcher::new();
        let q = query("a", FindOptions::default());

        assert_eq!(matcher.find_next("aaa", 4, &q), None);
    }

    #[test]
    fn offset_inside_multibyte_char_finds_nothing() {
        let matcher = RegexMatcher::new();
        let q = query("x", FindOptions::default());

        assert_eq!(matcher.find_next("\u{e9}x", 1, &q), None);
        assert_eq!(matcher.find_next("\u{e9}x", 2, &q), Some((2, 3)));
    }

    #[test]
    fn changing_query_recompiles() {
        let matcher = RegexMatcher::new();

        assert_eq!(
            matcher.find_next("abc", 0, &query("b", FindOptions::default())),
            Some((1, 2))
        );
        assert_eq!(
            matcher.find_next("abc", 0, &query("c", FindOptions::default())),
            Some((2, 3))
        );
    }
}
