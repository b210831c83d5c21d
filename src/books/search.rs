//! Title search query builder.

use serde::{Deserialize, Serialize};

use super::model::{AUTHOR, PAGES, PUBLISHED, TITLE};
use crate::query::{Filter, FindOptions, Projection, QueryResult, SortSpec};

/// Maximum number of search results
pub const SEARCH_LIMIT: usize = 5;

/// How search text is turned into a title pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Plain case-insensitive substring; metacharacters match themselves
    #[default]
    Literal,
    /// Text is a case-insensitive regular expression fragment
    Pattern,
}

/// Builds the filter and options for a title search.
///
/// Results are sorted by title descending and cut to [`SEARCH_LIMIT`].
pub fn search_query(text: &str, mode: SearchMode) -> QueryResult<(Filter, FindOptions)> {
    let filter = match mode {
        SearchMode::Literal => Filter::all().contains(TITLE, text),
        SearchMode::Pattern => Filter::all().regex(TITLE, text, true)?,
    };
    let options = FindOptions::new()
        .projection(Projection::include([TITLE, AUTHOR, PUBLISHED, PAGES]))
        .sort(SortSpec::desc(TITLE))
        .skip(0)
        .limit(SEARCH_LIMIT);

    Ok((filter, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_mode_matches_metacharacters_as_text() {
        let (filter, _) = search_query("c++ (2nd", SearchMode::Literal).unwrap();
        assert!(filter.matches(&json!({"title": "Learning C++ (2nd ed.)"})));
        assert!(!filter.matches(&json!({"title": "Learning C"})));
    }

    #[test]
    fn test_literal_dot_is_not_wildcard() {
        let (filter, _) = search_query("a.c", SearchMode::Literal).unwrap();
        assert!(!filter.matches(&json!({"title": "abc"})));
        assert!(filter.matches(&json!({"title": "A.C"})));
    }

    #[test]
    fn test_long_literal_is_not_compiled() {
        let text = "é".repeat(250_000);
        let (filter, _) = search_query(&text, SearchMode::Literal).unwrap();
        assert!(filter.matches(&json!({ "title": text.to_uppercase() })));
        assert!(!filter.matches(&json!({"title": "Title1"})));
    }

    #[test]
    fn test_pattern_mode_uses_regex() {
        let (filter, _) = search_query("^title[12]$", SearchMode::Pattern).unwrap();
        assert!(filter.matches(&json!({"title": "Title2"})));
        assert!(!filter.matches(&json!({"title": "Title3"})));
    }

    #[test]
    fn test_pattern_mode_rejects_bad_regex() {
        assert!(search_query("([", SearchMode::Pattern).is_err());
        assert!(search_query("([", SearchMode::Literal).is_ok());
    }

    #[test]
    fn test_options() {
        let (_, options) = search_query("", SearchMode::Literal).unwrap();
        assert_eq!(options.limit, Some(SEARCH_LIMIT));
        assert_eq!(options.skip, 0);
        assert_eq!(options.sort, Some(SortSpec::desc("title")));
    }

    #[test]
    fn test_search_mode_serde() {
        assert_eq!(
            serde_json::from_value::<SearchMode>(json!("pattern")).unwrap(),
            SearchMode::Pattern
        );
        assert_eq!(serde_json::to_value(SearchMode::Literal).unwrap(), json!("literal"));
    }
}
