//! Predicate filtering for find queries
//!
//! A [`Filter`] is a conjunction of field predicates. Equality follows
//! document-store semantics: a field matches a value when it equals it or is
//! an array containing it. Regex and substring predicates only match string
//! fields.

use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};

use super::errors::{QueryError, QueryResult};
use crate::document::{lookup, ObjectId, ID_FIELD};

/// Condition applied to a single field
#[derive(Debug, Clone)]
pub enum Condition {
    /// Field equals (or contains) the value
    Eq(Value),
    /// Field is a string matching the pattern
    Regex {
        pattern: Regex,
        case_insensitive: bool,
    },
    /// Field is a string containing the text, ignoring case
    Contains {
        text: String,
        folded: String,
    },
}

/// A single field predicate
#[derive(Debug, Clone)]
pub struct Predicate {
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    fn matches(&self, document: &Value) -> bool {
        let field_value = lookup(document, &self.field);

        match &self.condition {
            Condition::Eq(expected) => match field_value {
                None => expected.is_null(),
                Some(Value::Array(items)) => {
                    items.contains(expected) || field_value == Some(expected)
                }
                Some(actual) => actual == expected,
            },
            Condition::Regex { pattern, .. } => match field_value {
                Some(Value::String(s)) => pattern.is_match(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| pattern.is_match(s)),
                _ => false,
            },
            Condition::Contains { folded, .. } => {
                let contains = |s: &str| s.to_lowercase().contains(folded.as_str());
                match field_value {
                    Some(Value::String(s)) => contains(s.as_str()),
                    Some(Value::Array(items)) => {
                        items.iter().filter_map(Value::as_str).any(contains)
                    }
                    _ => false,
                }
            }
        }
    }
}

/// A set of predicates combined with AND logic. Empty matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Filter matching every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on the document identifier
    pub fn by_id(id: ObjectId) -> Self {
        Self::all().eq(ID_FIELD, Value::String(id.to_hex()))
    }

    /// Adds an equality predicate
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.predicates.push(Predicate {
            field: field.into(),
            condition: Condition::Eq(value),
        });
        self
    }

    /// Adds a regex predicate.
    ///
    /// Fails when `pattern` is not a valid regular expression.
    pub fn regex(
        mut self,
        field: impl Into<String>,
        pattern: &str,
        case_insensitive: bool,
    ) -> QueryResult<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| QueryError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        self.predicates.push(Predicate {
            field: field.into(),
            condition: Condition::Regex {
                pattern: compiled,
                case_insensitive,
            },
        });
        Ok(self)
    }

    /// Adds a case-insensitive substring predicate. Nothing is compiled.
    pub fn contains(mut self, field: impl Into<String>, text: &str) -> Self {
        self.predicates.push(Predicate {
            field: field.into(),
            condition: Condition::Contains {
                text: text.to_string(),
                folded: text.to_lowercase(),
            },
        });
        self
    }

    /// Renders the filter as a query document
    pub fn to_json(&self) -> Value {
        let mut query = serde_json::Map::new();
        for predicate in &self.predicates {
            let rendered = match &predicate.condition {
                Condition::Eq(value) => value.clone(),
                Condition::Regex {
                    pattern,
                    case_insensitive,
                } => {
                    let mut regex = serde_json::Map::new();
                    regex.insert("$regex".into(), Value::String(pattern.as_str().into()));
                    if *case_insensitive {
                        regex.insert("$options".into(), Value::String("i".into()));
                    }
                    Value::Object(regex)
                }
                Condition::Contains { text, .. } => {
                    json!({"$regex": regex::escape(text), "$options": "i"})
                }
            };
            query.insert(predicate.field.clone(), rendered);
        }
        Value::Object(query)
    }

    /// Checks if a document matches all predicates
    pub fn matches(&self, document: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::all().matches(&json!({})));
        assert!(Filter::all().matches(&json!({"title": "Title1"})));
    }

    #[test]
    fn test_equality_no_type_coercion() {
        let filter = Filter::all().eq("pages", json!(200));
        assert!(filter.matches(&json!({"pages": 200})));
        assert!(!filter.matches(&json!({"pages": "200"})));
    }

    #[test]
    fn test_equality_against_array_field() {
        let filter = Filter::all().eq("author", json!("Author3"));
        assert!(filter.matches(&json!({"author": ["Author1", "Author3"]})));
        assert!(!filter.matches(&json!({"author": ["Author1"]})));
    }

    #[test]
    fn test_null_equality_matches_missing_field() {
        let filter = Filter::all().eq("author", Value::Null);
        assert!(filter.matches(&json!({"title": "Untitled"})));
        assert!(!filter.matches(&json!({"author": "Author1"})));
    }

    #[test]
    fn test_case_insensitive_regex() {
        let filter = Filter::all().regex("title", "title1", true).unwrap();
        assert!(filter.matches(&json!({"title": "Title1"})));
        assert!(filter.matches(&json!({"title": "The TITLE10 story"})));
        assert!(!filter.matches(&json!({"title": "Title2"})));
        assert!(!filter.matches(&json!({"title": 1})));
    }

    #[test]
    fn test_regex_is_case_sensitive_when_asked() {
        let filter = Filter::all().regex("title", "title1", false).unwrap();
        assert!(!filter.matches(&json!({"title": "Title1"})));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = Filter::all().regex("title", "(unclosed", true).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_contains_ignores_case_and_metacharacters() {
        let filter = Filter::all().contains("title", "c++ (2ND");
        assert!(filter.matches(&json!({"title": "Learning C++ (2nd ed.)"})));
        assert!(filter.matches(&json!({"title": ["Other", "c++ (2nd"]})));
        assert!(!filter.matches(&json!({"title": "Learning C"})));
        assert!(!filter.matches(&json!({"pages": 200})));
    }

    #[test]
    fn test_contains_empty_text_matches_any_string() {
        let filter = Filter::all().contains("title", "");
        assert!(filter.matches(&json!({"title": ""})));
        assert!(!filter.matches(&json!({"title": null})));
    }

    #[test]
    fn test_contains_renders_as_escaped_regex() {
        assert_eq!(
            Filter::all().contains("title", "a.c").to_json(),
            json!({"title": {"$regex": "a\\.c", "$options": "i"}})
        );
    }

    #[test]
    fn test_predicates_are_anded() {
        let filter = Filter::all()
            .eq("author", json!("Author3"))
            .eq("pages", json!(200));
        assert!(filter.matches(&json!({"author": "Author3", "pages": 200})));
        assert!(!filter.matches(&json!({"author": "Author3", "pages": 330})));
    }

    #[test]
    fn test_to_json() {
        let filter = Filter::all()
            .eq("author", json!("Author3"))
            .regex("title", "tit", true)
            .unwrap();
        assert_eq!(
            filter.to_json(),
            json!({"author": "Author3", "title": {"$regex": "tit", "$options": "i"}})
        );
    }

    #[test]
    fn test_by_id() {
        let id = ObjectId::new();
        let filter = Filter::by_id(id);
        assert!(filter.matches(&json!({"_id": id.to_hex()})));
        assert!(!filter.matches(&json!({"_id": ObjectId::new().to_hex()})));
    }
}
