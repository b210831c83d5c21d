//! Result sorting
//!
//! Sorts are stable: documents with equal keys keep their input order.

use serde_json::Value;

use crate::document::{compare_values, lookup};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered list of sort keys; earlier keys take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self::default().then_asc(field)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::default().then_desc(field)
    }

    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    /// Renders the spec as a sort document (`1` ascending, `-1` descending)
    pub fn to_json(&self) -> Value {
        let mut rendered = serde_json::Map::new();
        for key in &self.keys {
            let direction = match key.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            };
            rendered.insert(key.field.clone(), Value::from(direction));
        }
        Value::Object(rendered)
    }

    pub fn sort(&self, documents: &mut [Value]) {
        if self.keys.is_empty() {
            return;
        }

        documents.sort_by(|a, b| {
            for key in &self.keys {
                let ordering = compare_values(lookup(a, &key.field), lookup(b, &key.field));
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(docs: &[Value]) -> Vec<&str> {
        docs.iter().map(|d| d["title"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_descending_strings() {
        let mut docs = vec![
            json!({"title": "Title2"}),
            json!({"title": "Title7"}),
            json!({"title": "Title10"}),
        ];
        SortSpec::desc("title").sort(&mut docs);
        assert_eq!(titles(&docs), vec!["Title7", "Title2", "Title10"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut docs = vec![
            json!({"title": "a", "pages": 1}),
            json!({"title": "b", "pages": 1}),
            json!({"title": "c", "pages": 1}),
        ];
        SortSpec::desc("pages").sort(&mut docs);
        assert_eq!(titles(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_secondary_key() {
        let mut docs = vec![
            json!({"title": "a", "author": "B"}),
            json!({"title": "b", "author": "A"}),
            json!({"title": "c", "author": "B"}),
        ];
        SortSpec::asc("author").then_desc("title").sort(&mut docs);
        assert_eq!(titles(&docs), vec!["b", "c", "a"]);
    }
}
