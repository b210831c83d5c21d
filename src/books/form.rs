//! Parsing submitted book text into typed fields.

use serde::Deserialize;
use thiserror::Error;

use super::model::{BookFields, PAGES, PUBLISHED};

/// A numeric field could not be read as an integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be an integer, got '{value}'")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
}

/// Raw book fields as submitted, all text
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub published: String,
    pub pages: String,
}

impl BookForm {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        published: impl Into<String>,
        pages: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published: published.into(),
            pages: pages.into(),
        }
    }

    /// Coerces `published` and `pages` to integers.
    ///
    /// Surrounding whitespace and a leading sign are accepted; no range checks.
    pub fn parse(&self) -> Result<BookFields, ValidationError> {
        Ok(BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            published: parse_integer(PUBLISHED, &self.published)?,
            pages: parse_integer(PAGES, &self.pages)?,
        })
    }
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    value.trim().parse::<i64>().map_err(|_| ValidationError {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coerces_numbers() {
        let fields = BookForm::new("Title1", "Author1", "2015", " 200 ").parse().unwrap();
        assert_eq!(fields, BookFields::new("Title1", "Author1", 2015, 200));
    }

    #[test]
    fn test_parse_accepts_sign_without_bounds() {
        let fields = BookForm::new("T", "A", "-44", "+0").parse().unwrap();
        assert_eq!(fields.published, -44);
        assert_eq!(fields.pages, 0);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = BookForm::new("T", "A", "2015", "many").parse().unwrap_err();
        assert_eq!(err.field, "pages");
        assert_eq!(err.value, "many");
        assert_eq!(err.to_string(), "pages must be an integer, got 'many'");
    }

    #[test]
    fn test_parse_rejects_fractional_and_empty() {
        assert_eq!(
            BookForm::new("T", "A", "20.5", "1").parse().unwrap_err().field,
            "published"
        );
        assert!(BookForm::new("T", "A", "", "1").parse().is_err());
    }

    #[test]
    fn test_text_fields_kept_verbatim() {
        let fields = BookForm::new("  Spaced  ", "", "1", "1").parse().unwrap();
        assert_eq!(fields.title, "  Spaced  ");
        assert_eq!(fields.author, "");
    }
}
