//! Book record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::ObjectId;

/// Field names of a book document
pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const PUBLISHED: &str = "published";
pub const PAGES: &str = "pages";

/// A stored book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub published: i64,
    pub pages: i64,
}

impl Book {
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            published: self.published,
            pages: self.pages,
        }
    }
}

/// Validated field values for insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub published: i64,
    pub pages: i64,
}

impl BookFields {
    pub fn new(title: impl Into<String>, author: impl Into<String>, published: i64, pages: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published,
            pages,
        }
    }

    /// The fields as a document fragment, used both for insert and `$set`
    pub fn to_document(&self) -> Map<String, Value> {
        let mut document = Map::new();
        document.insert(TITLE.to_string(), Value::from(self.title.clone()));
        document.insert(AUTHOR.to_string(), Value::from(self.author.clone()));
        document.insert(PUBLISHED.to_string(), Value::from(self.published));
        document.insert(PAGES.to_string(), Value::from(self.pages));
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_decodes_from_document_ignoring_extras() {
        let id = ObjectId::new();
        let doc = json!({
            "_id": id.to_hex(),
            "title": "Title1",
            "author": "Author1",
            "published": 2015,
            "pages": 200,
            "isbn": "978-0"
        });
        let book: Book = serde_json::from_value(doc).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.fields(), BookFields::new("Title1", "Author1", 2015, 200));
    }

    #[test]
    fn test_book_rejects_text_pages() {
        let doc = json!({
            "_id": ObjectId::new().to_hex(),
            "title": "T",
            "author": "A",
            "published": 2015,
            "pages": "200"
        });
        assert!(serde_json::from_value::<Book>(doc).is_err());
    }

    #[test]
    fn test_fields_to_document_stores_integers() {
        let doc = BookFields::new("Title1", "Author1", 2015, 200).to_document();
        assert_eq!(
            Value::Object(doc),
            json!({"title": "Title1", "author": "Author1", "published": 2015, "pages": 200})
        );
    }
}
