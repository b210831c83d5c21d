//! Record store for books.
//!
//! [`RecordStore`] is the contract the HTTP and CLI layers talk to. Its
//! required methods take already-parsed values; the provided methods accept
//! raw submitted text and run it through [`BookForm::parse`] and identifier
//! parsing first, so nothing malformed reaches the collection.

use std::path::Path;

use thiserror::Error;

use super::form::{BookForm, ValidationError};
use super::model::{Book, BookFields};
use super::search::{search_query, SearchMode};
use super::stats::{AuthorPipeline, UnknownPipeline};
use crate::aggregation::AggregationError;
use crate::collection::{Collection, CollectionError, UpdateResult};
use crate::document::{InvalidObjectId, ObjectId};
use crate::query::{Cursor, Decoded, Filter, FindOptions, QueryError};

/// Default collection holding the books
pub const DEFAULT_COLLECTION: &str = "books";

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Lazily decoded book results
pub type Books = Decoded<Book>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier text is not a valid ObjectId
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidObjectId),

    /// `published` or `pages` is not an integer
    #[error(transparent)]
    TypeConversion(#[from] ValidationError),

    /// Statistics pipeline name is not known
    #[error(transparent)]
    UnknownPipeline(#[from] UnknownPipeline),

    /// Search text is not a valid pattern
    #[error(transparent)]
    InvalidSearchPattern(#[from] QueryError),

    /// Stored document does not have the shape of a book
    #[error("Stored book could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Collection or storage failure
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl From<AggregationError> for StoreError {
    fn from(err: AggregationError) -> Self {
        StoreError::Collection(CollectionError::Aggregation(err))
    }
}

/// Operations on the book collection
pub trait RecordStore: Send + Sync {
    /// Every book, in identifier order
    fn read_all(&self) -> StoreResult<Books>;

    fn insert_book(&self, fields: &BookFields) -> StoreResult<ObjectId>;

    fn book_by_id(&self, id: ObjectId) -> StoreResult<Option<Book>>;

    /// Replaces the four book fields. No match is not an error.
    fn update_book(&self, id: ObjectId, fields: &BookFields) -> StoreResult<UpdateResult>;

    /// Up to five books whose title matches `text`, title descending
    fn search(&self, text: &str) -> StoreResult<Books>;

    fn author_statistics(&self, pipeline: AuthorPipeline) -> StoreResult<Cursor>;

    /// Parses submitted text and inserts the book
    fn insert(&self, form: &BookForm) -> StoreResult<ObjectId> {
        self.insert_book(&form.parse()?)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        self.book_by_id(id.parse()?)
    }

    fn update_by_id(&self, id: &str, form: &BookForm) -> StoreResult<UpdateResult> {
        let id: ObjectId = id.parse()?;
        self.update_book(id, &form.parse()?)
    }

    /// Runs the named statistics pipeline; unknown names run nothing
    fn author_stats(&self, pipeline: &str) -> StoreResult<Cursor> {
        self.author_statistics(pipeline.parse()?)
    }
}

/// [`RecordStore`] over a [`Collection`]
pub struct BookStore {
    collection: Collection,
    search_mode: SearchMode,
}

impl BookStore {
    /// Opens the named collection under `data_dir`, replaying its log
    pub fn open(data_dir: &Path, collection: &str, search_mode: SearchMode) -> StoreResult<Self> {
        Ok(Self::new(Collection::open(data_dir, collection)?, search_mode))
    }

    pub fn new(collection: Collection, search_mode: SearchMode) -> Self {
        Self {
            collection,
            search_mode,
        }
    }

    /// A store that keeps nothing on disk
    pub fn in_memory(search_mode: SearchMode) -> Self {
        Self::new(Collection::in_memory(DEFAULT_COLLECTION), search_mode)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }
}

impl RecordStore for BookStore {
    fn read_all(&self) -> StoreResult<Books> {
        Ok(self
            .collection
            .find(&Filter::all(), &FindOptions::new())
            .decode())
    }

    fn insert_book(&self, fields: &BookFields) -> StoreResult<ObjectId> {
        let id = self
            .collection
            .insert_one(serde_json::Value::Object(fields.to_document()))?;
        tracing::info!(id = %id, title = %fields.title, "book added");
        Ok(id)
    }

    fn book_by_id(&self, id: ObjectId) -> StoreResult<Option<Book>> {
        self.collection
            .find_by_id(id)
            .map(serde_json::from_value::<Book>)
            .transpose()
            .map_err(StoreError::from)
    }

    fn update_book(&self, id: ObjectId, fields: &BookFields) -> StoreResult<UpdateResult> {
        let result = self
            .collection
            .update_one(&Filter::by_id(id), fields.to_document())?;
        tracing::info!(
            id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "book updated"
        );
        Ok(result)
    }

    fn search(&self, text: &str) -> StoreResult<Books> {
        let (filter, options) = search_query(text, self.search_mode)?;
        let cursor = self.collection.find(&filter, &options);
        tracing::debug!(
            search = %text,
            mode = ?self.search_mode,
            hits = cursor.remaining(),
            "title search"
        );
        Ok(cursor.decode())
    }

    fn author_statistics(&self, pipeline: AuthorPipeline) -> StoreResult<Cursor> {
        tracing::debug!(pipeline = %pipeline, "author statistics");
        Ok(self.collection.aggregate(&pipeline.pipeline()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> BookStore {
        BookStore::in_memory(SearchMode::Literal)
    }

    #[test]
    fn test_insert_then_get() {
        let store = store();
        let id = store
            .insert(&BookForm::new("Title1", "Author1", "2015", "200"))
            .unwrap();

        let book = store.get_by_id(&id.to_hex()).unwrap().unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.fields(), BookFields::new("Title1", "Author1", 2015, 200));
    }

    #[test]
    fn test_insert_rejects_text_number_without_writing() {
        let store = store();
        let err = store
            .insert(&BookForm::new("Title1", "Author1", "2015", "lots"))
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeConversion(_)));
        assert_eq!(store.collection().count(), 0);
    }

    #[test]
    fn test_get_by_malformed_id() {
        let err = store().get_by_id("not-an-id").unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_get_by_unknown_id_is_none() {
        assert!(store().book_by_id(ObjectId::new()).unwrap().is_none());
    }

    #[test]
    fn test_update_keeps_extra_fields() {
        let store = store();
        let id = store
            .collection()
            .insert_one(json!({"title": "T", "author": "A", "published": 1, "pages": 2, "isbn": "x"}))
            .unwrap();

        store
            .update_by_id(&id.to_hex(), &BookForm::new("T2", "A2", "3", "4"))
            .unwrap();

        let doc = store.collection().find_by_id(id).unwrap();
        assert_eq!(doc["title"], "T2");
        assert_eq!(doc["pages"], 4);
        assert_eq!(doc["isbn"], "x");
    }

    #[test]
    fn test_update_validates_before_writing() {
        let store = store();
        let id = store
            .insert_book(&BookFields::new("T", "A", 1, 2))
            .unwrap();

        let err = store
            .update_by_id(&id.to_hex(), &BookForm::new("T2", "A", "soon", "2"))
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeConversion(_)));
        assert_eq!(store.book_by_id(id).unwrap().unwrap().title, "T");
    }

    #[test]
    fn test_unknown_pipeline() {
        let err = store().author_stats("median").unwrap_err();
        assert!(matches!(err, StoreError::UnknownPipeline(_)));
    }

    #[test]
    fn test_pattern_mode_bad_regex() {
        let store = BookStore::in_memory(SearchMode::Pattern);
        let err = store.search("(").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSearchPattern(_)));
    }

    #[test]
    fn test_read_all_surfaces_bad_documents() {
        let store = store();
        store.collection().insert_one(json!({"title": "no pages"})).unwrap();
        let results: Vec<_> = store.read_all().unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
