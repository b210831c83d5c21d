//! Book shelf domain
//!
//! Typed book records, form parsing, the title search and author statistics
//! queries, and the [`RecordStore`] contract used by the HTTP and CLI layers.

mod form;
mod model;
mod search;
mod seed;
mod stats;
mod store;

pub use form::{BookForm, ValidationError};
pub use model::{Book, BookFields, AUTHOR, PAGES, PUBLISHED, TITLE};
pub use search::{search_query, SearchMode, SEARCH_LIMIT};
pub use seed::{sample_books, seed};
pub use stats::{
    AuthorPipeline, UnknownPipeline, OTHER_BUCKET, PAGES_FACET, PAGE_BOUNDARIES, STATS_AUTHOR,
};
pub use store::{BookStore, Books, RecordStore, StoreError, StoreResult, DEFAULT_COLLECTION};
