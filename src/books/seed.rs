//! Sample books for a fresh shelf.

use super::model::BookFields;
use super::store::{RecordStore, StoreResult};
use crate::document::ObjectId;

/// The seven sample books, in insertion order
pub fn sample_books() -> Vec<BookFields> {
    [
        ("Title1", "Author1", 2015, 200),
        ("Title2", "Author1", 2020, 210),
        ("Title3", "Author2", 2017, 250),
        ("Title4", "Author2", 2019, 300),
        ("Title5", "Author3", 2018, 200),
        ("Title6", "Author3", 2019, 330),
        ("Title7", "Author3", 2021, 405),
    ]
    .into_iter()
    .map(|(title, author, published, pages)| BookFields::new(title, author, published, pages))
    .collect()
}

/// Inserts every sample book and returns their identifiers.
///
/// Running it twice inserts the books twice.
pub fn seed(store: &dyn RecordStore) -> StoreResult<Vec<ObjectId>> {
    let ids = sample_books()
        .iter()
        .map(|book| store.insert_book(book))
        .collect::<StoreResult<Vec<_>>>()?;

    tracing::info!(count = ids.len(), "seeded sample books");
    Ok(ids)
}
