//! Result cursors.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Iterator over result documents.
///
/// Documents are materialized when the query runs; typed decoding via
/// [`Cursor::decode`] happens one document at a time as the caller pulls.
#[derive(Debug)]
pub struct Cursor {
    documents: std::vec::IntoIter<Value>,
}

impl Cursor {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: documents.into_iter(),
        }
    }

    /// Number of documents not yet yielded
    pub fn remaining(&self) -> usize {
        self.documents.len()
    }

    /// Decodes each document into `T` lazily.
    pub fn decode<T: DeserializeOwned>(self) -> Decoded<T> {
        Decoded {
            cursor: self,
            _marker: PhantomData,
        }
    }
}

impl Iterator for Cursor {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.documents.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.documents.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}

/// Cursor decoding documents into a typed value
#[derive(Debug)]
pub struct Decoded<T> {
    cursor: Cursor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for Decoded<T> {
    type Item = Result<T, serde_json::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(serde_json::from_value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}
