//! Collection error types.

use thiserror::Error;

use crate::aggregation::AggregationError;
use crate::storage::StorageError;

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

#[derive(Debug, Error)]
pub enum CollectionError {
    /// Inserted value was not a JSON object
    #[error("Documents must be JSON objects")]
    NotAnObject,

    /// Storage log failure (I/O or corruption)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Document could not be encoded
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// Pipeline evaluation failed
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}
