//! Aggregation errors.

use serde_json::Value;
use thiserror::Error;

/// Result type for aggregation
pub type AggregationResult<T> = Result<T, AggregationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// `$bucket` boundaries are not an ascending list of at least two numbers
    #[error("Invalid $bucket boundaries: {0}")]
    InvalidBoundaries(String),

    /// A `$bucket` value fell outside every boundary and no default was given
    #[error("$bucket could not place value {value} and no default bucket is set")]
    NoMatchingBucket { value: Value },
}
