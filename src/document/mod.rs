//! Document model shared by the query and aggregation engines.
//!
//! Documents are `serde_json::Value` objects. The store keeps the
//! identifier under [`ID_FIELD`] as a hex string.

mod object_id;
mod ordering;

pub use object_id::{InvalidObjectId, ObjectId};
pub use ordering::{compare_values, lookup};

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";
