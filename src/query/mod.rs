//! Find query engine for bookshelf collections
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter documents by predicates
//! 2. Apply sort (if specified)
//! 3. Apply skip
//! 4. Apply limit
//! 5. Apply projection
//! 6. Return a cursor over the results

mod cursor;
mod errors;
mod filter;
mod options;
mod projection;
mod sort;

pub use cursor::{Cursor, Decoded};
pub use errors::{QueryError, QueryResult};
pub use filter::{Condition, Filter, Predicate};
pub use options::FindOptions;
pub use projection::Projection;
pub use sort::{SortDirection, SortKey, SortSpec};
