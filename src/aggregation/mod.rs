//! Aggregation engine for bookshelf collections
//!
//! Pipelines are typed stage lists evaluated over JSON documents.
//! Supported stages: `$match`, `$project`, `$unwind`, `$group`, `$sort`,
//! `$bucket`, `$facet`. Accumulators: `$avg`, `$sum`, `$count`.

mod accumulator;
mod bucket;
mod errors;
mod expression;
mod pipeline;
mod stage;

pub use accumulator::Accumulator;
pub use bucket::BucketSpec;
pub use errors::{AggregationError, AggregationResult};
pub use expression::Expression;
pub use pipeline::Pipeline;
pub use stage::Stage;
