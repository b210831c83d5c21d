//! Named author statistics pipelines.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use super::model::{AUTHOR, PAGES};
use crate::aggregation::{
    Accumulator, AggregationResult, BucketSpec, Expression, Pipeline, Stage,
};
use crate::query::{Filter, Projection, SortSpec};

/// Author the `filter` pipeline selects
pub const STATS_AUTHOR: &str = "Author3";

/// Page-count bucket edges for the `bucket` pipeline
pub const PAGE_BOUNDARIES: [i64; 4] = [200, 300, 400, 500];

/// Bucket `_id` for page counts outside [`PAGE_BOUNDARIES`]
pub const OTHER_BUCKET: &str = "other";

/// Facet name wrapping the bucket results
pub const PAGES_FACET: &str = "books_by_number_of_pages";

/// Pipeline name that is not one of the known statistics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown statistics pipeline '{name}'")]
pub struct UnknownPipeline {
    pub name: String,
}

/// The statistics a client can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorPipeline {
    /// Books by [`STATS_AUTHOR`], author and pages only
    Filter,
    /// Average pages and book count per author, highest average first
    Group,
    /// Book counts per page range
    Bucket,
}

impl AuthorPipeline {
    pub const ALL: [AuthorPipeline; 3] = [
        AuthorPipeline::Filter,
        AuthorPipeline::Group,
        AuthorPipeline::Bucket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorPipeline::Filter => "filter",
            AuthorPipeline::Group => "group",
            AuthorPipeline::Bucket => "bucket",
        }
    }

    /// Builds the stages for this statistic
    pub fn pipeline(&self) -> AggregationResult<Pipeline> {
        let pipeline = match self {
            AuthorPipeline::Filter => Pipeline::new()
                .stage(Stage::Match(
                    Filter::all().eq(AUTHOR, Value::from(STATS_AUTHOR)),
                ))
                .stage(author_pages_projection()),
            AuthorPipeline::Group => Pipeline::new()
                .stage(Stage::Unwind(AUTHOR.to_string()))
                .stage(author_pages_projection())
                .stage(Stage::Group {
                    key: Expression::object([(AUTHOR, Expression::field(AUTHOR))]),
                    accumulators: vec![
                        (
                            "average_pages".to_string(),
                            Accumulator::Avg(Expression::field(PAGES)),
                        ),
                        ("total_books".to_string(), Accumulator::Count),
                    ],
                })
                .stage(Stage::Sort(SortSpec::desc("average_pages"))),
            AuthorPipeline::Bucket => {
                let boundaries = PAGE_BOUNDARIES.iter().copied().map(Value::from).collect();
                let bucket = BucketSpec::new(Expression::field(PAGES), boundaries)?
                    .default_bucket(OTHER_BUCKET)
                    .output("count", Accumulator::Sum(Expression::literal(1)));

                Pipeline::new().stage(Stage::Facet(vec![(
                    PAGES_FACET.to_string(),
                    Pipeline::new().stage(Stage::Bucket(bucket)),
                )]))
            }
        };
        Ok(pipeline)
    }
}

fn author_pages_projection() -> Stage {
    Stage::Project(Projection::include([AUTHOR, PAGES]).without_id())
}

impl fmt::Display for AuthorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorPipeline {
    type Err = UnknownPipeline;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthorPipeline::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPipeline {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_names() {
        for pipeline in AuthorPipeline::ALL {
            assert_eq!(pipeline.as_str().parse::<AuthorPipeline>().unwrap(), pipeline);
        }
        let err = "Group".parse::<AuthorPipeline>().unwrap_err();
        assert_eq!(err.name, "Group");
    }

    #[test]
    fn test_filter_stages() {
        let pipeline = AuthorPipeline::Filter.pipeline().unwrap();
        assert_eq!(
            pipeline.to_json(),
            json!([
                {"$match": {"author": "Author3"}},
                {"$project": {"_id": 0, "author": 1, "pages": 1}}
            ])
        );
    }

    #[test]
    fn test_group_stages() {
        let pipeline = AuthorPipeline::Group.pipeline().unwrap();
        assert_eq!(pipeline.stage_names(), vec!["$unwind", "$project", "$group", "$sort"]);
        assert_eq!(
            pipeline.stages()[2].to_json(),
            json!({"$group": {
                "_id": {"author": "$author"},
                "average_pages": {"$avg": "$pages"},
                "total_books": {"$count": {}}
            }})
        );
        assert_eq!(
            pipeline.stages()[3].to_json(),
            json!({"$sort": {"average_pages": -1}})
        );
    }

    #[test]
    fn test_bucket_stages() {
        let pipeline = AuthorPipeline::Bucket.pipeline().unwrap();
        assert_eq!(
            pipeline.to_json(),
            json!([{"$facet": {"books_by_number_of_pages": [{"$bucket": {
                "groupBy": "$pages",
                "boundaries": [200, 300, 400, 500],
                "default": "other",
                "output": {"count": {"$sum": 1}}
            }}]}}])
        );
    }

    #[test]
    fn test_bucket_counts_pages() {
        let docs = [200, 210, 250, 300, 200, 330, 405, 900]
            .iter()
            .map(|p| json!({"pages": p}))
            .collect();
        let result = AuthorPipeline::Bucket.pipeline().unwrap().run(docs).unwrap();
        assert_eq!(
            result,
            vec![json!({"books_by_number_of_pages": [
                {"_id": 200, "count": 4},
                {"_id": 300, "count": 2},
                {"_id": 400, "count": 1},
                {"_id": "other", "count": 1}
            ]})]
        );
    }
}
