//! Aggregation stages and their evaluation.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use super::accumulator::{Accumulator, AccumulatorState};
use super::bucket::BucketSpec;
use super::errors::AggregationResult;
use super::expression::Expression;
use super::pipeline::Pipeline;
use crate::document::ID_FIELD;
use crate::query::{Filter, Projection, SortSpec};

/// One step of an aggregation pipeline
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep documents matching the filter
    Match(Filter),
    /// Reshape documents with an inclusion projection
    Project(Projection),
    /// Emit one document per element of an array field
    Unwind(String),
    /// Group documents by key and fold accumulators
    Group {
        key: Expression,
        accumulators: Vec<(String, Accumulator)>,
    },
    /// Reorder documents
    Sort(SortSpec),
    /// Partition by numeric ranges
    Bucket(BucketSpec),
    /// Run named sub-pipelines over the same input
    Facet(Vec<(String, Pipeline)>),
}

impl Stage {
    /// Stage operator name, e.g. `$match`
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Project(_) => "$project",
            Stage::Unwind(_) => "$unwind",
            Stage::Group { .. } => "$group",
            Stage::Sort(_) => "$sort",
            Stage::Bucket(_) => "$bucket",
            Stage::Facet(_) => "$facet",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Stage::Match(filter) => json!({ "$match": filter.to_json() }),
            Stage::Project(projection) => json!({ "$project": projection.to_json() }),
            Stage::Unwind(field) => json!({ "$unwind": format!("${}", field) }),
            Stage::Group { key, accumulators } => {
                let mut group = Map::new();
                group.insert(ID_FIELD.to_string(), key.to_json());
                for (name, accumulator) in accumulators {
                    group.insert(name.clone(), accumulator.to_json());
                }
                json!({ "$group": group })
            }
            Stage::Sort(sort) => json!({ "$sort": sort.to_json() }),
            Stage::Bucket(spec) => spec.to_json(),
            Stage::Facet(facets) => {
                let rendered: Map<String, Value> = facets
                    .iter()
                    .map(|(name, pipeline)| (name.clone(), pipeline.to_json()))
                    .collect();
                json!({ "$facet": rendered })
            }
        }
    }

    pub(crate) fn run(&self, documents: Vec<Value>) -> AggregationResult<Vec<Value>> {
        match self {
            Stage::Match(filter) => Ok(documents
                .into_iter()
                .filter(|d| filter.matches(d))
                .collect()),
            Stage::Project(projection) => Ok(documents
                .into_iter()
                .map(|d| projection.apply(d))
                .collect()),
            Stage::Unwind(field) => Ok(unwind(documents, field)),
            Stage::Group { key, accumulators } => Ok(group(documents, key, accumulators)),
            Stage::Sort(sort) => {
                let mut documents = documents;
                sort.sort(&mut documents);
                Ok(documents)
            }
            Stage::Bucket(spec) => spec.run(documents),
            Stage::Facet(facets) => {
                let mut output = Map::new();
                for (name, pipeline) in facets {
                    let results = pipeline.run(documents.clone())?;
                    output.insert(name.clone(), Value::Array(results));
                }
                Ok(vec![Value::Object(output)])
            }
        }
    }
}

/// Arrays fan out; scalars pass through; missing, null, and `[]` drop out.
fn unwind(documents: Vec<Value>, field: &str) -> Vec<Value> {
    let mut output = Vec::with_capacity(documents.len());
    for document in documents {
        let fan_out = match document.get(field) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => None,
        };
        let Some(items) = fan_out else {
            output.push(document);
            continue;
        };

        for item in items {
            let mut unwound = document.clone();
            if let Some(object) = unwound.as_object_mut() {
                object.insert(field.to_string(), item);
            }
            output.push(unwound);
        }
    }
    output
}

/// Groups are emitted in the order their key was first seen.
fn group(
    documents: Vec<Value>,
    key: &Expression,
    accumulators: &[(String, Accumulator)],
) -> Vec<Value> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<AccumulatorState>)> = Vec::new();

    for document in &documents {
        let group_key = key.evaluate(document).unwrap_or(Value::Null);
        let slot = *index.entry(group_key.to_string()).or_insert_with(|| {
            let states = accumulators.iter().map(|(_, a)| a.start()).collect();
            groups.push((group_key.clone(), states));
            groups.len() - 1
        });

        for (state, (_, accumulator)) in groups[slot].1.iter_mut().zip(accumulators) {
            state.add(accumulator, document);
        }
    }

    groups
        .into_iter()
        .map(|(group_key, states)| {
            let mut output = Map::new();
            output.insert(ID_FIELD.to_string(), group_key);
            for (state, (name, _)) in states.into_iter().zip(accumulators) {
                output.insert(name.clone(), state.finish());
            }
            Value::Object(output)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwind_scalar_passes_through() {
        let docs = vec![json!({"author": "Author1", "pages": 200})];
        let out = Stage::Unwind("author".into()).run(docs.clone()).unwrap();
        assert_eq!(out, docs);
    }

    #[test]
    fn test_unwind_array_fans_out() {
        let docs = vec![json!({"author": ["A", "B"], "pages": 1})];
        let out = Stage::Unwind("author".into()).run(docs).unwrap();
        assert_eq!(
            out,
            vec![json!({"author": "A", "pages": 1}), json!({"author": "B", "pages": 1})]
        );
    }

    #[test]
    fn test_unwind_drops_missing_null_and_empty() {
        let docs = vec![json!({"pages": 1}), json!({"author": null}), json!({"author": []})];
        assert!(Stage::Unwind("author".into()).run(docs).unwrap().is_empty());
    }

    #[test]
    fn test_group_first_seen_order_and_accumulators() {
        let docs = vec![
            json!({"author": "B", "pages": 100}),
            json!({"author": "A", "pages": 300}),
            json!({"author": "B", "pages": 200}),
        ];
        let stage = Stage::Group {
            key: Expression::object([("author", Expression::field("author"))]),
            accumulators: vec![
                ("average_pages".into(), Accumulator::Avg(Expression::field("pages"))),
                ("total_books".into(), Accumulator::Count),
            ],
        };
        let out = stage.run(docs).unwrap();
        assert_eq!(
            out,
            vec![
                json!({"_id": {"author": "B"}, "average_pages": 150.0, "total_books": 2}),
                json!({"_id": {"author": "A"}, "average_pages": 300.0, "total_books": 1}),
            ]
        );
    }

    #[test]
    fn test_group_on_empty_input() {
        let stage = Stage::Group {
            key: Expression::field("author"),
            accumulators: vec![("n".into(), Accumulator::Count)],
        };
        assert!(stage.run(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_facet_emits_single_document() {
        let facet = Stage::Facet(vec![
            ("all".into(), Pipeline::new()),
            (
                "big".into(),
                Pipeline::new().stage(Stage::Match(Filter::all().eq("pages", json!(2)))),
            ),
        ]);
        let out = facet.run(vec![json!({"pages": 1}), json!({"pages": 2})]).unwrap();
        assert_eq!(
            out,
            vec![json!({"all": [{"pages": 1}, {"pages": 2}], "big": [{"pages": 2}]})]
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Unwind("author".into()).name(), "$unwind");
        assert_eq!(Stage::Sort(SortSpec::desc("x")).name(), "$sort");
    }
}
