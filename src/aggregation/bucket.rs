//! `$bucket` stage
//!
//! Documents land in `[boundaries[i], boundaries[i + 1])` by their group-by
//! value. Anything outside the range, non-numeric, or missing goes to the
//! default bucket. Output is one document per non-empty bucket, in boundary
//! order with the default bucket last.

use serde_json::{json, Map, Value};

use super::accumulator::{Accumulator, AccumulatorState};
use super::errors::{AggregationError, AggregationResult};
use super::expression::Expression;
use crate::document::ID_FIELD;

#[derive(Debug, Clone, PartialEq)]
pub struct BucketSpec {
    group_by: Expression,
    boundaries: Vec<f64>,
    boundary_values: Vec<Value>,
    default: Option<Value>,
    output: Vec<(String, Accumulator)>,
}

impl BucketSpec {
    /// Creates a bucket spec.
    ///
    /// Boundaries must be at least two numbers in strictly ascending order.
    pub fn new(group_by: Expression, boundaries: Vec<Value>) -> AggregationResult<Self> {
        if boundaries.len() < 2 {
            return Err(AggregationError::InvalidBoundaries(format!(
                "need at least 2 boundaries, got {}",
                boundaries.len()
            )));
        }

        let numeric = boundaries
            .iter()
            .map(|b| {
                b.as_f64().ok_or_else(|| {
                    AggregationError::InvalidBoundaries(format!("{} is not a number", b))
                })
            })
            .collect::<AggregationResult<Vec<f64>>>()?;

        if numeric.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(AggregationError::InvalidBoundaries(
                "boundaries must be strictly ascending".to_string(),
            ));
        }

        Ok(Self {
            group_by,
            boundaries: numeric,
            boundary_values: boundaries,
            default: None,
            output: Vec::new(),
        })
    }

    /// Sets the `_id` of the bucket collecting out-of-range values
    pub fn default_bucket(mut self, id: impl Into<Value>) -> Self {
        self.default = Some(id.into());
        self
    }

    /// Adds an output field. Without any, each bucket reports `count`.
    pub fn output(mut self, name: impl Into<String>, accumulator: Accumulator) -> Self {
        self.output.push((name.into(), accumulator));
        self
    }

    fn outputs(&self) -> Vec<(String, Accumulator)> {
        if self.output.is_empty() {
            vec![(
                "count".to_string(),
                Accumulator::Sum(Expression::literal(1)),
            )]
        } else {
            self.output.clone()
        }
    }

    fn slot_for(&self, value: Option<&Value>) -> Option<usize> {
        let n = value.and_then(Value::as_f64)?;
        self.boundaries.windows(2).position(|pair| pair[0] <= n && n < pair[1])
    }

    pub(crate) fn run(&self, documents: Vec<Value>) -> AggregationResult<Vec<Value>> {
        let outputs = self.outputs();
        let fresh = || -> Vec<AccumulatorState> { outputs.iter().map(|(_, a)| a.start()).collect() };

        // One slot per range, plus the default bucket at the end
        let range_count = self.boundaries.len() - 1;
        let mut slots: Vec<Option<Vec<AccumulatorState>>> = vec![None; range_count + 1];

        for document in &documents {
            let value = self.group_by.evaluate(document);
            let slot = match self.slot_for(value.as_ref()) {
                Some(slot) => slot,
                None if self.default.is_some() => range_count,
                None => {
                    return Err(AggregationError::NoMatchingBucket {
                        value: value.unwrap_or(Value::Null),
                    })
                }
            };

            let states = slots[slot].get_or_insert_with(fresh);
            for (state, (_, accumulator)) in states.iter_mut().zip(&outputs) {
                state.add(accumulator, document);
            }
        }

        let mut results = Vec::new();
        for (slot, states) in slots.into_iter().enumerate() {
            let Some(states) = states else { continue };

            let id = if slot == range_count {
                self.default.clone().unwrap_or(Value::Null)
            } else {
                self.boundary_values[slot].clone()
            };

            let mut bucket = Map::new();
            bucket.insert(ID_FIELD.to_string(), id);
            for (state, (name, _)) in states.into_iter().zip(&outputs) {
                bucket.insert(name.clone(), state.finish());
            }
            results.push(Value::Object(bucket));
        }

        Ok(results)
    }

    pub fn to_json(&self) -> Value {
        let mut spec = Map::new();
        spec.insert("groupBy".into(), self.group_by.to_json());
        spec.insert("boundaries".into(), Value::Array(self.boundary_values.clone()));
        if let Some(default) = &self.default {
            spec.insert("default".into(), default.clone());
        }
        if !self.output.is_empty() {
            let output: Map<String, Value> = self
                .output
                .iter()
                .map(|(name, accumulator)| (name.clone(), accumulator.to_json()))
                .collect();
            spec.insert("output".into(), Value::Object(output));
        }
        json!({ "$bucket": spec })
    }
}
