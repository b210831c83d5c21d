//! Group accumulators.

use serde_json::{json, Value};

use super::expression::Expression;

/// Accumulator operator used by `$group` and `$bucket` output fields
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Mean of the numeric values; null when there are none
    Avg(Expression),
    /// Sum of the numeric values; non-numeric values are ignored
    Sum(Expression),
    /// Number of documents in the group
    Count,
}

impl Accumulator {
    pub(crate) fn start(&self) -> AccumulatorState {
        match self {
            Accumulator::Avg(_) => AccumulatorState::Avg { total: 0.0, count: 0 },
            Accumulator::Sum(_) => AccumulatorState::Sum {
                int_total: 0,
                float_total: 0.0,
                saw_float: false,
            },
            Accumulator::Count => AccumulatorState::Count(0),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Accumulator::Avg(expression) => json!({ "$avg": expression.to_json() }),
            Accumulator::Sum(expression) => json!({ "$sum": expression.to_json() }),
            Accumulator::Count => json!({ "$count": {} }),
        }
    }
}

/// Running state for one accumulator within one group
#[derive(Debug, Clone)]
pub(crate) enum AccumulatorState {
    Avg {
        total: f64,
        count: u64,
    },
    Sum {
        int_total: i64,
        float_total: f64,
        saw_float: bool,
    },
    Count(u64),
}

impl AccumulatorState {
    pub(crate) fn add(&mut self, accumulator: &Accumulator, document: &Value) {
        match (self, accumulator) {
            (AccumulatorState::Avg { total, count }, Accumulator::Avg(expression)) => {
                if let Some(n) = expression.evaluate(document).as_ref().and_then(Value::as_f64) {
                    *total += n;
                    *count += 1;
                }
            }
            (
                AccumulatorState::Sum {
                    int_total,
                    float_total,
                    saw_float,
                },
                Accumulator::Sum(expression),
            ) => match expression.evaluate(document) {
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(i) => match int_total.checked_add(i) {
                        Some(sum) => *int_total = sum,
                        None => {
                            *saw_float = true;
                            *float_total += i as f64;
                        }
                    },
                    None => {
                        *saw_float = true;
                        *float_total += n.as_f64().unwrap_or(0.0);
                    }
                },
                _ => {}
            },
            (AccumulatorState::Count(count), Accumulator::Count) => *count += 1,
            _ => {}
        }
    }

    pub(crate) fn finish(self) -> Value {
        match self {
            AccumulatorState::Avg { count: 0, .. } => Value::Null,
            AccumulatorState::Avg { total, count } => json!(total / count as f64),
            AccumulatorState::Sum {
                int_total,
                float_total,
                saw_float,
            } => {
                if saw_float {
                    json!(int_total as f64 + float_total)
                } else {
                    json!(int_total)
                }
            }
            AccumulatorState::Count(count) => json!(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(accumulator: &Accumulator, documents: &[Value]) -> Value {
        let mut state = accumulator.start();
        for doc in documents {
            state.add(accumulator, doc);
        }
        state.finish()
    }

    #[test]
    fn test_avg_ignores_non_numeric() {
        let acc = Accumulator::Avg(Expression::field("pages"));
        let docs = [json!({"pages": 200}), json!({"pages": "n/a"}), json!({"pages": 400})];
        assert_eq!(run(&acc, &docs), json!(300.0));
    }

    #[test]
    fn test_avg_of_nothing_is_null() {
        let acc = Accumulator::Avg(Expression::field("pages"));
        assert_eq!(run(&acc, &[json!({})]), Value::Null);
    }

    #[test]
    fn test_sum_of_literal_counts_documents() {
        let acc = Accumulator::Sum(Expression::literal(1));
        assert_eq!(run(&acc, &[json!({}), json!({}), json!({})]), json!(3));
    }

    #[test]
    fn test_sum_switches_to_float() {
        let acc = Accumulator::Sum(Expression::field("x"));
        assert_eq!(run(&acc, &[json!({"x": 1}), json!({"x": 0.5})]), json!(1.5));
    }

    #[test]
    fn test_count() {
        assert_eq!(run(&Accumulator::Count, &[json!({}), json!({})]), json!(2));
    }
}
