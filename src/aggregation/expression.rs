//! Stage expressions: field paths, literals, and object expressions.

use serde_json::{Map, Value};

use crate::document::lookup;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `"$field.path"`
    Field(String),
    /// A constant value
    Literal(Value),
    /// `{ name: <expression>, ... }`
    Object(Vec<(String, Expression)>),
}

impl Expression {
    pub fn field(path: impl Into<String>) -> Self {
        Expression::Field(path.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn object<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Expression)>,
        S: Into<String>,
    {
        Expression::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Evaluates against a document. `None` means the value is missing.
    ///
    /// Missing fields inside an object expression are left out of the result.
    pub fn evaluate(&self, document: &Value) -> Option<Value> {
        match self {
            Expression::Field(path) => lookup(document, path).cloned(),
            Expression::Literal(value) => Some(value.clone()),
            Expression::Object(entries) => {
                let mut result = Map::new();
                for (name, expression) in entries {
                    if let Some(value) = expression.evaluate(document) {
                        result.insert(name.clone(), value);
                    }
                }
                Some(Value::Object(result))
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Expression::Field(path) => Value::String(format!("${}", path)),
            Expression::Literal(value) => value.clone(),
            Expression::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(name, expression)| (name.clone(), expression.to_json()))
                    .collect(),
            ),
        }
    }
}
