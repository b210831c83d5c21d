//! Field inclusion masks.

use serde_json::{Map, Value};

use crate::document::ID_FIELD;

/// Inclusion projection over top-level fields.
///
/// `_id` is kept unless [`Projection::without_id`] is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
    include_id: bool,
}

impl Projection {
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            include_id: true,
        }
    }

    pub fn without_id(mut self) -> Self {
        self.include_id = false;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn includes_id(&self) -> bool {
        self.include_id
    }

    /// Renders the mask as a projection document
    pub fn to_json(&self) -> Value {
        let mut rendered = Map::new();
        if !self.include_id {
            rendered.insert(ID_FIELD.to_string(), Value::from(0));
        }
        for field in &self.fields {
            rendered.insert(field.clone(), Value::from(1));
        }
        Value::Object(rendered)
    }

    /// Applies the mask. Listed fields missing from the document stay missing.
    pub fn apply(&self, document: Value) -> Value {
        let Value::Object(source) = document else {
            return document;
        };

        let mut projected = Map::new();
        for (key, value) in source {
            let keep = if key == ID_FIELD {
                self.include_id
            } else {
                self.fields.iter().any(|f| *f == key)
            };
            if keep {
                projected.insert(key, value);
            }
        }
        Value::Object(projected)
    }
}
