//! Find options
//!
//! Applied in a fixed order regardless of how they were built:
//! sort, skip, limit, projection.

use serde_json::Value;

use super::projection::Projection;
use super::sort::SortSpec;

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub projection: Option<Projection>,
    pub sort: Option<SortSpec>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies these options to already-filtered documents.
    pub fn apply(&self, mut documents: Vec<Value>) -> Vec<Value> {
        if let Some(sort) = &self.sort {
            sort.sort(&mut documents);
        }

        let window = documents
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX));

        match &self.projection {
            Some(projection) => window.map(|d| projection.apply(d)).collect(),
            None => window.collect(),
        }
    }
}
