//! Ordered stage lists.

use serde_json::Value;

use super::errors::AggregationResult;
use super::stage::Stage;

/// An ordered sequence of stages. Each stage consumes the previous output.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Operator names in order, for logging
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Runs every stage over `documents`. The first failing stage aborts the run.
    pub fn run(&self, documents: Vec<Value>) -> AggregationResult<Vec<Value>> {
        self.stages
            .iter()
            .try_fold(documents, |current, stage| stage.run(current))
    }

    /// Renders the pipeline as an array of stage documents
    pub fn to_json(&self) -> Value {
        Value::Array(self.stages.iter().map(Stage::to_json).collect())
    }
}

impl FromIterator<Stage> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}
