//! Environment domain types

use serde::{Deserialize, Serialize};

use super::name::{EnvironmentName, PipelineName};

/// Named set of pipeline memberships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: EnvironmentName,
    #[serde(default)]
    pub pipelines: Vec<PipelineName>,
}

impl Environment {
    pub fn new(name: impl Into<EnvironmentName>) -> Self {
        Self {
            name: name.into(),
            pipelines: Vec::new(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: impl Into<PipelineName>) -> Self {
        self.pipelines.push(pipeline.into());
        self
    }

    pub fn contains(&self, pipeline: &PipelineName) -> bool {
        self.pipelines.contains(pipeline)
    }
}
