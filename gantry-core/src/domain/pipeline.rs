//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::name::PipelineName;

/// Pipeline definition
///
/// A node of the configuration graph. Pipelines are identified by their
/// case-insensitive name, which is unique across the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: PipelineName,
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Pipelines this one depends on (dependency materials)
    #[serde(default)]
    pub upstream: Vec<PipelineName>,
    #[serde(default)]
    pub origin: Origin,
}

impl Pipeline {
    pub fn new(name: impl Into<PipelineName>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            upstream: Vec::new(),
            origin: Origin::Local,
        }
    }

    /// Adds a stage
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Adds an upstream dependency
    pub fn depends_on(mut self, upstream: impl Into<PipelineName>) -> Self {
        self.upstream.push(upstream.into());
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Every pluggable task of the pipeline, in stage, job and task order
    pub fn pluggable_tasks(&self) -> impl Iterator<Item = &PluggableTask> {
        self.stages
            .iter()
            .flat_map(|stage| stage.jobs.iter())
            .flat_map(|job| job.tasks.iter())
            .filter_map(|task| match task {
                Task::Pluggable(task) => Some(task),
                Task::Exec { .. } => None,
            })
    }
}

/// Stage of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jobs: Vec::new(),
        }
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }
}

/// Job within a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

/// Task executed by a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Task {
    /// Built-in command task
    Exec {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Task implemented by a plugin; its configuration is only meaningful
    /// to that plugin
    Pluggable(PluggableTask),
}

impl Task {
    pub fn exec(command: impl Into<String>) -> Self {
        Task::Exec {
            command: command.into(),
            args: Vec::new(),
        }
    }
}

/// Plugin-backed task configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluggableTask {
    pub plugin_id: String,
    pub version: String,
    #[serde(default)]
    pub configuration: BTreeMap<String, String>,
}

impl PluggableTask {
    pub fn new(plugin_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            version: version.into(),
            configuration: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }
}

/// Where a pipeline definition comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Authored directly in the configuration document
    #[default]
    Local,
    /// Materialized from a configuration repository
    Remote { repository: String },
}

impl Origin {
    pub fn remote(repository: impl Into<String>) -> Self {
        Origin::Remote {
            repository: repository.into(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Origin::Local)
    }

    pub fn display_name(&self) -> &str {
        match self {
            Origin::Local => "local",
            Origin::Remote { repository } => repository,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluggable_tasks_are_collected_in_order() {
        let pipeline = Pipeline::new("build-app")
            .with_stage(
                Stage::new("compile")
                    .with_job(
                        Job::new("unit")
                            .with_task(Task::exec("make"))
                            .with_task(Task::Pluggable(PluggableTask::new("gradle", "1"))),
                    )
                    .with_job(Job::new("lint").with_task(Task::Pluggable(PluggableTask::new(
                        "eslint", "2",
                    )))),
            )
            .with_stage(Stage::new("package").with_job(Job::new("tar")));

        let ids: Vec<&str> = pipeline
            .pluggable_tasks()
            .map(|task| task.plugin_id.as_str())
            .collect();
        assert_eq!(ids, vec!["gradle", "eslint"]);
    }

    #[test]
    fn test_missing_origin_defaults_to_local() {
        let pipeline: Pipeline = serde_json::from_str(r#"{"name": "build-app"}"#).unwrap();
        assert!(pipeline.origin.is_local());
        assert!(pipeline.stages.is_empty());
    }

    #[test]
    fn test_remote_origin_display_name() {
        let origin: Origin =
            serde_json::from_str(r#"{"kind": "remote", "repository": "infra-repo"}"#).unwrap();
        assert!(!origin.is_local());
        assert_eq!(origin.display_name(), "infra-repo");
    }
}
