//! Structural validation
//!
//! Validators inspect a proposed pipeline definition before anything is
//! sent to the store. Each validator reports every problem it finds, and
//! the executor runs all of them, so callers can see the full list of
//! errors in the logs even though the result only carries the first.

use gantry_core::domain::pipeline::{Pipeline, PluggableTask};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::settings::EngineSettings;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-.]+$").expect("pipeline name pattern is valid")
});

/// A single problem found in a proposed definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending attribute (e.g. "stages.build.jobs")
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check run against the proposed state of a create or update
pub trait StructuralValidator: Send + Sync {
    /// Returns every problem found; empty means valid
    fn validate(&self, proposed: &Pipeline) -> Vec<ValidationError>;
}

// =============================================================================
// Pipeline name
// =============================================================================

pub struct PipelineNameValidator {
    max_length: usize,
}

impl PipelineNameValidator {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            max_length: settings.max_name_length,
        }
    }
}

impl StructuralValidator for PipelineNameValidator {
    fn validate(&self, proposed: &Pipeline) -> Vec<ValidationError> {
        let name = proposed.name.as_str();

        if name.trim().is_empty() {
            return vec![ValidationError::new("name", "Pipeline name cannot be empty")];
        }

        let mut errors = Vec::new();
        if name.chars().count() > self.max_length {
            errors.push(ValidationError::new(
                "name",
                format!(
                    "Pipeline name is too long (max {} characters)",
                    self.max_length
                ),
            ));
        }
        if !NAME_PATTERN.is_match(name) {
            errors.push(ValidationError::new(
                "name",
                format!(
                    "Invalid pipeline name '{}'. This must be alphanumeric and can contain underscores, hyphens and periods.",
                    name
                ),
            ));
        }
        errors
    }
}

// =============================================================================
// Stage layout
// =============================================================================

/// Requires at least one stage, unique stage names and a job in every stage
pub struct StageLayoutValidator;

impl StructuralValidator for StageLayoutValidator {
    fn validate(&self, proposed: &Pipeline) -> Vec<ValidationError> {
        if proposed.stages.is_empty() {
            return vec![ValidationError::new(
                "stages",
                "A pipeline must have at least one stage",
            )];
        }

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for stage in &proposed.stages {
            if !seen.insert(stage.name.to_lowercase()) {
                errors.push(ValidationError::new(
                    format!("stages.{}", stage.name),
                    format!("Stage name '{}' is used more than once", stage.name),
                ));
            }
            if stage.jobs.is_empty() {
                errors.push(ValidationError::new(
                    format!("stages.{}.jobs", stage.name),
                    format!("Stage '{}' must have at least one job", stage.name),
                ));
            }
        }
        errors
    }
}

// =============================================================================
// Pluggable tasks
// =============================================================================

/// Plugin host that knows how to validate its own task configuration
pub trait TaskPluginService: Send + Sync {
    fn validate(&self, task: &PluggableTask) -> Vec<ValidationError>;
}

/// Hands every pluggable task of the pipeline to the plugin host
pub struct PluggableTaskValidator {
    plugins: Arc<dyn TaskPluginService>,
}

impl PluggableTaskValidator {
    pub fn new(plugins: Arc<dyn TaskPluginService>) -> Self {
        Self { plugins }
    }
}

impl StructuralValidator for PluggableTaskValidator {
    fn validate(&self, proposed: &Pipeline) -> Vec<ValidationError> {
        proposed
            .pluggable_tasks()
            .flat_map(|task| self.plugins.validate(task))
            .collect()
    }
}

/// Plugin host backed by a fixed table of plugins and their required
/// configuration keys
#[derive(Debug, Clone, Default)]
pub struct StaticTaskPlugins {
    required: HashMap<String, Vec<String>>,
}

impl StaticTaskPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin with the configuration keys it requires
    pub fn register(mut self, plugin_id: impl Into<String>, required: Vec<String>) -> Self {
        self.required.insert(plugin_id.into(), required);
        self
    }
}

impl TaskPluginService for StaticTaskPlugins {
    fn validate(&self, task: &PluggableTask) -> Vec<ValidationError> {
        let Some(required) = self.required.get(&task.plugin_id) else {
            return vec![ValidationError::new(
                format!("tasks.{}", task.plugin_id),
                format!("Plugin with id '{}' is not found.", task.plugin_id),
            )];
        };

        required
            .iter()
            .filter(|key| {
                task.configuration
                    .get(key.as_str())
                    .is_none_or(|value| value.trim().is_empty())
            })
            .map(|key| {
                ValidationError::new(
                    format!("tasks.{}.{}", task.plugin_id, key),
                    format!("{} must not be blank", key),
                )
            })
            .collect()
    }
}

/// The built-in validators, in the order the executor runs them
pub fn default_validators(
    settings: &EngineSettings,
    plugins: Arc<dyn TaskPluginService>,
) -> Vec<Box<dyn StructuralValidator>> {
    vec![
        Box::new(PipelineNameValidator::new(settings)),
        Box::new(StageLayoutValidator),
        Box::new(PluggableTaskValidator::new(plugins)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::pipeline::{Job, Stage, Task};

    fn valid_pipeline() -> Pipeline {
        Pipeline::new("build-app").with_stage(
            Stage::new("compile").with_job(Job::new("unit").with_task(Task::exec("make"))),
        )
    }

    #[test]
    fn test_validate_empty_name() {
        let validator = PipelineNameValidator::new(&EngineSettings::default());
        let errors = validator.validate(&Pipeline::new("  "));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Pipeline name cannot be empty");
    }

    #[test]
    fn test_validate_name_pattern_and_length() {
        let settings = EngineSettings {
            max_name_length: 5,
            ..EngineSettings::default()
        };
        let validator = PipelineNameValidator::new(&settings);

        let errors = validator.validate(&Pipeline::new("has spaces"));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("too long"));
        assert!(errors[1].message.contains("Invalid pipeline name 'has spaces'"));

        assert!(validator.validate(&Pipeline::new("a.b-c")).is_empty());
    }

    #[test]
    fn test_validate_stage_layout() {
        let errors = StageLayoutValidator.validate(&Pipeline::new("build-app"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "stages");

        let pipeline = Pipeline::new("build-app")
            .with_stage(Stage::new("compile").with_job(Job::new("unit")))
            .with_stage(Stage::new("Compile"));
        let errors = StageLayoutValidator.validate(&pipeline);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("more than once"));
        assert!(errors[1].message.contains("at least one job"));

        assert!(StageLayoutValidator.validate(&valid_pipeline()).is_empty());
    }

    #[test]
    fn test_pluggable_tasks_are_checked_by_plugin_host() {
        let plugins = StaticTaskPlugins::new().register("gradle", vec!["tasks".to_string()]);
        let validator = PluggableTaskValidator::new(Arc::new(plugins));

        let pipeline = Pipeline::new("build-app").with_stage(
            Stage::new("compile").with_job(
                Job::new("unit")
                    .with_task(Task::Pluggable(PluggableTask::new("gradle", "1")))
                    .with_task(Task::Pluggable(
                        PluggableTask::new("gradle", "1").with_property("tasks", "build"),
                    ))
                    .with_task(Task::Pluggable(PluggableTask::new("unknown", "1"))),
            ),
        );

        let errors = validator.validate(&pipeline);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "tasks must not be blank");
        assert_eq!(errors[1].message, "Plugin with id 'unknown' is not found.");
    }

    #[test]
    fn test_default_validators_accept_valid_pipeline() {
        let validators = default_validators(
            &EngineSettings::default(),
            Arc::new(StaticTaskPlugins::new()),
        );
        assert_eq!(validators.len(), 3);
        assert!(
            validators
                .iter()
                .all(|validator| validator.validate(&valid_pipeline()).is_empty())
        );
    }
}
