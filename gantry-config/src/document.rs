//! Configuration document
//!
//! JSON file holding the configuration graph plus the server-level sections
//! the engine needs around it (super admins, task plugin declarations).

use gantry_core::domain::principal::Principal;
use gantry_core::domain::snapshot::ConfigSnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DocumentError;
use crate::service::validation::StaticTaskPlugins;

/// Task plugin installed on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPluginDeclaration {
    pub id: String,
    /// Configuration keys every task of this plugin must set
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub super_admins: Vec<Principal>,
    #[serde(default)]
    pub task_plugins: Vec<TaskPluginDeclaration>,
    #[serde(flatten)]
    pub config: ConfigSnapshot,
}

impl ConfigDocument {
    /// Reads a document from a JSON file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Writes the document as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::debug!("Wrote configuration document to {}", path.display());
        Ok(())
    }

    /// Plugin host built from the declared task plugins
    pub fn task_plugins(&self) -> StaticTaskPlugins {
        self.task_plugins
            .iter()
            .fold(StaticTaskPlugins::new(), |plugins, declaration| {
                plugins.register(declaration.id.clone(), declaration.required.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validation::TaskPluginService;
    use gantry_core::domain::name::PipelineName;
    use gantry_core::domain::pipeline::PluggableTask;

    const DOCUMENT: &str = r#"{
        "super_admins": ["root"],
        "task_plugins": [{"id": "gradle", "required": ["tasks"]}],
        "groups": [{
            "name": "apps",
            "pipelines": [
                {"name": "build-app"},
                {"name": "deploy-app", "upstream": ["build-app"],
                 "origin": {"kind": "remote", "repository": "infra-repo"}}
            ]
        }],
        "environments": [{"name": "staging", "pipelines": ["deploy-app"]}]
    }"#;

    #[test]
    fn test_parse_document() {
        let document = ConfigDocument::from_json(DOCUMENT).unwrap();

        assert_eq!(document.super_admins, vec![Principal::new("ROOT")]);
        assert_eq!(document.config.pipeline_count(), 2);
        assert_eq!(document.config.revision.number, 0);

        let deploy = document
            .config
            .find_pipeline(&PipelineName::new("deploy-app"))
            .unwrap();
        assert_eq!(deploy.origin.display_name(), "infra-repo");
        assert!(
            document
                .config
                .environment_for(&PipelineName::new("deploy-app"))
                .is_some()
        );
    }

    #[test]
    fn test_declared_plugins_validate_tasks() {
        let document = ConfigDocument::from_json(DOCUMENT).unwrap();
        let plugins = document.task_plugins();

        assert_eq!(plugins.validate(&PluggableTask::new("gradle", "1")).len(), 1);
        assert!(
            plugins
                .validate(&PluggableTask::new("gradle", "1").with_property("tasks", "build"))
                .is_empty()
        );
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let result = ConfigDocument::from_json("{ not json");
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }
}
