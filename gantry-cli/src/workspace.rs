//! Workspace
//!
//! Wires the engine up against a configuration document on disk: loads the
//! document into an in-memory store, builds the pipeline config service and
//! writes the document back after a successful change.

use anyhow::{Context, Result};
use gantry_config::document::ConfigDocument;
use gantry_config::repository::{ConfigurationStore, InMemoryConfigStore};
use gantry_config::service::PipelineConfigService;
use gantry_config::service::authorization::GroupAuthorizationService;
use gantry_config::service::validation::default_validators;
use gantry_config::settings::EngineSettings;
use gantry_core::domain::snapshot::ConfigSnapshot;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Workspace {
    path: PathBuf,
    document: ConfigDocument,
    settings: EngineSettings,
    store: Arc<InMemoryConfigStore>,
    service: PipelineConfigService,
}

impl Workspace {
    /// Loads the document and builds the engine around it
    pub fn open(path: &Path) -> Result<Self> {
        let document = ConfigDocument::load(path).with_context(|| {
            format!("Failed to load configuration document: {}", path.display())
        })?;
        let settings = EngineSettings::from_env().context("Invalid engine settings")?;

        let store = Arc::new(InMemoryConfigStore::with_settings(
            document.config.clone(),
            settings.clone(),
        ));
        let shared: Arc<dyn ConfigurationStore> = store.clone();

        let authorization = Arc::new(GroupAuthorizationService::new(
            Arc::clone(&shared),
            document.super_admins.clone(),
        ));
        let validators = default_validators(&settings, Arc::new(document.task_plugins()));
        let service = PipelineConfigService::new(shared, authorization, validators);

        tracing::debug!(
            "Opened {} ({} pipelines, revision {})",
            path.display(),
            document.config.pipeline_count(),
            document.config.revision.number
        );

        Ok(Self {
            path: path.to_path_buf(),
            document,
            settings,
            store,
            service,
        })
    }

    pub fn service(&self) -> &PipelineConfigService {
        &self.service
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The document as loaded, before any change made through this workspace
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Writes the store's current snapshot back to the document file
    pub fn save(&self) -> Result<()> {
        let mut document = self.document.clone();
        document.config = ConfigSnapshot::clone(&self.store.current_snapshot());
        document
            .save(&self.path)
            .with_context(|| format!("Failed to save {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::name::PipelineName;
    use gantry_core::domain::principal::Principal;
    use gantry_core::dto::pipeline::DeletePipeline;

    const DOCUMENT: &str = r#"{
        "groups": [{
            "name": "apps",
            "pipelines": [
                {"name": "build-app", "stages": [{"name": "s", "jobs": [{"name": "j"}]}]},
                {"name": "lint", "stages": [{"name": "s", "jobs": [{"name": "j"}]}]}
            ]
        }]
    }"#;

    #[test]
    fn test_delete_is_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gantry.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let workspace = Workspace::open(&path).unwrap();
        let current = workspace.service().pipeline_with_fingerprint("lint").unwrap();
        let result = workspace.service().delete_pipeline_config(
            Principal::new("anyone"),
            DeletePipeline {
                name: PipelineName::new("lint"),
                fingerprint: current.fingerprint,
            },
        );
        assert!(result.is_successful());
        workspace.save().unwrap();

        let reloaded = ConfigDocument::load(&path).unwrap();
        assert_eq!(reloaded.config.pipeline_count(), 1);
        assert_eq!(reloaded.config.revision.number, 1);
        assert_eq!(
            reloaded.config.revision.author,
            Some(Principal::new("anyone"))
        );
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workspace::open(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
