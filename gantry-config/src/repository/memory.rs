//! In-memory configuration store
//!
//! Keeps the live document behind a read-write lock. Readers get a cheap
//! `Arc` to the current snapshot; a commit builds a private draft, checks
//! it and swaps it in while holding the write lock, so concurrent commits
//! are serialized and a reader never observes a half-applied change.

use gantry_core::domain::fingerprint::Fingerprint;
use gantry_core::domain::snapshot::{ConfigRevision, ConfigSnapshot};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use super::invariants::check_document;
use super::store::ConfigurationStore;
use crate::command::MutationCommand;
use crate::error::StoreError;
use crate::settings::EngineSettings;

pub struct InMemoryConfigStore {
    current: RwLock<Arc<ConfigSnapshot>>,
    settings: EngineSettings,
}

impl InMemoryConfigStore {
    /// Creates a store seeded with the given document
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self::with_settings(snapshot, EngineSettings::default())
    }

    pub fn with_settings(snapshot: ConfigSnapshot, settings: EngineSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            settings,
        }
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new(ConfigSnapshot::default())
    }
}

impl ConfigurationStore for InMemoryConfigStore {
    fn current_snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.current.read())
    }

    fn commit(
        &self,
        command: &MutationCommand,
        expected: Option<&Fingerprint>,
    ) -> Result<ConfigRevision, StoreError> {
        let mut current = self.current.write();

        if let Some(expected) = expected {
            let live = current.find_pipeline(command.target()).map(Fingerprint::of);
            if live.as_ref() != Some(expected) {
                debug!(
                    "Rejecting {} of '{}': fingerprint {} is stale",
                    command.verb(),
                    command.target(),
                    expected
                );
                return Err(StoreError::StaleFingerprint);
            }
        }

        let mut draft = ConfigSnapshot::clone(&current);
        command.apply(&mut draft)?;
        check_document(&draft, &self.settings)?;

        draft.revision = current.revision.next(command.actor().clone());
        let revision = draft.revision.clone();
        *current = Arc::new(draft);

        info!(
            "Committed {} of pipeline '{}' as revision {} (by {})",
            command.verb(),
            command.target(),
            revision.number,
            command.actor()
        );

        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::group::PipelineGroup;
    use gantry_core::domain::name::PipelineName;
    use gantry_core::domain::pipeline::Pipeline;
    use gantry_core::domain::principal::Principal;

    fn store() -> InMemoryConfigStore {
        InMemoryConfigStore::new(ConfigSnapshot::new(
            vec![
                PipelineGroup::new("apps")
                    .with_pipeline(Pipeline::new("build-app"))
                    .with_pipeline(Pipeline::new("deploy-app").depends_on("build-app")),
            ],
            vec![],
        ))
    }

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[test]
    fn test_create_commits_new_revision() {
        let store = store();
        let before = store.current_snapshot();

        let command = MutationCommand::Create {
            group: "apps".to_string(),
            pipeline: Pipeline::new("test-app").depends_on("build-app"),
            actor: alice(),
        };
        let revision = store.commit(&command, None).unwrap();

        assert_eq!(revision.number, 1);
        assert_eq!(revision.author, Some(alice()));
        assert_eq!(store.current_snapshot().pipeline_count(), 3);
        // Snapshots handed out earlier stay frozen
        assert_eq!(before.pipeline_count(), 2);
    }

    #[test]
    fn test_stale_fingerprint_is_rejected() {
        let store = store();
        let command = MutationCommand::Update {
            pipeline: Pipeline::new("build-app").depends_on("deploy-app"),
            fingerprint: Fingerprint::new("not-the-current-one"),
            actor: alice(),
        };
        assert_eq!(
            store.commit(&command, command.fingerprint()),
            Err(StoreError::StaleFingerprint)
        );
        assert_eq!(store.current_snapshot().revision.number, 0);
    }

    #[test]
    fn test_cycle_is_structural_and_leaves_document_untouched() {
        let store = store();
        let name = PipelineName::new("build-app");
        let fingerprint = store.fingerprint_of(&name).unwrap();

        let command = MutationCommand::Update {
            pipeline: Pipeline::new("build-app").depends_on("deploy-app"),
            fingerprint: fingerprint.clone(),
            actor: alice(),
        };
        let result = store.commit(&command, Some(&fingerprint));

        assert!(matches!(result, Err(StoreError::StructuralInvalid(_))));
        assert_eq!(store.fingerprint_of(&name), Some(fingerprint));
    }

    #[test]
    fn test_duplicate_create_is_structural() {
        let store = store();
        let command = MutationCommand::Create {
            group: "other".to_string(),
            pipeline: Pipeline::new("Build-App"),
            actor: alice(),
        };
        assert!(matches!(
            store.commit(&command, None),
            Err(StoreError::StructuralInvalid(_))
        ));
        assert!(store.current_snapshot().find_group("other").is_none());
    }

    #[test]
    fn test_update_with_current_fingerprint() {
        let store = store();
        let name = PipelineName::new("deploy-app");
        let fingerprint = store.fingerprint_of(&name).unwrap();

        let command = MutationCommand::Update {
            pipeline: Pipeline::new("deploy-app"),
            fingerprint: fingerprint.clone(),
            actor: alice(),
        };
        store.commit(&command, Some(&fingerprint)).unwrap();

        let updated = store.fingerprint_of(&name).unwrap();
        assert_ne!(updated, fingerprint);
    }
}
