//! Configuration store contract

use gantry_core::domain::fingerprint::Fingerprint;
use gantry_core::domain::name::PipelineName;
use gantry_core::domain::snapshot::{ConfigRevision, ConfigSnapshot};
use std::sync::Arc;

use crate::command::MutationCommand;
use crate::error::StoreError;

/// Store owning the live configuration document
pub trait ConfigurationStore: Send + Sync {
    /// Returns the current snapshot
    ///
    /// The snapshot is frozen: commits made after this call are only
    /// visible through a later call.
    fn current_snapshot(&self) -> Arc<ConfigSnapshot>;

    /// Returns the fingerprint of the persisted pipeline, if it exists
    fn fingerprint_of(&self, name: &PipelineName) -> Option<Fingerprint> {
        self.current_snapshot()
            .find_pipeline(name)
            .map(Fingerprint::of)
    }

    /// Atomically applies a command to the live document
    ///
    /// # Arguments
    /// * `command` - The change to apply
    /// * `expected` - Fingerprint the caller read; `None` for creates
    ///
    /// # Returns
    /// The revision of the document after the change
    fn commit(
        &self,
        command: &MutationCommand,
        expected: Option<&Fingerprint>,
    ) -> Result<ConfigRevision, StoreError>;
}
