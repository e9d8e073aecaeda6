//! Mutation executor
//!
//! Applies one `MutationCommand` to the configuration store. Each execution
//! runs to completion on the caller's thread and records exactly one
//! terminal outcome:
//!
//! 1. pre-validation: origin and structural checks for creates and updates,
//!    the deletion-safety analysis for deletes
//! 2. concurrency: the caller's fingerprint must match the persisted one
//! 3. authorization
//! 4. a single commit attempt against the store
//! 5. classification of the store's answer
//!
//! Steps 1-3 are terminal on failure: no commit is attempted.

use gantry_core::domain::snapshot::ConfigSnapshot;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::authorization::{AuthorizationScope, AuthorizationService};
use super::deletion;
use super::dependency::DependencyIndex;
use super::result::OperationResult;
use super::validation::StructuralValidator;
use crate::command::MutationCommand;
use crate::error::StoreError;
use crate::repository::ConfigurationStore;

pub struct MutationExecutor {
    store: Arc<dyn ConfigurationStore>,
    authorization: Arc<dyn AuthorizationService>,
    validators: Vec<Box<dyn StructuralValidator>>,
}

impl MutationExecutor {
    /// Creates an executor with no structural validators
    pub fn new(
        store: Arc<dyn ConfigurationStore>,
        authorization: Arc<dyn AuthorizationService>,
    ) -> Self {
        Self {
            store,
            authorization,
            validators: Vec::new(),
        }
    }

    /// Adds a validator run against every create and update
    pub fn with_validator(mut self, validator: impl StructuralValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn with_validators(mut self, validators: Vec<Box<dyn StructuralValidator>>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Executes a command and reports its outcome
    pub fn execute(&self, command: &MutationCommand) -> OperationResult {
        let mut result = OperationResult::new();
        let snapshot = self.store.current_snapshot();

        debug!(
            "Received {} of pipeline '{}' from {}",
            command.verb(),
            command.target(),
            command.actor()
        );

        if !self.pre_validate(command, &snapshot, &mut result) {
            return result;
        }
        debug!("Validated {} of '{}'", command.verb(), command.target());

        if !self.check_fingerprint(command, &mut result) {
            return result;
        }

        if !self.authorize(command, &snapshot, &mut result) {
            return result;
        }

        self.persist(command, &mut result);
        result
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn pre_validate(
        &self,
        command: &MutationCommand,
        snapshot: &ConfigSnapshot,
        result: &mut OperationResult,
    ) -> bool {
        let target = command.target();

        if !matches!(command, MutationCommand::Create { .. }) {
            let Some(existing) = snapshot.find_pipeline(target) else {
                result.not_found(format!("Pipeline '{}' not found.", target));
                return false;
            };

            if matches!(command, MutationCommand::Update { .. }) && !existing.origin.is_local() {
                result.unprocessable_entity(format!(
                    "Can not operate on pipeline '{}' as it is defined remotely in '{}'.",
                    existing.name,
                    existing.origin.display_name()
                ));
                return false;
            }
        }

        // Remote origins are assigned when a configuration repository is
        // materialized, never through a create or update
        if let Some(proposed) = command
            .proposed()
            .filter(|proposed| !proposed.origin.is_local())
        {
            warn!(
                "Rejecting {} of '{}' claiming origin '{}'",
                command.verb(),
                target,
                proposed.origin.display_name()
            );
            result.unprocessable_entity(format!(
                "Can not {} pipeline '{}' with origin '{}'. Only pipelines defined in the configuration document can be changed here.",
                command.verb(),
                target,
                proposed.origin.display_name()
            ));
            return false;
        }

        match command.proposed() {
            Some(proposed) => {
                // Run every validator before deciding so all errors get logged
                let errors: Vec<_> = self
                    .validators
                    .iter()
                    .flat_map(|validator| validator.validate(proposed))
                    .collect();

                for err in &errors {
                    warn!("Validation error on pipeline '{}': {}", target, err);
                }

                if let Some(first) = errors.first() {
                    result.unprocessable_entity(format!(
                        "Validation failed for pipeline '{}': {}",
                        target, first.message
                    ));
                    return false;
                }
            }
            None => {
                let index = DependencyIndex::build(snapshot);
                let verdict = deletion::analyze_one(snapshot, &index, target);
                if !verdict.deletable {
                    warn!("Refusing to delete '{}': {}", target, verdict.reason);
                    result.unprocessable_entity(verdict.reason);
                    return false;
                }
            }
        }

        true
    }

    fn check_fingerprint(&self, command: &MutationCommand, result: &mut OperationResult) -> bool {
        let Some(supplied) = command.fingerprint() else {
            return true;
        };

        let current = self.store.fingerprint_of(command.target());
        if current.as_ref() == Some(supplied) {
            return true;
        }

        warn!(
            "Stale fingerprint for pipeline '{}': supplied {}, current {}",
            command.target(),
            supplied,
            current.as_ref().map_or("<none>", |f| f.as_str())
        );
        result.conflict(stale_message(command));
        false
    }

    fn authorize(
        &self,
        command: &MutationCommand,
        snapshot: &ConfigSnapshot,
        result: &mut OperationResult,
    ) -> bool {
        let group = match command {
            MutationCommand::Create { group, .. } => group.clone(),
            _ => match snapshot.group_of(command.target()) {
                Some(group) => group.name.clone(),
                None => {
                    result.not_found(format!("Pipeline '{}' not found.", command.target()));
                    return false;
                }
            },
        };
        let scope = AuthorizationScope::Group(group);

        if self.authorization.can_mutate(command.actor(), &scope) {
            return true;
        }

        warn!(
            "User '{}' may not {} pipelines in {}",
            command.actor(),
            command.verb(),
            scope
        );
        result.forbidden(format!(
            "User '{}' does not have permission to edit pipelines in {}.",
            command.actor(),
            scope
        ));
        false
    }

    fn persist(&self, command: &MutationCommand, result: &mut OperationResult) {
        let target = command.target();

        match self.store.commit(command, command.fingerprint()) {
            Ok(revision) => {
                info!(
                    "Committed {} of pipeline '{}' at revision {}",
                    command.verb(),
                    target,
                    revision.number
                );
                result.set_message(success_message(command));
            }
            Err(StoreError::StructuralInvalid(detail)) => {
                warn!("Store rejected {} of '{}': {}", command.verb(), target, detail);
                if !result.has_message() {
                    result.unprocessable_entity(format!(
                        "Validation failed for pipeline '{}': {}",
                        target, detail
                    ));
                }
            }
            Err(StoreError::StaleFingerprint) => {
                // Normally already reported by the fingerprint check; only a
                // commit that raced past it gets reported here
                debug!("Store reported stale fingerprint for '{}'", target);
                result.conflict(stale_message(command));
            }
            Err(err @ StoreError::Unknown(_)) => {
                error!(
                    "Failed to commit {} of pipeline '{}' by {}: {:?}",
                    command.verb(),
                    target,
                    command.actor(),
                    err
                );
                result.internal_server_error(format!("Save failed. {}", err));
            }
        }
    }
}

fn stale_message(command: &MutationCommand) -> String {
    format!(
        "Someone has modified the configuration for pipeline '{}'. Please update your copy of the config with the changes and try again.",
        command.target()
    )
}

fn success_message(command: &MutationCommand) -> String {
    let past = match command {
        MutationCommand::Create { .. } => "created",
        MutationCommand::Update { .. } => "updated",
        MutationCommand::Delete { .. } => "deleted",
    };
    format!("Pipeline '{}' was {} successfully.", command.target(), past)
}
