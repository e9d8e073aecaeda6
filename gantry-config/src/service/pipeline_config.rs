//! Pipeline Config Service
//!
//! Entry point for front-ends: lookups over the current snapshot, the
//! deletion-safety report and the create/update/delete operations.

use gantry_core::domain::fingerprint::Fingerprint;
use gantry_core::domain::group::PipelineGroup;
use gantry_core::domain::name::PipelineName;
use gantry_core::domain::pipeline::Pipeline;
use gantry_core::domain::principal::Principal;
use gantry_core::dto::pipeline::{
    CanDeleteResult, CreatePipeline, DeletePipeline, PipelineWithFingerprint, UpdatePipeline,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::authorization::AuthorizationService;
use super::deletion;
use super::dependency::DependencyIndex;
use super::mutation::MutationExecutor;
use super::result::OperationResult;
use super::validation::StructuralValidator;
use crate::command::MutationCommand;
use crate::repository::ConfigurationStore;

pub struct PipelineConfigService {
    store: Arc<dyn ConfigurationStore>,
    authorization: Arc<dyn AuthorizationService>,
    executor: MutationExecutor,
}

impl PipelineConfigService {
    pub fn new(
        store: Arc<dyn ConfigurationStore>,
        authorization: Arc<dyn AuthorizationService>,
        validators: Vec<Box<dyn StructuralValidator>>,
    ) -> Self {
        let executor = MutationExecutor::new(Arc::clone(&store), Arc::clone(&authorization))
            .with_validators(validators);
        Self {
            store,
            authorization,
            executor,
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Deletion verdict for every pipeline, keyed by name
    pub fn can_delete_pipelines(&self) -> BTreeMap<PipelineName, CanDeleteResult> {
        let snapshot = self.store.current_snapshot();
        deletion::analyze(&snapshot)
            .into_iter()
            .map(|(name, verdict)| (name, verdict.into()))
            .collect()
    }

    /// Deletion verdict for one pipeline; `None` if it does not exist
    pub fn can_delete(&self, name: &str) -> Option<CanDeleteResult> {
        let snapshot = self.store.current_snapshot();
        let name = PipelineName::new(name);
        snapshot.find_pipeline(&name)?;

        let index = DependencyIndex::build(&snapshot);
        Some(deletion::analyze_one(&snapshot, &index, &name).into())
    }

    pub fn pipeline_config_named(&self, name: &str) -> Option<Pipeline> {
        self.store
            .current_snapshot()
            .find_pipeline(&PipelineName::new(name))
            .cloned()
    }

    /// Pipeline, its group and the fingerprint to present when changing it
    pub fn pipeline_with_fingerprint(&self, name: &str) -> Option<PipelineWithFingerprint> {
        let snapshot = self.store.current_snapshot();
        let name = PipelineName::new(name);
        let group = snapshot.group_of(&name)?;
        let pipeline = snapshot.find_pipeline(&name)?;

        Some(PipelineWithFingerprint {
            group: group.name.clone(),
            fingerprint: Fingerprint::of(pipeline),
            pipeline: pipeline.clone(),
        })
    }

    /// Groups whose pipelines the principal may see
    pub fn viewable_groups_for(&self, principal: &Principal) -> Vec<PipelineGroup> {
        self.groups_where(|group| self.authorization.can_view_group(principal, group))
    }

    /// Groups the principal may see or operate
    pub fn viewable_or_operatable_groups_for(&self, principal: &Principal) -> Vec<PipelineGroup> {
        self.groups_where(|group| {
            self.authorization.can_view_group(principal, group)
                || self.authorization.can_operate_group(principal, group)
        })
    }

    pub fn total_pipelines_count(&self) -> usize {
        self.store.current_snapshot().pipeline_count()
    }

    fn groups_where(&self, allowed: impl Fn(&str) -> bool) -> Vec<PipelineGroup> {
        self.store
            .current_snapshot()
            .groups
            .iter()
            .filter(|group| allowed(group.name.as_str()))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn create_pipeline_config(&self, actor: Principal, req: CreatePipeline) -> OperationResult {
        self.executor.execute(&MutationCommand::create(actor, req))
    }

    pub fn update_pipeline_config(&self, actor: Principal, req: UpdatePipeline) -> OperationResult {
        self.executor.execute(&MutationCommand::update(actor, req))
    }

    pub fn delete_pipeline_config(&self, actor: Principal, req: DeletePipeline) -> OperationResult {
        self.executor.execute(&MutationCommand::delete(actor, req))
    }
}
