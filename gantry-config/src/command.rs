//! Mutation commands
//!
//! A command captures one proposed change to the configuration graph: what
//! to change, who asks for it and which version of the entity they saw.
//! Commands are immutable values owned by the caller.

use gantry_core::domain::fingerprint::Fingerprint;
use gantry_core::domain::name::PipelineName;
use gantry_core::domain::pipeline::Pipeline;
use gantry_core::domain::principal::Principal;
use gantry_core::domain::snapshot::ConfigSnapshot;
use gantry_core::dto::pipeline::{CreatePipeline, DeletePipeline, UpdatePipeline};

use crate::error::StoreError;

/// Proposed change to a pipeline definition
#[derive(Debug, Clone)]
pub enum MutationCommand {
    Create {
        group: String,
        pipeline: Pipeline,
        actor: Principal,
    },
    Update {
        pipeline: Pipeline,
        fingerprint: Fingerprint,
        actor: Principal,
    },
    Delete {
        name: PipelineName,
        fingerprint: Fingerprint,
        actor: Principal,
    },
}

impl MutationCommand {
    pub fn create(actor: Principal, req: CreatePipeline) -> Self {
        MutationCommand::Create {
            group: req.group,
            pipeline: req.pipeline,
            actor,
        }
    }

    pub fn update(actor: Principal, req: UpdatePipeline) -> Self {
        MutationCommand::Update {
            pipeline: req.pipeline,
            fingerprint: req.fingerprint,
            actor,
        }
    }

    pub fn delete(actor: Principal, req: DeletePipeline) -> Self {
        MutationCommand::Delete {
            name: req.name,
            fingerprint: req.fingerprint,
            actor,
        }
    }

    /// Short verb for logs
    pub fn verb(&self) -> &'static str {
        match self {
            MutationCommand::Create { .. } => "create",
            MutationCommand::Update { .. } => "update",
            MutationCommand::Delete { .. } => "delete",
        }
    }

    /// Name of the pipeline the command targets
    pub fn target(&self) -> &PipelineName {
        match self {
            MutationCommand::Create { pipeline, .. } | MutationCommand::Update { pipeline, .. } => {
                &pipeline.name
            }
            MutationCommand::Delete { name, .. } => name,
        }
    }

    pub fn actor(&self) -> &Principal {
        match self {
            MutationCommand::Create { actor, .. }
            | MutationCommand::Update { actor, .. }
            | MutationCommand::Delete { actor, .. } => actor,
        }
    }

    /// Fingerprint presented by the caller; absent for creates
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            MutationCommand::Create { .. } => None,
            MutationCommand::Update { fingerprint, .. }
            | MutationCommand::Delete { fingerprint, .. } => Some(fingerprint),
        }
    }

    /// Desired state of the pipeline; absent for deletes
    pub fn proposed(&self) -> Option<&Pipeline> {
        match self {
            MutationCommand::Create { pipeline, .. } | MutationCommand::Update { pipeline, .. } => {
                Some(pipeline)
            }
            MutationCommand::Delete { .. } => None,
        }
    }

    /// Applies the change to a store's private draft of the document
    ///
    /// Document-wide invariants are not checked here; the store verifies
    /// them on the draft afterwards.
    pub fn apply(&self, draft: &mut ConfigSnapshot) -> Result<(), StoreError> {
        match self {
            MutationCommand::Create {
                group, pipeline, ..
            } => {
                draft.add_pipeline(group, pipeline.clone());
                Ok(())
            }
            MutationCommand::Update { pipeline, .. } => {
                if draft.replace_pipeline(pipeline.clone()) {
                    Ok(())
                } else {
                    Err(StoreError::StructuralInvalid(format!(
                        "Pipeline '{}' not found.",
                        pipeline.name
                    )))
                }
            }
            MutationCommand::Delete { name, .. } => draft
                .remove_pipeline(name)
                .map(|_| ())
                .ok_or_else(|| {
                    StoreError::StructuralInvalid(format!("Pipeline '{}' not found.", name))
                }),
        }
    }
}
