//! Pipeline DTOs

use serde::{Deserialize, Serialize};

use crate::domain::fingerprint::Fingerprint;
use crate::domain::name::PipelineName;
use crate::domain::pipeline::Pipeline;

/// Request to create a new pipeline in a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipeline {
    pub group: String,
    pub pipeline: Pipeline,
}

/// Request to replace an existing pipeline definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePipeline {
    pub pipeline: Pipeline,
    /// Fingerprint obtained when the pipeline was read
    pub fingerprint: Fingerprint,
}

/// Request to delete a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePipeline {
    pub name: PipelineName,
    pub fingerprint: Fingerprint,
}

/// Pipeline together with the fingerprint needed to modify it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineWithFingerprint {
    pub group: String,
    pub pipeline: Pipeline,
    pub fingerprint: Fingerprint,
}

/// Whether a pipeline may be deleted, and why not if not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanDeleteResult {
    pub can_delete: bool,
    pub message: String,
}
