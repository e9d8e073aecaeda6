//! Service Module
//!
//! Business logic layer of the engine.
//! Services read snapshots from the repository layer, decide whether a
//! change is allowed and hand accepted changes back to the store.

pub mod authorization;
pub mod deletion;
pub mod dependency;
pub mod mutation;
pub mod pipeline_config;
pub mod result;
pub mod validation;

// Re-export for convenience
pub use authorization::{AuthorizationScope, AuthorizationService, GroupAuthorizationService};
pub use deletion::DeletionVerdict;
pub use deletion as deletion_service;
pub use dependency::DependencyIndex;
pub use mutation::MutationExecutor;
pub use pipeline_config::PipelineConfigService;
pub use result::{OperationResult, OutcomeKind};
pub use validation::{StructuralValidator, TaskPluginService, ValidationError};
