//! Deletion safety
//!
//! Decides, for each pipeline, whether removing it would leave the
//! configuration graph inconsistent. Three guards run in a fixed order and
//! the first one that refuses decides the verdict, so a pipeline only ever
//! reports one reason:
//!
//! 1. origin: pipelines materialized from a configuration repository must
//!    be removed there
//! 2. environment: pipelines listed in an environment
//! 3. dependency: pipelines some other pipeline depends on

use gantry_core::domain::name::PipelineName;
use gantry_core::domain::snapshot::ConfigSnapshot;
use gantry_core::dto::pipeline::CanDeleteResult;
use std::collections::BTreeMap;

use super::dependency::DependencyIndex;

/// Outcome of the deletion-safety analysis for one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionVerdict {
    pub deletable: bool,
    pub reason: String,
}

impl DeletionVerdict {
    fn allowed() -> Self {
        Self {
            deletable: true,
            reason: "Delete this pipeline.".to_string(),
        }
    }

    fn refused(reason: String) -> Self {
        Self {
            deletable: false,
            reason,
        }
    }
}

impl From<DeletionVerdict> for CanDeleteResult {
    fn from(verdict: DeletionVerdict) -> Self {
        CanDeleteResult {
            can_delete: verdict.deletable,
            message: verdict.reason,
        }
    }
}

/// What a guard gets to look at
struct Candidate<'a> {
    snapshot: &'a ConfigSnapshot,
    index: &'a DependencyIndex,
    name: &'a PipelineName,
}

type Guard = fn(&Candidate<'_>) -> Option<DeletionVerdict>;

const GUARDS: [Guard; 3] = [origin_guard, environment_guard, dependency_guard];

fn origin_guard(candidate: &Candidate<'_>) -> Option<DeletionVerdict> {
    let origin = &candidate.snapshot.find_pipeline(candidate.name)?.origin;
    if origin.is_local() {
        return None;
    }
    Some(DeletionVerdict::refused(format!(
        "Cannot delete pipeline '{}' defined in configuration repository '{}'.",
        candidate.name,
        origin.display_name()
    )))
}

fn environment_guard(candidate: &Candidate<'_>) -> Option<DeletionVerdict> {
    let environment = candidate.snapshot.environment_for(candidate.name)?;
    Some(DeletionVerdict::refused(format!(
        "Cannot delete pipeline '{}' as it is present in environment '{}'.",
        candidate.name, environment
    )))
}

fn dependency_guard(candidate: &Candidate<'_>) -> Option<DeletionVerdict> {
    let downstream = candidate.index.downstream_of(candidate.name)?;
    Some(DeletionVerdict::refused(format!(
        "Cannot delete pipeline '{}' as pipeline '{}' depends on it.",
        candidate.name, downstream
    )))
}

/// Verdicts for every pipeline of the snapshot
pub fn analyze(snapshot: &ConfigSnapshot) -> BTreeMap<PipelineName, DeletionVerdict> {
    let index = DependencyIndex::build(snapshot);
    snapshot
        .pipeline_names()
        .into_iter()
        .map(|name| {
            let verdict = analyze_one(snapshot, &index, &name);
            (name, verdict)
        })
        .collect()
}

/// Verdict for a single pipeline
///
/// `index` must have been built from `snapshot`.
pub fn analyze_one(
    snapshot: &ConfigSnapshot,
    index: &DependencyIndex,
    name: &PipelineName,
) -> DeletionVerdict {
    // Report the name the way the document spells it
    let name = snapshot
        .find_pipeline(name)
        .map(|pipeline| &pipeline.name)
        .unwrap_or(name);
    let candidate = Candidate {
        snapshot,
        index,
        name,
    };

    GUARDS
        .iter()
        .find_map(|guard| guard(&candidate))
        .unwrap_or_else(DeletionVerdict::allowed)
}
