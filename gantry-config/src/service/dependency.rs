//! Dependency index
//!
//! Maps every pipeline to the set of pipelines it depends on. The index is
//! derived from one snapshot and never updated in place; build a new one
//! whenever the snapshot changes.

use gantry_core::domain::name::PipelineName;
use gantry_core::domain::snapshot::ConfigSnapshot;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    upstream: BTreeMap<PipelineName, BTreeSet<PipelineName>>,
}

impl DependencyIndex {
    /// Builds the index in one pass over the snapshot's pipelines
    pub fn build(snapshot: &ConfigSnapshot) -> Self {
        let mut upstream: BTreeMap<PipelineName, BTreeSet<PipelineName>> = BTreeMap::new();
        for pipeline in snapshot.pipelines() {
            upstream
                .entry(pipeline.name.clone())
                .or_default()
                .extend(pipeline.upstream.iter().cloned());
        }
        Self { upstream }
    }

    /// First pipeline, by name order, that depends on `name`
    ///
    /// A linear scan rather than a reverse index: callers only ever need
    /// one dependent, and name order keeps the answer stable.
    pub fn downstream_of(&self, name: &PipelineName) -> Option<&PipelineName> {
        self.upstream
            .iter()
            .find(|(_, upstream)| upstream.contains(name))
            .map(|(downstream, _)| downstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::group::PipelineGroup;
    use gantry_core::domain::pipeline::Pipeline;

    fn snapshot() -> ConfigSnapshot {
        ConfigSnapshot::new(
            vec![
                PipelineGroup::new("apps")
                    .with_pipeline(Pipeline::new("zz-report").depends_on("build-app"))
                    .with_pipeline(Pipeline::new("build-app"))
                    .with_pipeline(Pipeline::new("deploy-app").depends_on("Build-App")),
            ],
            vec![],
        )
    }

    #[test]
    fn test_index_follows_the_snapshot_it_was_built_from() {
        let mut snapshot = snapshot();
        let before = DependencyIndex::build(&snapshot);

        snapshot.remove_pipeline(&PipelineName::new("deploy-app"));
        let after = DependencyIndex::build(&snapshot);

        let build_app = PipelineName::new("build-app");
        assert_eq!(before.downstream_of(&build_app).map(|n| n.as_str()), Some("deploy-app"));
        assert_eq!(after.downstream_of(&build_app).map(|n| n.as_str()), Some("zz-report"));
    }

    #[test]
    fn test_downstream_of_uses_name_order() {
        let index = DependencyIndex::build(&snapshot());
        let downstream = index.downstream_of(&PipelineName::new("BUILD-APP"));
        assert_eq!(downstream.map(|n| n.as_str()), Some("deploy-app"));
    }

    #[test]
    fn test_downstream_of_leaf_is_none() {
        let index = DependencyIndex::build(&snapshot());
        assert!(index.downstream_of(&PipelineName::new("deploy-app")).is_none());
        assert!(index.downstream_of(&PipelineName::new("unknown")).is_none());
    }
}
