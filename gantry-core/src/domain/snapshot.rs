//! Configuration snapshot
//!
//! A frozen, read-only view of the configuration graph at one point in
//! time. Stores hand snapshots out behind an `Arc`; nothing outside a store
//! ever mutates a published snapshot. The draft helpers at the bottom of
//! this file are meant for stores working on their own private copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::group::PipelineGroup;
use super::name::{EnvironmentName, PipelineName};
use super::pipeline::Pipeline;
use super::principal::Principal;

/// Revision stamp of a committed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRevision {
    pub number: u64,
    pub author: Option<Principal>,
    pub committed_at: Option<DateTime<Utc>>,
}

impl ConfigRevision {
    /// Revision following this one
    pub fn next(&self, author: Principal) -> Self {
        Self {
            number: self.number + 1,
            author: Some(author),
            committed_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub revision: ConfigRevision,
    #[serde(default)]
    pub groups: Vec<PipelineGroup>,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl ConfigSnapshot {
    pub fn new(groups: Vec<PipelineGroup>, environments: Vec<Environment>) -> Self {
        Self {
            revision: ConfigRevision::default(),
            groups,
            environments,
        }
    }

    /// All pipelines in group order, then declaration order
    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        self.groups.iter().flat_map(|group| group.pipelines.iter())
    }

    /// All pipeline names, sorted by their normalized form
    ///
    /// Analyses that report "the first match" iterate in this order so
    /// their answers do not depend on where a pipeline sits in the document.
    pub fn pipeline_names(&self) -> Vec<PipelineName> {
        let mut names: Vec<PipelineName> = self.pipelines().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    pub fn pipeline_count(&self) -> usize {
        self.groups.iter().map(|group| group.pipelines.len()).sum()
    }

    pub fn find_pipeline(&self, name: &PipelineName) -> Option<&Pipeline> {
        self.pipelines().find(|pipeline| &pipeline.name == name)
    }

    pub fn find_group(&self, name: &str) -> Option<&PipelineGroup> {
        self.groups.iter().find(|group| group.is_named(name))
    }

    /// Group holding the named pipeline
    pub fn group_of(&self, name: &PipelineName) -> Option<&PipelineGroup> {
        self.groups
            .iter()
            .find(|group| group.pipelines.iter().any(|p| &p.name == name))
    }

    /// First environment, in document order, that lists the pipeline
    pub fn environment_for(&self, name: &PipelineName) -> Option<&EnvironmentName> {
        self.environments
            .iter()
            .find(|environment| environment.contains(name))
            .map(|environment| &environment.name)
    }

    // =========================================================================
    // Draft mutation
    // =========================================================================

    /// Appends a pipeline to the named group, creating the group if needed
    pub fn add_pipeline(&mut self, group: &str, pipeline: Pipeline) {
        match self.groups.iter_mut().find(|g| g.is_named(group)) {
            Some(existing) => existing.pipelines.push(pipeline),
            None => self
                .groups
                .push(PipelineGroup::new(group).with_pipeline(pipeline)),
        }
    }

    /// Replaces the pipeline with the same name in place
    ///
    /// Returns false when no such pipeline exists.
    pub fn replace_pipeline(&mut self, pipeline: Pipeline) -> bool {
        let slot = self
            .groups
            .iter_mut()
            .flat_map(|group| group.pipelines.iter_mut())
            .find(|existing| existing.name == pipeline.name);

        match slot {
            Some(slot) => {
                *slot = pipeline;
                true
            }
            None => false,
        }
    }

    /// Removes the named pipeline from its group
    pub fn remove_pipeline(&mut self, name: &PipelineName) -> Option<Pipeline> {
        self.groups.iter_mut().find_map(|group| {
            let index = group.pipelines.iter().position(|p| &p.name == name)?;
            Some(group.pipelines.remove(index))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ConfigSnapshot {
        ConfigSnapshot::new(
            vec![
                PipelineGroup::new("second")
                    .with_pipeline(Pipeline::new("zeta"))
                    .with_pipeline(Pipeline::new("Alpha")),
                PipelineGroup::new("first").with_pipeline(Pipeline::new("mid")),
            ],
            vec![
                Environment::new("staging").with_pipeline("mid"),
                Environment::new("production").with_pipeline("MID"),
            ],
        )
    }

    #[test]
    fn test_pipeline_names_are_sorted() {
        let names: Vec<String> = snapshot()
            .pipeline_names()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["Alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_lookups_ignore_case() {
        let snapshot = snapshot();
        let alpha = PipelineName::new("ALPHA");
        assert!(snapshot.find_pipeline(&alpha).is_some());
        assert_eq!(snapshot.group_of(&alpha).map(|g| g.name.as_str()), Some("second"));
        assert!(snapshot.find_group("SECOND").is_some());
        assert_eq!(snapshot.pipeline_count(), 3);
    }

    #[test]
    fn test_environment_for_returns_first_in_document_order() {
        let snapshot = snapshot();
        let env = snapshot.environment_for(&PipelineName::new("mid"));
        assert_eq!(env.map(|e| e.as_str()), Some("staging"));
        assert!(snapshot.environment_for(&PipelineName::new("zeta")).is_none());
    }

    #[test]
    fn test_add_pipeline_creates_missing_group() {
        let mut draft = snapshot();
        draft.add_pipeline("third", Pipeline::new("new-one"));
        draft.add_pipeline("FIRST", Pipeline::new("another"));

        assert_eq!(draft.groups.len(), 3);
        assert_eq!(draft.find_group("first").map(|g| g.pipelines.len()), Some(2));
        assert_eq!(draft.pipeline_count(), 5);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut draft = snapshot();
        let updated = Pipeline::new("ZETA").depends_on("alpha");
        assert!(draft.replace_pipeline(updated));
        assert!(!draft.replace_pipeline(Pipeline::new("missing")));

        let zeta = PipelineName::new("zeta");
        assert_eq!(draft.find_pipeline(&zeta).map(|p| p.upstream.len()), Some(1));

        let removed = draft.remove_pipeline(&zeta);
        assert!(removed.is_some());
        assert!(draft.find_pipeline(&zeta).is_none());
        assert!(draft.remove_pipeline(&zeta).is_none());
    }

    #[test]
    fn test_next_revision() {
        let revision = ConfigRevision::default().next(Principal::new("alice"));
        assert_eq!(revision.number, 1);
        assert_eq!(revision.author, Some(Principal::new("alice")));
        assert!(revision.committed_at.is_some());
    }
}
