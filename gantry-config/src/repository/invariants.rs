//! Document-wide invariants checked at commit time

use gantry_core::domain::name::PipelineName;
use gantry_core::domain::snapshot::ConfigSnapshot;
use std::collections::{HashMap, HashSet};

use crate::error::StoreError;
use crate::settings::EngineSettings;

/// Verifies a whole document
///
/// Pipeline names must be unique, upstream references must resolve (when
/// enabled) and the dependency graph must be acyclic.
pub fn check_document(
    snapshot: &ConfigSnapshot,
    settings: &EngineSettings,
) -> Result<(), StoreError> {
    check_unique_names(snapshot)?;
    if settings.enforce_upstream_exists {
        check_upstream_exists(snapshot)?;
    }
    check_acyclic(snapshot)
}

fn check_unique_names(snapshot: &ConfigSnapshot) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for pipeline in snapshot.pipelines() {
        if !seen.insert(&pipeline.name) {
            return Err(StoreError::StructuralInvalid(format!(
                "You have defined multiple pipelines named '{}'. Pipeline names must be unique.",
                pipeline.name
            )));
        }
    }
    Ok(())
}

fn check_upstream_exists(snapshot: &ConfigSnapshot) -> Result<(), StoreError> {
    let known: HashSet<&PipelineName> = snapshot.pipelines().map(|p| &p.name).collect();
    for pipeline in snapshot.pipelines() {
        if let Some(missing) = pipeline.upstream.iter().find(|up| !known.contains(up)) {
            return Err(StoreError::StructuralInvalid(format!(
                "Pipeline '{}' depends on pipeline '{}' which does not exist.",
                pipeline.name, missing
            )));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

type Edges<'a> = HashMap<&'a PipelineName, &'a [PipelineName]>;

fn check_acyclic(snapshot: &ConfigSnapshot) -> Result<(), StoreError> {
    let edges: Edges<'_> = snapshot
        .pipelines()
        .map(|p| (&p.name, p.upstream.as_slice()))
        .collect();

    let mut roots: Vec<&PipelineName> = edges.keys().copied().collect();
    roots.sort();

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    for root in roots {
        visit(root, &edges, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a PipelineName,
    edges: &Edges<'a>,
    marks: &mut HashMap<&'a PipelineName, Mark>,
    path: &mut Vec<&'a PipelineName>,
) -> Result<(), StoreError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|p| *p == name).unwrap_or(0);
            let cycle: Vec<String> = path[start..]
                .iter()
                .chain(std::iter::once(&name))
                .map(|p| p.to_string())
                .collect();
            return Err(StoreError::StructuralInvalid(format!(
                "Circular dependency detected: {}",
                cycle.join(" -> ")
            )));
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    path.push(name);
    if let Some(&upstream) = edges.get(name) {
        for up in upstream {
            visit(up, edges, marks, path)?;
        }
    }
    path.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::group::PipelineGroup;
    use gantry_core::domain::pipeline::Pipeline;

    fn snapshot(pipelines: Vec<Pipeline>) -> ConfigSnapshot {
        let group = pipelines
            .into_iter()
            .fold(PipelineGroup::new("apps"), |g, p| g.with_pipeline(p));
        ConfigSnapshot::new(vec![group], vec![])
    }

    fn message(result: Result<(), StoreError>) -> String {
        match result {
            Err(StoreError::StructuralInvalid(msg)) => msg,
            other => panic!("expected structural failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_document_passes() {
        let doc = snapshot(vec![
            Pipeline::new("build-app"),
            Pipeline::new("test-app").depends_on("build-app"),
            Pipeline::new("deploy-app")
                .depends_on("build-app")
                .depends_on("test-app"),
        ]);
        assert!(check_document(&doc, &EngineSettings::default()).is_ok());
    }

    #[test]
    fn test_duplicate_names_differing_in_case() {
        let doc = snapshot(vec![Pipeline::new("build-app"), Pipeline::new("BUILD-APP")]);
        let msg = message(check_document(&doc, &EngineSettings::default()));
        assert!(msg.contains("multiple pipelines named 'BUILD-APP'"));
    }

    #[test]
    fn test_unknown_upstream() {
        let doc = snapshot(vec![Pipeline::new("deploy-app").depends_on("ghost")]);
        let msg = message(check_document(&doc, &EngineSettings::default()));
        assert!(msg.contains("'ghost' which does not exist"));

        let lenient = EngineSettings {
            enforce_upstream_exists: false,
            ..EngineSettings::default()
        };
        assert!(check_document(&doc, &lenient).is_ok());
    }

    #[test]
    fn test_cycle_is_reported_with_its_path() {
        let doc = snapshot(vec![
            Pipeline::new("a").depends_on("c"),
            Pipeline::new("b").depends_on("a"),
            Pipeline::new("c").depends_on("b"),
        ]);
        let msg = message(check_document(&doc, &EngineSettings::default()));
        assert_eq!(msg, "Circular dependency detected: a -> c -> b -> a");
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let doc = snapshot(vec![Pipeline::new("loop").depends_on("LOOP")]);
        let msg = message(check_document(&doc, &EngineSettings::default()));
        assert!(msg.starts_with("Circular dependency detected"));
    }
}
