//! Handlers.
//!
//! A handler is one unit of transformation. The pipeline invokes every
//! handler unconditionally; each handler consults its own predicate inside
//! `apply`, which keeps the pipeline free of per-feature branching.
//! Handlers must be idempotent in isolation: applying one twice leaves the
//! workspace as after the first application.

use std::path::Path;

use tracing::debug;

use stencil_catalog::{Catalog, FeatureEntry};
use stencil_prompts::Answers;

use crate::error::EngineResult;
use crate::manifest::{Change, ChangeOp, ManifestSet};
use crate::markers::MarkerProcessor;
use crate::substitute::{ProjectIdentity, Substituter};
use crate::workspace::Workspace;

/// Shared state passed through the pipeline.
pub struct PipelineContext<'a> {
    pub workspace: &'a Workspace,
    pub answers: &'a Answers,
    pub catalog: &'a Catalog,
    pub manifests: &'a mut ManifestSet,
}

/// One unit of transformation.
pub trait Handler {
    fn id(&self) -> &str;

    /// Whether the resolved answers select this handler's feature.
    fn applies(&self, answers: &Answers) -> bool;

    fn apply(&self, ctx: &mut PipelineContext<'_>) -> EngineResult<()>;
}

/// Drives one feature catalog entry: manifest changes and moves when the
/// feature is enabled; owned-path deletion and manifest removal when it is
/// not. Files a disabled feature owns wholesale are not amenable to marker
/// blocks, so they are deleted here before the substitution pass runs.
pub struct FeatureHandler {
    entry: FeatureEntry,
}

impl FeatureHandler {
    pub fn new(entry: FeatureEntry) -> Self {
        Self { entry }
    }
}

impl Handler for FeatureHandler {
    fn id(&self) -> &str {
        &self.entry.id
    }

    fn applies(&self, answers: &Answers) -> bool {
        self.entry.enabled(answers)
    }

    fn apply(&self, ctx: &mut PipelineContext<'_>) -> EngineResult<()> {
        if self.applies(ctx.answers) {
            for change in &self.entry.manifest_changes {
                let op = if change.remove {
                    ChangeOp::Remove
                } else {
                    // The loader guarantees a value when remove is unset.
                    ChangeOp::Set(change.value.clone().unwrap_or(serde_json::Value::Null))
                };
                ctx.manifests.queue(
                    &change.file,
                    Change {
                        path: change.path.clone(),
                        op,
                    },
                )?;
            }
            for mv in &self.entry.moves {
                ctx.workspace
                    .move_path(Path::new(&mv.from), Path::new(&mv.to))?;
            }
        } else {
            debug!("Feature '{}' disabled, removing owned paths", self.entry.id);
            for pattern in &self.entry.owned_paths {
                ctx.workspace.delete_matching(pattern)?;
            }
            for change in &self.entry.manifest_changes {
                if change.remove {
                    continue;
                }
                ctx.manifests.queue(
                    &change.file,
                    Change {
                        path: change.path.clone(),
                        op: ChangeOp::Remove,
                    },
                )?;
            }
        }
        Ok(())
    }
}

/// Runs the marker-block processor over every text file in the workspace.
pub struct MarkerHandler {
    processor: MarkerProcessor,
}

impl Default for MarkerHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerHandler {
    pub fn new() -> Self {
        Self {
            processor: MarkerProcessor::new(),
        }
    }
}

impl Handler for MarkerHandler {
    fn id(&self) -> &str {
        "markers"
    }

    fn applies(&self, _answers: &Answers) -> bool {
        true
    }

    fn apply(&self, ctx: &mut PipelineContext<'_>) -> EngineResult<()> {
        for relative in ctx.workspace.files() {
            let Some(content) = ctx.workspace.read_text(&relative)? else {
                continue;
            };
            let processed = self
                .processor
                .process(&relative, &content, ctx.answers, ctx.catalog)?;
            if processed != content {
                ctx.workspace.write_text(&relative, &processed)?;
            }
        }
        Ok(())
    }
}

/// The token/rename substitution pass. Must run after every handler that
/// adds or removes files, because it also rewrites paths; the pipeline
/// sequences it last.
pub struct RenameHandler {
    substituter: Substituter,
}

impl RenameHandler {
    pub fn new(answers: &Answers) -> Self {
        let identity = ProjectIdentity::from_answers(answers);
        Self {
            substituter: Substituter::new(&identity),
        }
    }
}

impl Handler for RenameHandler {
    fn id(&self) -> &str {
        "rename"
    }

    fn applies(&self, _answers: &Answers) -> bool {
        true
    }

    fn apply(&self, ctx: &mut PipelineContext<'_>) -> EngineResult<()> {
        self.substituter.run(ctx.workspace)
    }
}

/// Paths a disabled feature owns, for the update reconciler.
pub fn disabled_owned_paths(catalog: &Catalog, answers: &Answers) -> Vec<String> {
    catalog
        .entries()
        .iter()
        .filter(|e| !e.enabled(answers))
        .flat_map(|e| e.owned_paths.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stencil_catalog::ManifestChange;
    use stencil_prompts::AnswerValue;
    use tempfile::tempdir;

    fn solr_entry() -> FeatureEntry {
        FeatureEntry {
            id: "svc_solr".into(),
            prompt: "services".into(),
            value: Some("solr".into()),
            marker_token: Some("SERVICE_SOLR".into()),
            owned_paths: vec!["docker/solr/**".into()],
            manifest_changes: vec![ManifestChange {
                file: "composer.json".into(),
                path: "require.drupal/search_api_solr".into(),
                value: Some(serde_json::json!("^4.3")),
                remove: false,
            }],
            moves: vec![],
        }
    }

    fn setup(services: &[&str]) -> (tempfile::TempDir, Workspace, Answers, Catalog) {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("docker/solr")).unwrap();
        fs::write(temp.path().join("docker/solr/Dockerfile"), "FROM solr:8").unwrap();
        fs::write(
            temp.path().join("composer.json"),
            r#"{"require": {"php": ">=8.1"}}"#,
        )
        .unwrap();

        let ws = Workspace::new(temp.path());
        let mut answers = Answers::default();
        answers.insert(
            "services",
            AnswerValue::List(services.iter().map(|s| s.to_string()).collect()),
        );
        let catalog = Catalog::new(vec![solr_entry()]).unwrap();
        (temp, ws, answers, catalog)
    }

    #[test]
    fn test_enabled_feature_queues_manifest_set() {
        let (_t, ws, answers, catalog) = setup(&["solr"]);
        let mut manifests = ManifestSet::new(&ws);
        let mut ctx = PipelineContext {
            workspace: &ws,
            answers: &answers,
            catalog: &catalog,
            manifests: &mut manifests,
        };

        FeatureHandler::new(solr_entry()).apply(&mut ctx).unwrap();
        manifests.flush_all().unwrap();

        let written = fs::read_to_string(ws.absolute(Path::new("composer.json"))).unwrap();
        assert!(written.contains("search_api_solr"));
        assert!(ws.absolute(Path::new("docker/solr/Dockerfile")).exists());
    }

    #[test]
    fn test_disabled_feature_deletes_owned_paths_and_entries() {
        let (_t, ws, answers, catalog) = setup(&["redis"]);
        let mut manifests = ManifestSet::new(&ws);
        let mut ctx = PipelineContext {
            workspace: &ws,
            answers: &answers,
            catalog: &catalog,
            manifests: &mut manifests,
        };

        FeatureHandler::new(solr_entry()).apply(&mut ctx).unwrap();
        manifests.flush_all().unwrap();

        assert!(!ws.absolute(Path::new("docker/solr/Dockerfile")).exists());
        let written = fs::read_to_string(ws.absolute(Path::new("composer.json"))).unwrap();
        assert!(!written.contains("search_api_solr"));
    }

    #[test]
    fn test_feature_handler_is_idempotent() {
        let (_t, ws, answers, catalog) = setup(&["redis"]);
        let handler = FeatureHandler::new(solr_entry());

        for _ in 0..2 {
            let mut manifests = ManifestSet::new(&ws);
            let mut ctx = PipelineContext {
                workspace: &ws,
                answers: &answers,
                catalog: &catalog,
                manifests: &mut manifests,
            };
            handler.apply(&mut ctx).unwrap();
            manifests.flush_all().unwrap();
        }

        assert!(!ws.absolute(Path::new("docker/solr")).exists());
    }
}
