//! Update reconciliation.
//!
//! Re-runs the engine against an already-instantiated project at a newer
//! template revision. The new snapshot is transformed in a scratch
//! directory with the project's persisted answers, then every engine-owned
//! path is promoted over the project. There is no three-way merge and no
//! attempt to preserve manual edits to owned files; the caller resolves
//! the resulting working-tree diff with ordinary version-control tooling.
//! That trade (predictability over automatic conflict resolution) is a
//! product decision, not a gap.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use stencil_catalog::DescriptorLoader;
use stencil_prompts::{resolve, Sources};

use crate::error::EngineResult;
use crate::handler::disabled_owned_paths;
use crate::persist::ProjectState;
use crate::pipeline::Pipeline;
use crate::source::TemplateSource;
use crate::workspace::Workspace;

/// What an update touched, for logging and diff review.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Paths overwritten or created in the project.
    pub written: Vec<PathBuf>,
    /// Disabled-feature paths removed from the project.
    pub deleted: Vec<PathBuf>,
}

/// Update an existing project to a newer template revision.
///
/// `source_override` replaces the persisted source/reference (for example
/// to move the pin to a newer tag); otherwise the persisted pin is used.
pub fn update(
    project_root: &Path,
    source_override: Option<TemplateSource>,
) -> EngineResult<UpdateReport> {
    let state = ProjectState::load(project_root)?;
    let source = source_override
        .unwrap_or_else(|| TemplateSource::parse(&state.source, state.reference.clone()));

    info!(
        "Updating {:?} from template '{}'",
        project_root,
        source.location()
    );

    // Transform the new revision in a scratch workspace so a mid-pipeline
    // failure never leaves the project half-written.
    let scratch = tempfile::tempdir()?;
    source.fetch(scratch.path())?;

    let (descriptor, catalog) = DescriptorLoader::load_catalog(scratch.path())?;

    // Persisted answers act as the config-document source; prompts added
    // since the pinned revision resolve from env or fall back to defaults.
    let mut sources = Sources::from_process_env().with_config(state.answers_config()?);
    let answers = resolve(&descriptor.prompts, &mut sources)?;

    let scratch_ws = Workspace::new(scratch.path());
    Pipeline::standard(&catalog, &answers).run(&scratch_ws, &answers, &catalog)?;

    // Promote: the engine owns every path it generated, plus the owned
    // paths of disabled features. Everything else stays untouched.
    let mut report = UpdateReport::default();
    let project_ws = Workspace::new(project_root);

    for pattern in disabled_owned_paths(&catalog, &answers) {
        let deleted = project_ws.delete_matching(&pattern)?;
        report.deleted.extend(deleted);
    }

    for relative in scratch_ws.files() {
        let target = project_ws.absolute(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(scratch_ws.absolute(&relative), &target)?;
        debug!("Promoted {:?}", relative);
        report.written.push(relative);
    }

    project_ws.prune_empty_dirs()?;

    let reference = match &source {
        TemplateSource::Git { reference, .. } => reference.clone(),
        TemplateSource::Local { .. } => state.reference.clone(),
    };
    ProjectState::new(source.location(), reference, &answers).save(project_root)?;

    info!(
        "Update complete: {} written, {} deleted",
        report.written.len(),
        report.deleted.len()
    );
    Ok(report)
}
