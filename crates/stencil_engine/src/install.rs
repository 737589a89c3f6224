//! Project instantiation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use stencil_catalog::DescriptorLoader;
use stencil_prompts::{resolve, Answers, Sources};

use crate::error::{EngineError, EngineResult};
use crate::persist::ProjectState;
use crate::pipeline::Pipeline;
use crate::source::TemplateSource;
use crate::workspace::Workspace;

/// Outcome of a successful instantiation.
#[derive(Debug)]
pub struct InstallReport {
    pub root: PathBuf,
    pub answers: Answers,
}

/// Instantiate a template into `output`.
///
/// Fetches the snapshot directly into the output directory, resolves
/// answers from the given sources, runs the full pipeline, and persists
/// the project state. A fatal error mid-pipeline leaves the directory
/// partially written; callers needing atomicity point `output` at a
/// disposable directory and promote it on success.
pub fn install(
    source: &TemplateSource,
    output: &Path,
    sources: &mut Sources,
) -> EngineResult<InstallReport> {
    if output.exists() && fs::read_dir(output)?.next().is_some() {
        return Err(EngineError::OutputNotEmpty(output.to_path_buf()));
    }
    fs::create_dir_all(output)?;

    source.fetch(output)?;

    let (descriptor, catalog) = DescriptorLoader::load_catalog(output)?;
    let answers = resolve(&descriptor.prompts, sources)?;

    let workspace = Workspace::new(output);
    Pipeline::standard(&catalog, &answers).run(&workspace, &answers, &catalog)?;

    let reference = match source {
        TemplateSource::Git { reference, .. } => reference.clone(),
        TemplateSource::Local { .. } => None,
    };
    ProjectState::new(source.location(), reference, &answers).save(output)?;

    info!("Instantiated project at {:?}", output);
    Ok(InstallReport {
        root: output.to_path_buf(),
        answers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_refuses_non_empty_output() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(output.path().join("existing.txt"), "x").unwrap();

        let source = TemplateSource::Local {
            path: template.path().to_path_buf(),
        };
        let err = install(&source, output.path(), &mut Sources::empty()).unwrap_err();
        assert!(matches!(err, EngineError::OutputNotEmpty(_)));
    }
}
