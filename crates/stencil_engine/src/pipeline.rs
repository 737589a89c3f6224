//! The handler pipeline.
//!
//! Stages run strictly in sequence: feature handlers first (deletions,
//! moves, queued manifest changes), then the marker pass, then the single
//! manifest flush, then the rename/substitution pass, and finally the
//! residual-token verification. Substitution must see the final set of
//! files, and manifests may carry placeholder values that the substitution
//! pass resolves, which fixes this order.

use std::path::Path;

use tracing::{debug, info};

use stencil_catalog::{Catalog, DESCRIPTOR_FILE};
use stencil_prompts::Answers;

use crate::error::EngineResult;
use crate::handler::{
    FeatureHandler, Handler, MarkerHandler, PipelineContext, RenameHandler,
};
use crate::manifest::ManifestSet;
use crate::verify;
use crate::workspace::Workspace;

/// Ordered handler sequence for one run.
pub struct Pipeline {
    handlers: Vec<Box<dyn Handler>>,
}

impl Pipeline {
    /// The standard pipeline: one feature handler per catalog entry, the
    /// marker pass, and the rename pass last.
    pub fn standard(catalog: &Catalog, answers: &Answers) -> Self {
        let mut handlers: Vec<Box<dyn Handler>> = catalog
            .entries()
            .iter()
            .cloned()
            .map(|entry| Box::new(FeatureHandler::new(entry)) as Box<dyn Handler>)
            .collect();
        handlers.push(Box::new(MarkerHandler::new()));
        handlers.push(Box::new(RenameHandler::new(answers)));
        Self { handlers }
    }

    /// Run every handler against the workspace, flush manifests, drop the
    /// template descriptor from the output, and verify the totality
    /// invariants. Any error aborts the run; there are no retries.
    pub fn run(
        &self,
        workspace: &Workspace,
        answers: &Answers,
        catalog: &Catalog,
    ) -> EngineResult<()> {
        workspace.remove_file(Path::new(DESCRIPTOR_FILE))?;

        let mut manifests = ManifestSet::new(workspace);

        // The rename pass is last in `handlers`; everything before it may
        // add or remove files. The manifest flush happens between the two
        // so substitution also covers freshly written manifest values.
        let Some((rename, earlier)) = self.handlers.split_last() else {
            return Ok(());
        };

        for handler in earlier {
            debug!("Running handler '{}'", handler.id());
            let mut ctx = PipelineContext {
                workspace,
                answers,
                catalog,
                manifests: &mut manifests,
            };
            handler.apply(&mut ctx)?;
        }

        manifests.flush_all()?;

        debug!("Running handler '{}'", rename.id());
        let mut ctx = PipelineContext {
            workspace,
            answers,
            catalog,
            manifests: &mut manifests,
        };
        rename.apply(&mut ctx)?;

        workspace.prune_empty_dirs()?;
        verify::assert_clean(workspace)?;

        info!("Pipeline complete for {:?}", workspace.root());
        Ok(())
    }
}
