//! Update command - Re-apply a newer template revision to an existing project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stencil_engine::{update, TemplateSource};

#[derive(Args)]
pub struct UpdateArgs {
    /// Project directory to update
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Override the persisted template source
    #[arg(short, long)]
    source: Option<String>,

    /// Override the persisted git reference (requires --source)
    #[arg(long = "ref", requires = "source")]
    reference: Option<String>,
}

pub async fn execute(args: UpdateArgs) -> Result<()> {
    let source_override = args
        .source
        .as_ref()
        .map(|s| TemplateSource::parse(s, args.reference.clone()));

    let report = update(&args.project, source_override)
        .with_context(|| format!("Failed to update project {:?}", args.project))?;

    info!(
        "Update wrote {} files and deleted {}",
        report.written.len(),
        report.deleted.len()
    );

    println!("Project {:?} updated.", args.project);
    if !report.deleted.is_empty() {
        println!("Removed paths of disabled features:");
        for path in &report.deleted {
            println!("  {:?}", path);
        }
    }
    println!("Review the working-tree diff before committing.");

    Ok(())
}
