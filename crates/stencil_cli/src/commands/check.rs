//! Check command - Verify a project tree carries no residual template syntax.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stencil_engine::{verify, Workspace};

#[derive(Args)]
pub struct CheckArgs {
    /// Project directory to scan
    #[arg(short, long, default_value = ".")]
    project: PathBuf,
}

pub async fn execute(args: CheckArgs) -> Result<()> {
    let workspace = Workspace::new(&args.project);
    verify::assert_clean(&workspace)
        .with_context(|| format!("Residual template syntax in {:?}", args.project))?;

    println!("Clean: no marker blocks or placeholder tokens found.");
    Ok(())
}
