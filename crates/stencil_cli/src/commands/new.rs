//! New command - Instantiate a template into a fresh project directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stencil_engine::{install, TemplateSource};
use stencil_prompts::{ConfigDoc, Sources};

#[derive(Args)]
pub struct NewArgs {
    /// Template source: a local directory or a git URL
    #[arg(short, long)]
    source: String,

    /// Git reference (branch or tag) to pin the template to
    #[arg(long = "ref")]
    reference: Option<String>,

    /// Output directory for the new project
    #[arg(short, long)]
    output: PathBuf,

    /// YAML config document with prompt answers
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inline YAML literal with prompt answers (overrides --config)
    #[arg(long = "config-yaml")]
    config_yaml: Option<String>,
}

pub async fn execute(args: NewArgs) -> Result<()> {
    let source = TemplateSource::parse(&args.source, args.reference);
    info!("Instantiating '{}' into {:?}", source.location(), args.output);

    let mut sources = Sources::from_process_env();
    if let Some(literal) = &args.config_yaml {
        let doc = ConfigDoc::from_literal(literal).context("Failed to parse --config-yaml")?;
        sources = sources.with_config(doc);
    } else if let Some(path) = &args.config {
        let doc = ConfigDoc::from_file(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        sources = sources.with_config(doc);
    }

    let report = install(&source, &args.output, &mut sources)
        .context("Failed to instantiate template")?;

    println!("Project created at {:?}", report.root);
    println!();
    println!("Resolved answers:");
    for (id, value) in report.answers.iter() {
        println!("  {}: {}", id, value.display_form());
    }

    Ok(())
}
