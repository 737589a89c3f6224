//! CLI command definitions.
//!
//! Each subcommand maps to one engine operation: `new` instantiates a
//! template, `update` reconciles an existing project against a newer
//! template revision, and `check` verifies that a tree carries no
//! residual template syntax.

use clap::{Parser, Subcommand};

pub mod check;
pub mod new;
pub mod update;

/// stencil - deterministic project templating
#[derive(Parser)]
#[command(name = "stencil")]
#[command(version, about = "stencil - deterministic project templating")]
#[command(long_about = r#"
stencil instantiates projects from templates that carry conditional
marker blocks, placeholder tokens, and a feature catalog, and keeps
instantiated projects up to date with their template.

WORKFLOWS:
  new     → Instantiate a template into a fresh project directory
  update  → Re-apply a newer template revision to an existing project
  check   → Verify a project tree carries no residual template syntax

EXIT CODES:
  0 - Success
  1 - General error
  2 - Configuration error
  3 - Malformed template
  4 - Manifest error
  5 - Source fetch error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Instantiate a template into a new project directory
    New(new::NewArgs),

    /// Update an existing project to a newer template revision
    Update(update::UpdateArgs),

    /// Verify a project tree carries no residual template syntax
    Check(check::CheckArgs),
}
