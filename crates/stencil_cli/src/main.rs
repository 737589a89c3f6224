//! stencil CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Configuration error
//! - 3: Malformed template
//! - 4: Manifest error
//! - 5: Source fetch error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};
use stencil_engine::EngineError;
use stencil_prompts::ConfigError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const TEMPLATE_ERROR: u8 = 3;
    pub const MANIFEST_ERROR: u8 = 4;
    pub const SOURCE_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "stencil=debug"
    } else if cli.quiet {
        "stencil=error"
    } else {
        "stencil=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::New(args) => commands::new::execute(args).await,
        Commands::Update(args) => commands::update::execute(args).await,
        Commands::Check(args) => commands::check::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map the first recognized error in the chain to an exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(engine) = cause.downcast_ref::<EngineError>() {
            return match engine {
                EngineError::Config(_) => ExitCodes::CONFIG_ERROR,
                EngineError::MalformedTemplate { .. }
                | EngineError::ResidualToken { .. }
                | EngineError::Catalog(_) => ExitCodes::TEMPLATE_ERROR,
                EngineError::Manifest { .. } => ExitCodes::MANIFEST_ERROR,
                EngineError::SourceFetch { .. } => ExitCodes::SOURCE_ERROR,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCodes::CONFIG_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
