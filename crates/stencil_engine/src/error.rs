//! Error types for the transformation engine.
//!
//! Every variant is fatal to the current run: the engine performs no
//! retries and no partial recovery. Each variant carries the offending
//! file, token, or location so the root cause is fixable from the message.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during a transformation run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed template {path:?} (line {line}): {message}")]
    MalformedTemplate {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Manifest error in {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Failed to fetch template source '{location}': {message}")]
    SourceFetch { location: String, message: String },

    #[error("Residual token '{token}' left in {path:?}")]
    ResidualToken { path: PathBuf, token: String },

    #[error("Output directory is not empty: {0:?}")]
    OutputNotEmpty(PathBuf),

    #[error("Not a stencil-managed project (missing {0:?})")]
    ProjectNotInitialized(PathBuf),

    #[error("Config error: {0}")]
    Config(#[from] stencil_prompts::ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] stencil_catalog::CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
