//! Error types for catalog loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading the template descriptor.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Template descriptor not found: {0:?}")]
    DescriptorNotFound(PathBuf),

    #[error("Malformed template descriptor {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
