//! Error types for answer resolution.

use thiserror::Error;

/// Result type alias for prompt operations.
pub type PromptResult<T> = Result<T, ConfigError>;

/// Errors that can occur while resolving answers.
///
/// Every variant is fatal for the run: a malformed config document or an
/// out-of-range value aborts resolution rather than skipping the field.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed config document '{source_name}': {message}")]
    Parse { source_name: String, message: String },

    #[error("Invalid value for prompt '{prompt}': {message}")]
    InvalidValue { prompt: String, message: String },

    #[error("Prompt not found: {0}")]
    UnknownPrompt(String),

    #[error("Interactive input failed for prompt '{prompt}': {message}")]
    Input { prompt: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
