//! Error types surfaced to callers of the editor.

use thiserror::Error;

/// Failures that reach the caller. Idle states such as an empty selection
/// are not errors; those operations return without doing anything.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid template: {0}")]
    Template(#[from] serde_json::Error),
    #[error("Template contains duplicate object id {0}")]
    DuplicateId(uuid::Uuid),
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
