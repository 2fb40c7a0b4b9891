//! Error types for loading and compiling tree definitions.

use marshal_core::TreeValidationError;
use thiserror::Error;

/// Errors that can occur while reading, writing or compiling a definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not one of `.json`, `.yaml` or `.yml`.
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),

    /// A compiled root failed structural validation.
    #[error("invalid command tree: {0}")]
    InvalidTree(#[from] TreeValidationError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
