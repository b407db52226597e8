//! Error types for the Biblia data tools.
//!
//! Library crates use [`BibliaError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Biblia operations.
#[derive(Debug, thiserror::Error)]
pub enum BibliaError {
    /// Configuration loading or validation error (including missing API keys).
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the inference endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// JSON or reference parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Inference API error (bad status, unexpected body, unusable model output).
    #[error("inference error: {0}")]
    Inference(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (duplicate seed keys, wrong top-level shape, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BibliaError>;

impl BibliaError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
