//! Error types for pagemark.
//!
//! Library crates use [`PagemarkError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pagemark operations.
#[derive(Debug, thiserror::Error)]
pub enum PagemarkError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Content proxy fetch failed (unreachable or non-200).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Inference call failed or returned no usable content.
    #[error("inference error: {0}")]
    Inference(String),

    /// Artifact write failed (permissions, disk full).
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (blank URL, empty model name).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagemarkError>;

impl PagemarkError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PagemarkError::Fetch("HTTP 404".into());
        assert_eq!(err.to_string(), "fetch error: HTTP 404");

        let err = PagemarkError::config("missing endpoint");
        assert_eq!(err.to_string(), "config error: missing endpoint");

        let err = PagemarkError::validation("URL must not be empty");
        assert!(err.to_string().contains("URL must not be empty"));
    }
}
