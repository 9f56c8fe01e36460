//! Error types for docfuse.
//!
//! Library crates use [`DocfuseError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docfuse operations.
#[derive(Debug, thiserror::Error)]
pub enum DocfuseError {
    /// No project profile exists for the requested documentation set.
    /// Fatal for that set only; sibling sets keep running.
    #[error("documentation set '{id}' is not supported: no project profile found")]
    ConfigNotSupported { id: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Navigation-tree shape error (unexpected node type or missing field).
    #[error("nav parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad profile fields, empty trees, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocfuseError>;

impl DocfuseError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a nav parse error from any displayable message.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocfuseError::config("profile host missing");
        assert_eq!(err.to_string(), "config error: profile host missing");

        let err = DocfuseError::ConfigNotSupported {
            id: "svelte-docs".into(),
        };
        assert!(err.to_string().contains("svelte-docs"));
        assert!(err.to_string().contains("no project profile"));
    }

    #[test]
    fn parse_error_formatting() {
        let err = DocfuseError::parse("nav node is a number");
        assert!(err.to_string().starts_with("nav parse error"));
    }
}
