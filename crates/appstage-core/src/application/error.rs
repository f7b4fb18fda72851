//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not domain
//! rules. Domain errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while staging a build.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A staging operation was called before `prepare`.
    #[error("Build has not been prepared")]
    NotPrepared,

    /// An external command (e.g. `composer`) failed.
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// A glob pattern could not be expanded.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ApplicationError {
    /// Build a `FilesystemError` from an I/O error.
    pub fn io(path: impl Into<PathBuf>, operation: &str, err: std::io::Error) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: format!("Failed to {}: {}", operation, err),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "The build directory may be incomplete; re-run the build from scratch".into(),
            ],
            Self::NotPrepared => vec!["This is a bug: prepare() must run first".into()],
            Self::CommandFailed { command, .. } => vec![
                format!("Ensure '{}' is installed and in your PATH", command),
                "Check the command output above for details".into(),
            ],
            Self::InvalidPattern { pattern, .. } => {
                vec![format!("Check the glob syntax of '{}'", pattern)]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::NotPrepared => ErrorCategory::Internal,
            Self::CommandFailed { .. } => ErrorCategory::Internal,
            Self::InvalidPattern { .. } => ErrorCategory::Validation,
        }
    }
}
