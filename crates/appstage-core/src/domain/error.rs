// ============================================================================
// domain/error.rs - STAGING DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside `StageError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Application root must be an absolute path: {path}")]
    RelativeAppRoot { path: String },

    #[error("Invalid document root '{path}': {reason}")]
    InvalidDocumentRoot { path: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Application name must not be empty")]
    EmptyAppName,

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown toolstack '{0}'")]
    UnknownToolstack(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RelativeAppRoot { path } => vec![
                format!("'{}' is relative", path),
                "Pass an absolute path, or run from the application directory".into(),
            ],
            Self::InvalidDocumentRoot { path, .. } => vec![
                format!("Document root '{}' must stay inside the application", path),
                "Use a relative path such as 'public' or 'web'".into(),
            ],
            Self::EmptyAppName => vec!["Give the application a name with --name".into()],
            Self::InvalidPattern { pattern, .. } => vec![
                format!("Check the glob syntax of '{}'", pattern),
                "Supported wildcards: *, ?, [abc]".into(),
            ],
            Self::UnknownToolstack(_) => vec![
                "Available toolstacks:".into(),
                "  • vanilla  - copy or symlink the files as they are".into(),
                "  • composer - also run composer install".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownToolstack(_) => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
