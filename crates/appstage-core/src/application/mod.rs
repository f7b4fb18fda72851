//! Application layer for appstage.
//!
//! This layer contains:
//! - **Services**: the `BuildStager` and the `Toolstack` variants
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Staging rules that do
//! not touch the filesystem (ignore lists, destinations, slugs) live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{BuildStager, Composer, StagingState, Toolstack, Vanilla, create_toolstack};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Filesystem, ProgressSink, VersionControl};

pub use error::ApplicationError;
