//! Infrastructure adapters for appstage.
//!
//! This crate implements the ports defined in `appstage_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod progress;
pub mod shell;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::LocalFilesystem;
pub use progress::{NullProgress, RecordingProgress};
pub use shell::LocalShell;
pub use vcs::GitDetector;
