//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the staging engine needs from external systems.
//! The `appstage-adapters` crate provides implementations.

use crate::domain::LinkOptions;
use crate::error::StageResult;
use std::path::{Path, PathBuf};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `appstage_adapters::filesystem::LocalFilesystem` (production)
///
/// ## Design Notes
///
/// - Paths are absolute; the engine resolves them before calling in
/// - Symlinks inside copied trees are re-created, never followed
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists (a dangling symlink counts).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a whole file.
    fn read(&self, path: &Path) -> StageResult<Vec<u8>>;

    /// Write `content` to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> StageResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StageResult<()>;

    /// Copy a file, or a directory recursively, overwriting the destination.
    fn copy(&self, source: &Path, destination: &Path) -> StageResult<()>;

    /// Create `link` pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path, options: LinkOptions) -> StageResult<()>;

    /// Recursively copy `source` into `destination`, skipping every entry
    /// whose name matches one of `exclude`.
    fn copy_all(
        &self,
        source: &Path,
        destination: &Path,
        exclude: &[String],
        overwrite: bool,
    ) -> StageResult<()>;

    /// Remove a file, symlink or directory tree.
    fn remove(&self, path: &Path) -> StageResult<()>;

    /// Expand a shell glob relative to `root`. No matches is not an error.
    fn glob(&self, root: &Path, pattern: &str) -> StageResult<Vec<PathBuf>>;
}

/// Port answering "is this directory inside a checked-out repository".
///
/// Implemented by:
/// - `appstage_adapters::vcs::GitDetector`
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    fn is_repository(&self, path: &Path) -> bool;
}

/// Line-oriented channel for human-readable progress messages.
///
/// Implemented by:
/// - `appstage_adapters::progress::RecordingProgress` (testing)
/// - `appstage_adapters::progress::NullProgress`
/// - the CLI's `OutputManager`
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Port for running external programs.
///
/// Implemented by:
/// - `appstage_adapters::shell::LocalShell`
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `working_dir`, failing on non-zero exit.
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> StageResult<()>;
}
