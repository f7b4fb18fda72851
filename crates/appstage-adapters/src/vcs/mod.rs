//! Version-control adapters.

use std::path::Path;

use appstage_core::application::ports::VersionControl;
use git2::Repository;
use tracing::trace;

/// Detects git checkouts with libgit2.
///
/// A path counts as a repository when it, or any parent, holds a `.git`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitDetector;

impl GitDetector {
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for GitDetector {
    fn is_repository(&self, path: &Path) -> bool {
        match Repository::discover(path) {
            Ok(_) => true,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "Not a git repository");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_directory_is_not_a_repository() {
        let tmp = TempDir::new().unwrap();
        assert!(!GitDetector.is_repository(tmp.path()));
    }

    #[test]
    fn initialised_directory_and_children_are_repositories() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();
        let nested = tmp.path().join("app/public");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(GitDetector.is_repository(tmp.path()));
        assert!(GitDetector.is_repository(&nested));
    }
}
