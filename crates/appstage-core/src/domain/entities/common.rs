use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative and to stay below its base.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    ///
    /// Leading `./` components are dropped, so `./public` and `public` are
    /// the same path. An empty path is allowed and means "the base itself".
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::InvalidDocumentRoot {
                        path: path.display().to_string(),
                        reason: "'..' is not allowed".into(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed {
                        path: path.display().to_string(),
                    });
                }
            }
        }
        Ok(Self(normalized))
    }

    /// `true` for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Resolve against a base directory.
    ///
    /// The empty path resolves to `base` itself, without a trailing separator.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        if self.is_empty() {
            base.to_path_buf()
        } else {
            base.join(&self.0)
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or("")
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_current_dir_components() {
        let path = RelativePath::try_new("./public").unwrap();
        assert_eq!(path.as_str(), "public");
    }

    #[test]
    fn rejects_parent_components() {
        assert!(matches!(
            RelativePath::try_new("../outside"),
            Err(DomainError::InvalidDocumentRoot { .. })
        ));
    }

    #[test]
    fn rejects_absolute() {
        assert!(matches!(
            RelativePath::try_new("/var/www"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn empty_resolves_to_base() {
        let path = RelativePath::try_new("").unwrap();
        assert!(path.is_empty());
        assert_eq!(path.resolve(Path::new("/build")), PathBuf::from("/build"));
    }

    #[test]
    fn nested_resolves_below_base() {
        let path = RelativePath::try_new("web/public").unwrap();
        assert_eq!(
            path.resolve(Path::new("/build")),
            PathBuf::from("/build/web/public")
        );
    }
}
