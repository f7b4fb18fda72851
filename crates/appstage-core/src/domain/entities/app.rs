//! The `AppDescriptor` entity and its builder.
//!
//! An `AppDescriptor` identifies one application inside a (possibly
//! multi-app) project checkout: where its files live, which subdirectory is
//! served as the web root, and what it is called.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// One application within a project.
///
/// Guaranteed on construction:
/// - `root` is absolute
/// - `document_root` is relative and stays inside the app
/// - `name` is non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    root: PathBuf,
    document_root: RelativePath,
    name: String,
    move_to_root: bool,
}

impl AppDescriptor {
    /// Start building a descriptor for the app at `root`.
    pub fn builder(root: impl Into<PathBuf>) -> AppDescriptorBuilder {
        AppDescriptorBuilder::new(root)
    }

    /// Absolute path to the application source.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Web root, relative to the build directory.
    pub fn document_root(&self) -> &RelativePath {
        &self.document_root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the app's files are staged directly into the web root.
    pub const fn should_move_to_root(&self) -> bool {
        self.move_to_root
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.root.is_absolute() {
            return Err(DomainError::RelativeAppRoot {
                path: self.root.display().to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyAppName);
        }
        Ok(())
    }
}

impl fmt::Display for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.root.display())
    }
}

/// Builder for [`AppDescriptor`].
///
/// The name defaults to the last component of the root, and the document
/// root defaults to `public`.
#[derive(Debug, Clone)]
pub struct AppDescriptorBuilder {
    root: PathBuf,
    document_root: String,
    name: Option<String>,
    move_to_root: bool,
}

impl AppDescriptorBuilder {
    fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            document_root: "public".into(),
            name: None,
            move_to_root: false,
        }
    }

    pub fn document_root(mut self, document_root: impl Into<String>) -> Self {
        self.document_root = document_root.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn move_to_root(mut self, move_to_root: bool) -> Self {
        self.move_to_root = move_to_root;
        self
    }

    pub fn build(self) -> Result<AppDescriptor, DomainError> {
        let document_root = RelativePath::try_new(&self.document_root)?;
        let name = match self.name {
            Some(name) => name,
            None => self
                .root
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .ok_or(DomainError::MissingRequiredField { field: "name" })?,
        };

        let app = AppDescriptor {
            root: self.root,
            document_root,
            name,
            move_to_root: self.move_to_root,
        };
        app.validate()?;
        Ok(app)
    }
}
