//! Domain value objects: settings, process configuration, link options,
//! slugs and toolstack kinds.
//!
//! # Design
//!
//! These are pure value types: equality-by-value, no identity, no I/O.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ── BuildSettings ────────────────────────────────────────────────────────────

/// Per-build options chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSettings {
    /// Copy files instead of symlinking them.
    pub copy: bool,
    /// Use absolute symlink targets instead of relative ones.
    pub absolute_links: bool,
    /// The project checkout; enables shared dirs and `.gitignore` seeding.
    pub source_dir: Option<PathBuf>,
    /// Namespace shared data per application.
    pub multi_app: bool,
}

impl BuildSettings {
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    pub fn with_absolute_links(mut self, absolute_links: bool) -> Self {
        self.absolute_links = absolute_links;
        self
    }

    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    pub fn with_multi_app(mut self, multi_app: bool) -> Self {
        self.multi_app = multi_app;
        self
    }
}

// ── LocalConfig ──────────────────────────────────────────────────────────────

/// The `local.*` process configuration the staging engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Name of the web-root link created in the project checkout.
    pub web_root: String,
    /// Name of the shared-data directory inside the project checkout.
    pub shared_dir: String,
    /// Copy instead of symlinking on platforms without symlink support.
    pub copy_on_windows: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            web_root: "_www".into(),
            shared_dir: "shared".into(),
            copy_on_windows: false,
        }
    }
}

impl LocalConfig {
    /// Look up a dotted `local.*` key as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "local.web_root" => Some(self.web_root.clone()),
            "local.shared_dir" => Some(self.shared_dir.clone()),
            "local.copy_on_windows" => Some(self.copy_on_windows.to_string()),
            _ => None,
        }
    }
}

// ── LinkOptions ──────────────────────────────────────────────────────────────

/// How the filesystem port should create symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Link targets are made relative to the link's directory.
    pub relative: bool,
    /// Fall back to copying where symlinks are unavailable.
    pub copy_on_windows: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            relative: true,
            copy_on_windows: false,
        }
    }
}

// ── Slug ─────────────────────────────────────────────────────────────────────

/// A filesystem-safe form of an application name.
///
/// Every run of characters outside `[A-Za-z0-9_-]` becomes a single `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut in_run = false;
        for c in name.chars() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                slug.push(c);
                in_run = false;
            } else if !in_run {
                slug.push('-');
                in_run = true;
            }
        }
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── ToolstackKind ────────────────────────────────────────────────────────────

/// The fixed set of toolstacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolstackKind {
    Vanilla,
    Composer,
}

impl ToolstackKind {
    pub const ALL: [Self; 2] = [Self::Vanilla, Self::Composer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vanilla => "vanilla",
            Self::Composer => "composer",
        }
    }

    /// The `.gitignore` template seeded for this toolstack.
    pub const fn gitignore_template(&self) -> &'static str {
        match self {
            Self::Vanilla => "gitignore-vanilla",
            Self::Composer => "gitignore-composer",
        }
    }
}

impl fmt::Display for ToolstackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolstackKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vanilla" | "none" => Ok(Self::Vanilla),
            "composer" | "php" => Ok(Self::Composer),
            other => Err(DomainError::UnknownToolstack(other.to_owned())),
        }
    }
}
