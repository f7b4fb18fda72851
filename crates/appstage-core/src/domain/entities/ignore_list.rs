//! Patterns excluded from staging.
//!
//! The list is an immutable snapshot. It is rebuilt from its three inputs
//! (defaults, toolstack additions, configured web root) every time a build
//! is prepared, so the order of calls never changes the result.

use glob::{MatchOptions, Pattern};

use crate::domain::error::DomainError;

/// Patterns every build ignores: all dot-files.
pub const DEFAULT_IGNORED: &[&str] = &[".*"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// An ordered, duplicate-free set of glob patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    patterns: Vec<String>,
    compiled: Vec<Pattern>,
}

impl IgnoreList {
    /// Build the snapshot for one build.
    ///
    /// Patterns keep their first-seen position; later duplicates are dropped.
    /// An empty `web_root` contributes nothing.
    pub fn snapshot<S: AsRef<str>>(added: &[S], web_root: &str) -> Result<Self, DomainError> {
        let candidates = DEFAULT_IGNORED
            .iter()
            .copied()
            .chain(added.iter().map(AsRef::as_ref))
            .chain(std::iter::once(web_root));

        let mut list = Self {
            patterns: Vec::new(),
            compiled: Vec::new(),
        };
        for pattern in candidates {
            list.push(pattern)?;
        }
        Ok(list)
    }

    fn push(&mut self, pattern: &str) -> Result<(), DomainError> {
        if pattern.is_empty() || self.patterns.iter().any(|p| p == pattern) {
            return Ok(());
        }
        let compiled = Pattern::new(pattern).map_err(|e| DomainError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.msg.to_owned(),
        })?;
        self.patterns.push(pattern.to_owned());
        self.compiled.push(compiled);
        Ok(())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a single path component (a file or directory name) is ignored.
    pub fn matches_name(&self, name: &str) -> bool {
        self.compiled
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    /// Whether a path relative to the app root is ignored, either listed
    /// verbatim or matched as a whole by one of the patterns.
    pub fn excludes(&self, relative: &str) -> bool {
        self.contains(relative)
            || self
                .compiled
                .iter()
                .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

impl Default for IgnoreList {
    fn default() -> Self {
        let mut list = Self {
            patterns: Vec::new(),
            compiled: Vec::new(),
        };
        for pattern in DEFAULT_IGNORED {
            if let Ok(compiled) = Pattern::new(pattern) {
                list.patterns.push((*pattern).to_owned());
                list.compiled.push(compiled);
            }
        }
        list
    }
}
