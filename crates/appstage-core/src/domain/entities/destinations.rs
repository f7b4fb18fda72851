//! Special destinations: individual files relocated after bulk staging.

use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder for the build's web root (`<build>/<document root>`).
pub const WEB_ROOT_PLACEHOLDER: &str = "{webroot}";
/// Placeholder for the build directory itself.
pub const APP_ROOT_PLACEHOLDER: &str = "{approot}";

/// A destination path containing `{webroot}` and/or `{approot}`.
///
/// Only those two placeholders are recognised; anything else is copied
/// through literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTemplate(String);

impl DestinationTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn web_root() -> Self {
        Self::new(WEB_ROOT_PLACEHOLDER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the template is exactly `{webroot}`.
    pub fn is_web_root(&self) -> bool {
        self.0 == WEB_ROOT_PLACEHOLDER
    }

    /// Substitute both placeholders.
    pub fn resolve(&self, web_root: &Path, app_dir: &Path) -> PathBuf {
        let resolved = self
            .0
            .replace(WEB_ROOT_PLACEHOLDER, &web_root.to_string_lossy())
            .replace(APP_ROOT_PLACEHOLDER, &app_dir.to_string_lossy());
        PathBuf::from(resolved)
    }
}

impl fmt::Display for DestinationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source glob (relative to the app root) mapped to where matches land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDestination {
    pub source_pattern: String,
    pub destination: DestinationTemplate,
}

/// The fixed, ordered map of special destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDestinations(Vec<SpecialDestination>);

impl SpecialDestinations {
    pub fn iter(&self) -> impl Iterator<Item = &SpecialDestination> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SpecialDestinations {
    fn default() -> Self {
        Self(
            ["favicon.ico", "robots.txt"]
                .into_iter()
                .map(|source| SpecialDestination {
                    source_pattern: source.to_owned(),
                    destination: DestinationTemplate::web_root(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_favicon_then_robots() {
        let map = SpecialDestinations::default();
        let sources: Vec<_> = map.iter().map(|d| d.source_pattern.as_str()).collect();
        assert_eq!(sources, ["favicon.ico", "robots.txt"]);
        assert!(map.iter().all(|d| d.destination.is_web_root()));
    }

    #[test]
    fn resolves_both_placeholders() {
        let template = DestinationTemplate::new("{approot}/static/{webroot}");
        let resolved = template.resolve(Path::new("www"), Path::new("/build"));
        assert_eq!(resolved, PathBuf::from("/build/static/www"));
    }

    #[test]
    fn web_root_template_resolves_to_web_root() {
        let resolved =
            DestinationTemplate::web_root().resolve(Path::new("/b/public"), Path::new("/b"));
        assert_eq!(resolved, PathBuf::from("/b/public"));
    }

    #[test]
    fn unknown_placeholders_are_literal() {
        let template = DestinationTemplate::new("{other}/x");
        assert!(!template.is_web_root());
        assert_eq!(
            template.resolve(Path::new("/w"), Path::new("/a")),
            PathBuf::from("{other}/x")
        );
    }
}
