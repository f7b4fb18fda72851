//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! core crate only ever sees the [`LocalConfig`] slice of it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `APPSTAGE_LOCAL__WEB_ROOT`, `APPSTAGE_OUTPUT__NO_COLOR`, ...
//! 3. Config file (`--config FILE`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use appstage_core::domain::LocalConfig;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "APPSTAGE";

/// Every key `config get` / `config set` understand.
pub const KEYS: &[&str] = &[
    "local.web_root",
    "local.shared_dir",
    "local.copy_on_windows",
    "local.local_dir",
    "local.build_dir",
    "local.resources_dir",
    "output.no_color",
];

/// Keys holding booleans; everything else is a string.
pub const BOOL_KEYS: &[&str] = &["local.copy_on_windows", "output.no_color"];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local build settings.
    pub local: LocalSection,
    /// Output settings.
    pub output: OutputConfig,
}

/// The `[local]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSection {
    /// Name of the web-root link created in the source directory.
    pub web_root: String,
    /// Name of the shared-data directory in the source directory.
    pub shared_dir: String,
    /// Copy instead of symlinking where symlinks are unavailable.
    pub copy_on_windows: bool,
    /// Directory, relative to the source, holding local state.
    pub local_dir: PathBuf,
    /// Directory, relative to `local_dir`, holding builds.
    pub build_dir: PathBuf,
    /// Directory of `.gitignore` templates overriding the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_dir: Option<PathBuf>,
}

impl Default for LocalSection {
    fn default() -> Self {
        let core = LocalConfig::default();
        Self {
            web_root: core.web_root,
            shared_dir: core.shared_dir,
            copy_on_windows: core.copy_on_windows,
            local_dir: PathBuf::from(".platform/local"),
            build_dir: PathBuf::from("builds"),
            resources_dir: None,
        }
    }
}

impl LocalSection {
    /// The part of the configuration the staging engine reads.
    pub fn local_config(&self) -> LocalConfig {
        LocalConfig {
            web_root: self.web_root.clone(),
            shared_dir: self.shared_dir.clone(),
            copy_on_windows: self.copy_on_windows,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// A file named with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_with(config_file, true)
    }

    /// Like [`Self::load`], but a missing `--config` file only yields defaults
    /// when `explicit_required` is false.
    pub fn load_with(config_file: Option<&PathBuf>, explicit_required: bool) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), explicit_required),
            None => (Self::config_path(), false),
        };

        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialise default config")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration values have the wrong type")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.appstage.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "appstage", "appstage")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".appstage.toml"))
    }

    /// The file `config set` and `init` write to.
    pub fn target_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::config_path, Path::to_path_buf)
    }

    /// Look up a dotted key as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.local.local_config().get(key) {
            return Some(value);
        }
        match key {
            "local.local_dir" => Some(self.local.local_dir.display().to_string()),
            "local.build_dir" => Some(self.local.build_dir.display().to_string()),
            "local.resources_dir" => Some(
                self.local
                    .resources_dir
                    .as_ref()
                    .map_or_else(|| "(built-in)".to_owned(), |dir| dir.display().to_string()),
            ),
            "output.no_color" => Some(self.output.no_color.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_local_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.local.local_config(), LocalConfig::default());
        assert_eq!(cfg.local.local_dir, PathBuf::from(".platform/local"));
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn every_key_is_readable() {
        let cfg = AppConfig::default();
        for key in KEYS {
            assert!(cfg.get(key).is_some(), "{key}");
        }
        assert_eq!(cfg.get("local.web_root").as_deref(), Some("_www"));
        assert_eq!(cfg.get("nope"), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("appstage.toml");
        std::fs::write(
            &path,
            "[local]\nweb_root = \"web\"\ncopy_on_windows = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.local.web_root, "web");
        assert!(cfg.local.copy_on_windows);
        assert_eq!(cfg.local.shared_dir, "shared");
    }

    #[test]
    fn templates_are_built_in_by_default() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.local.resources_dir, None);
        assert_eq!(cfg.get("local.resources_dir").as_deref(), Some("(built-in)"));
        assert!(!toml::to_string(&cfg).unwrap().contains("resources_dir"));
    }

    #[test]
    fn resources_dir_can_be_set_in_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("appstage.toml");
        std::fs::write(&path, "[local]\nresources_dir = \"/opt/templates\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.local.resources_dir, Some(PathBuf::from("/opt/templates")));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn missing_file_is_allowed_when_not_required() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        let cfg = AppConfig::load_with(Some(&missing), false).unwrap();
        assert_eq!(cfg.local.web_root, "_www");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[local\nweb_root = ").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
