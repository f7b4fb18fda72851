// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for appstage.
//!
//! This module contains pure staging logic with no filesystem access.
//! All I/O is handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few external crates**: std + thiserror, `glob` for pattern matching
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod templates;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    app::{AppDescriptor, AppDescriptorBuilder},
    common::RelativePath,
    destinations::{
        APP_ROOT_PLACEHOLDER, DestinationTemplate, SpecialDestination, SpecialDestinations,
        WEB_ROOT_PLACEHOLDER,
    },
    ignore_list::{DEFAULT_IGNORED, IgnoreList},
};

pub use error::{DomainError, ErrorCategory};

pub use templates::builtin_gitignore;

pub use value_objects::{BuildSettings, LinkOptions, LocalConfig, Slug, ToolstackKind};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Slug Tests
    // ========================================================================

    #[test]
    fn slug_collapses_runs_to_one_hyphen() {
        assert_eq!(Slug::new("My App!").as_str(), "My-App-");
        assert_eq!(Slug::new("a  &&  b").as_str(), "a-b");
    }

    #[test]
    fn slug_keeps_hyphen_and_underscore() {
        assert_eq!(Slug::new("api_v2-backend").as_str(), "api_v2-backend");
    }

    #[test]
    fn slug_replaces_non_ascii() {
        assert_eq!(Slug::new("café/app").as_str(), "caf-app");
    }

    // ========================================================================
    // AppDescriptor Tests
    // ========================================================================

    #[test]
    fn app_builder_defaults() {
        let app = AppDescriptor::builder("/srv/project/shop").build().unwrap();

        assert_eq!(app.name(), "shop");
        assert_eq!(app.document_root().as_str(), "public");
        assert!(!app.should_move_to_root());
    }

    #[test]
    fn app_builder_full() {
        let app = AppDescriptor::builder("/srv/project")
            .name("My App")
            .document_root("web")
            .move_to_root(true)
            .build()
            .unwrap();

        assert_eq!(app.name(), "My App");
        assert_eq!(app.document_root().as_str(), "web");
        assert!(app.should_move_to_root());
    }

    #[test]
    fn app_builder_rejects_relative_root() {
        let result = AppDescriptor::builder("project").build();
        assert!(matches!(result, Err(DomainError::RelativeAppRoot { .. })));
    }

    #[test]
    fn app_builder_rejects_escaping_document_root() {
        let result = AppDescriptor::builder("/srv/project")
            .document_root("../public")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn app_builder_rejects_blank_name() {
        let result = AppDescriptor::builder("/srv/project").name("  ").build();
        assert_eq!(result.unwrap_err(), DomainError::EmptyAppName);
    }

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn toolstack_kind_parses() {
        assert_eq!(
            ToolstackKind::from_str("Composer").unwrap(),
            ToolstackKind::Composer
        );
        assert_eq!(
            ToolstackKind::from_str("vanilla").unwrap(),
            ToolstackKind::Vanilla
        );
        assert!(matches!(
            ToolstackKind::from_str("drupal"),
            Err(DomainError::UnknownToolstack(_))
        ));
    }

    #[test]
    fn local_config_defaults() {
        let config = LocalConfig::default();
        assert_eq!(config.get("local.web_root").as_deref(), Some("_www"));
        assert_eq!(config.get("local.shared_dir").as_deref(), Some("shared"));
        assert_eq!(
            config.get("local.copy_on_windows").as_deref(),
            Some("false")
        );
        assert_eq!(config.get("local.unknown"), None);
    }

    #[test]
    fn link_options_default_to_relative() {
        let options = LinkOptions::default();
        assert!(options.relative);
        assert!(!options.copy_on_windows);
    }

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn blank_web_root_is_invalid() {
        let config = LocalConfig {
            web_root: String::new(),
            ..LocalConfig::default()
        };
        assert!(DomainValidator::validate_local_config(&config).is_err());
    }

    #[test]
    fn relative_source_dir_is_invalid() {
        let settings = BuildSettings::default().with_source_dir("checkout");
        assert!(DomainValidator::validate_settings(&settings).is_err());
    }
}
