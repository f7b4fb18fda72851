use crate::domain::{
    entities::AppDescriptor,
    error::DomainError,
    value_objects::{BuildSettings, LocalConfig},
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_app(app: &AppDescriptor) -> Result<(), DomainError> {
        app.validate()
    }

    pub fn validate_settings(settings: &BuildSettings) -> Result<(), DomainError> {
        match &settings.source_dir {
            Some(dir) if !dir.is_absolute() => Err(DomainError::RelativeAppRoot {
                path: dir.display().to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn validate_local_config(config: &LocalConfig) -> Result<(), DomainError> {
        if config.web_root.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "local.web_root",
            });
        }
        if config.shared_dir.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "local.shared_dir",
            });
        }
        Ok(())
    }
}
