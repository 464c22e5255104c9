//! Configuration validation.

use super::types::{AppConfig, DocumentConfig, OutputConfig, RegistryConfig};
use crate::model::Creator;
use crate::serialize::OutputFormat;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.output.validate());
        errors.extend(self.document.validate());
        errors.extend(self.registry.validate());
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(parent) = self.file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }

        if let Some(ext) = self.file.as_ref().and_then(|f| f.extension()).and_then(|e| e.to_str()) {
            let expected = self.format.extension();
            if !expected.ends_with(ext) {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("File extension '.{ext}' does not match format {} (.{expected})", self.format),
                ));
            }
        }

        errors
    }
}

impl Validatable for DocumentConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.namespace_base.trim().is_empty() {
            errors.push(ConfigError::new("document.namespace_base", "Namespace base is empty"));
        } else if self.namespace_base.contains('#') {
            errors.push(ConfigError::new(
                "document.namespace_base",
                format!("Namespace base must not contain '#': {}", self.namespace_base),
            ));
        }

        if self.creators.is_empty() {
            errors.push(ConfigError::new("document.creators", "At least one creator is required"));
        }
        for creator in &self.creators {
            if Creator::parse(creator).is_none() {
                errors.push(ConfigError::new(
                    "document.creators",
                    format!(
                        "Invalid creator '{creator}'. Expected 'Person: ...', 'Organization: ...' or 'Tool: ...'"
                    ),
                ));
            }
        }

        errors
    }
}

impl Validatable for RegistryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(path) = &self.license_list {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "registry.license_list",
                    format!("License list not found: {}", path.display()),
                ));
            }
        }
        if let Some(path) = &self.exception_list {
            if self.license_list.is_none() {
                errors.push(ConfigError::new(
                    "registry.exception_list",
                    "An exception list requires registry.license_list",
                ));
            } else if !path.exists() {
                errors.push(ConfigError::new(
                    "registry.exception_list",
                    format!("Exception list not found: {}", path.display()),
                ));
            }
        }

        errors
    }
}
