//! Configuration types for spdx-writer.

use crate::serialize::{OutputFormat, SerializerOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base URI for generated document namespaces
pub const DEFAULT_NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs";

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Application configuration, loaded from a config file and overridden
/// by command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Document defaults (creators, namespace)
    pub document: DocumentConfig,
    /// License list configuration
    pub registry: RegistryConfig,
    /// Validation behavior before writing
    pub validation: ValidationConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer options derived from the output section
    #[must_use]
    pub const fn serializer_options(&self) -> SerializerOptions {
        SerializerOptions {
            format: self.output.format,
            pretty: self.output.pretty,
        }
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Indent JSON output
    pub pretty: bool,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            file: None,
        }
    }
}

/// Defaults applied to newly created documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DocumentConfig {
    /// Base URI that document namespaces are generated under
    pub namespace_base: String,
    /// Creators in SPDX form, e.g. `Tool: spdx-writer` or `Person: Jane (jane@example.com)`
    pub creators: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            namespace_base: DEFAULT_NAMESPACE_BASE.to_string(),
            creators: vec![format!("Tool: spdx-writer-{}", env!("CARGO_PKG_VERSION"))],
        }
    }
}

impl DocumentConfig {
    /// Namespace URI for a document called `name`
    #[must_use]
    pub fn namespace_for(&self, name: &str) -> String {
        format!("{}/{}", self.namespace_base.trim_end_matches('/'), name)
    }
}

/// Known license list configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegistryConfig {
    /// Path to an SPDX `licenses.json` (built-in tables when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_list: Option<PathBuf>,
    /// Path to an SPDX `exceptions.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_list: Option<PathBuf>,
    /// License list version reported by the built-in tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_list_version: Option<String>,
}

/// Validation behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run the validation pass before writing a document
    pub validate_before_write: bool,
    /// Treat validation warnings as errors
    pub fail_on_warning: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_before_write: true,
            fail_on_warning: false,
        }
    }
}
