//! Configuration for spdx-writer.
//!
//! Configuration comes from an optional YAML file, discovered in the
//! current directory, the git root, `~/.config/spdx-writer/` or the home
//! directory, and is then overridden by command-line arguments.
//!
//! ```yaml
//! output:
//!   format: json
//!   pretty: true
//! document:
//!   creators:
//!     - "Tool: spdx-writer"
//! registry:
//!   license_list: ./license-list-data/json/licenses.json
//! validation:
//!   fail_on_warning: true
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, DocumentConfig, OutputConfig, RegistryConfig, ValidationConfig,
    DEFAULT_NAMESPACE_BASE,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `.spdx-writer.yaml` format.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
