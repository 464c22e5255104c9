//! Configuration file loading and discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Config file names searched in each directory, in order.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".spdx-writer.yaml",
    ".spdx-writer.yml",
    "spdx-writer.yaml",
    "spdx-writer.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/spdx-writer/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        find_git_root(cwd.as_deref()),
        dirs::config_dir().map(|d| d.join("spdx-writer")),
        dirs::home_dir(),
    ];

    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: Option<&Path>) -> Option<PathBuf> {
    start?
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.pretty != defaults.output.pretty {
            self.output.pretty = other.output.pretty;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }

        if other.document.namespace_base != defaults.document.namespace_base {
            self.document.namespace_base.clone_from(&other.document.namespace_base);
        }
        if other.document.creators != defaults.document.creators {
            self.document.creators.clone_from(&other.document.creators);
        }

        if other.registry.license_list.is_some() {
            self.registry.license_list.clone_from(&other.registry.license_list);
        }
        if other.registry.exception_list.is_some() {
            self.registry.exception_list.clone_from(&other.registry.exception_list);
        }
        if other.registry.license_list_version.is_some() {
            self.registry
                .license_list_version
                .clone_from(&other.registry.license_list_version);
        }

        if !other.validation.validate_before_write {
            self.validation.validate_before_write = false;
        }
        if other.validation.fail_on_warning {
            self.validation.fail_on_warning = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# spdx-writer configuration\n\
         # Place this file at .spdx-writer.yaml in your project root or ~/.config/spdx-writer/\n\n{}",
        serde_yaml_ng::to_string(&AppConfig::default()).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputConfig, ValidationConfig};
    use crate::serialize::OutputFormat;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".spdx-writer.yaml");
        std::fs::write(&config_path, "output:\n  format: yaml\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_git_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(Some(&nested)), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
output:
  format: tag-value
  pretty: false
document:
  creators:
    - 'Organization: Example Inc.'
validation:
  fail_on_warning: true
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output.format, OutputFormat::TagValue);
        assert!(!config.output.pretty);
        assert_eq!(config.document.creators, vec!["Organization: Example Inc.".to_string()]);
        assert!(config.validation.fail_on_warning);
        assert!(config.validation.validate_before_write);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_malformed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "output: [not, a, map]\n").unwrap();

        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        base.registry.license_list_version = Some("3.20".to_string());

        let overrides = AppConfig {
            output: OutputConfig {
                format: OutputFormat::Yaml,
                ..OutputConfig::default()
            },
            validation: ValidationConfig {
                validate_before_write: false,
                fail_on_warning: false,
            },
            ..AppConfig::default()
        };
        base.merge(&overrides);

        assert_eq!(base.output.format, OutputFormat::Yaml);
        assert!(!base.validation.validate_before_write);
        assert_eq!(base.registry.license_list_version.as_deref(), Some("3.20"));
    }

    #[test]
    fn test_example_config_round_trips() {
        let example = generate_example_config();
        assert!(example.contains("output:"));
        let parsed: AppConfig = serde_yaml_ng::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "output:\n  pretty: false").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
