//! Known license registry.
//!
//! The registry answers two questions for the rest of the crate: which
//! version of the SPDX license list is in use, and whether a license or
//! exception identifier is on that list. Serialization works without one;
//! a missing registry only means `licenseListVersion` stays unset and
//! unknown identifiers go unreported.

mod builtin;
mod file;

pub use builtin::BuiltinLicenseRegistry;
pub use file::{FileLicenseRegistry, ListedException, ListedLicense};

use crate::config::RegistryConfig;
use crate::model::LICENSE_REF_PREFIX;

/// Lookup interface over a license list.
pub trait LicenseRegistry {
    /// Version of the license list, e.g. `"3.23"`
    fn license_list_version(&self) -> Option<String>;

    /// Whether `id` is a listed license
    fn is_listed_license(&self, id: &str) -> bool;

    /// Whether `id` is a listed license exception
    fn is_known_exception_id(&self, id: &str) -> bool;

    /// Whether `id` is acceptable as a license identifier.
    ///
    /// User-defined `LicenseRef-*` identifiers are always accepted, including
    /// those defined in an external document (`DocumentRef-x:LicenseRef-y`).
    fn is_known_license_id(&self, id: &str) -> bool {
        let local = match id.split_once(':') {
            Some((doc, license)) if doc.starts_with("DocumentRef-") => license,
            _ => id,
        };
        local.starts_with(LICENSE_REF_PREFIX) || self.is_listed_license(id)
    }
}

/// Build the registry described by `config`.
///
/// A license list that fails to load is logged and replaced by the
/// built-in tables, so a broken list file never blocks serialization.
#[must_use]
pub fn load_registry(config: &RegistryConfig) -> Box<dyn LicenseRegistry> {
    let builtin = || -> Box<dyn LicenseRegistry> {
        Box::new(BuiltinLicenseRegistry::new(config.license_list_version.clone()))
    };

    let Some(license_list) = &config.license_list else {
        return builtin();
    };

    match FileLicenseRegistry::load(license_list, config.exception_list.as_deref()) {
        Ok(registry) => {
            tracing::debug!(
                licenses = registry.license_count(),
                exceptions = registry.exception_count(),
                "Loaded license list from {}",
                license_list.display()
            );
            Box::new(registry)
        }
        Err(e) => {
            tracing::warn!("Falling back to built-in license tables: {}", e);
            builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_license_refs_always_known() {
        let registry = BuiltinLicenseRegistry::default();
        assert!(registry.is_known_license_id("LicenseRef-anything"));
        assert!(registry.is_known_license_id("DocumentRef-other:LicenseRef-anything"));
        assert!(!registry.is_known_license_id("DocumentRef-other:MIT"));
        assert!(!registry.is_known_license_id("Not-A-License"));
    }

    #[test]
    fn test_load_registry_falls_back_on_missing_file() {
        let config = RegistryConfig {
            license_list: Some(PathBuf::from("/nonexistent/licenses.json")),
            exception_list: None,
            license_list_version: Some("3.23".to_string()),
        };
        let registry = load_registry(&config);
        assert!(registry.is_known_license_id("MIT"));
        assert_eq!(registry.license_list_version().as_deref(), Some("3.23"));
    }
}
