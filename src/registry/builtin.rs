//! Registry backed by the license tables compiled into the `spdx` crate.

use super::LicenseRegistry;

/// License registry using the `spdx` crate's built-in identifier tables.
#[derive(Debug, Clone, Default)]
pub struct BuiltinLicenseRegistry {
    license_list_version: Option<String>,
}

impl BuiltinLicenseRegistry {
    /// Create a registry reporting the given license list version
    #[must_use]
    pub const fn new(license_list_version: Option<String>) -> Self {
        Self {
            license_list_version,
        }
    }
}

impl LicenseRegistry for BuiltinLicenseRegistry {
    fn license_list_version(&self) -> Option<String> {
        self.license_list_version.clone()
    }

    fn is_listed_license(&self, id: &str) -> bool {
        spdx::license_id(id).is_some()
    }

    fn is_known_exception_id(&self, id: &str) -> bool {
        spdx::exception_id(id).is_some()
    }
}
