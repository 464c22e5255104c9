//! Registry loaded from the canonical SPDX license list JSON files
//! (`licenses.json` and `exceptions.json` from the license-list-data
//! repository).

use super::LicenseRegistry;
use crate::error::{RegistryErrorKind, Result, SpdxError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// A license entry from `licenses.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedLicense {
    pub license_id: String,
    pub name: String,
    #[serde(default)]
    pub is_osi_approved: bool,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// An exception entry from `exceptions.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedException {
    pub license_exception_id: String,
    pub name: String,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseListFile {
    license_list_version: Option<String>,
    licenses: Vec<ListedLicense>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionListFile {
    exceptions: Vec<ListedException>,
}

/// License registry keyed by identifier (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct FileLicenseRegistry {
    license_list_version: Option<String>,
    licenses: IndexMap<String, ListedLicense>,
    exceptions: IndexMap<String, ListedException>,
}

impl FileLicenseRegistry {
    /// Load a license list and, optionally, an exception list.
    pub fn load(license_list: &Path, exception_list: Option<&Path>) -> Result<Self> {
        let list: LicenseListFile = read_json(license_list)?;
        let mut registry = Self::from_licenses(list.license_list_version, list.licenses);

        if let Some(path) = exception_list {
            let exceptions: ExceptionListFile = read_json(path)?;
            registry.add_exceptions(exceptions.exceptions);
        }

        Ok(registry)
    }

    /// Parse a `licenses.json` document held in memory
    pub fn from_license_json(content: &str) -> Result<Self> {
        let list: LicenseListFile = serde_json::from_str(content).map_err(|e| {
            SpdxError::registry("parsing license list", RegistryErrorKind::Malformed(e.to_string()))
        })?;
        Ok(Self::from_licenses(list.license_list_version, list.licenses))
    }

    fn from_licenses(version: Option<String>, licenses: Vec<ListedLicense>) -> Self {
        let licenses = licenses
            .into_iter()
            .map(|lic| (lic.license_id.to_lowercase(), lic))
            .collect();
        Self {
            license_list_version: version,
            licenses,
            exceptions: IndexMap::new(),
        }
    }

    pub fn add_exceptions(&mut self, exceptions: Vec<ListedException>) {
        self.exceptions.extend(
            exceptions
                .into_iter()
                .map(|exc| (exc.license_exception_id.to_lowercase(), exc)),
        );
    }

    #[must_use]
    pub fn license(&self, id: &str) -> Option<&ListedLicense> {
        self.licenses.get(&id.to_lowercase())
    }

    #[must_use]
    pub fn exception(&self, id: &str) -> Option<&ListedException> {
        self.exceptions.get(&id.to_lowercase())
    }

    #[must_use]
    pub fn license_count(&self) -> usize {
        self.licenses.len()
    }

    #[must_use]
    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}

impl LicenseRegistry for FileLicenseRegistry {
    fn license_list_version(&self) -> Option<String> {
        self.license_list_version.clone()
    }

    fn is_listed_license(&self, id: &str) -> bool {
        self.license(id).is_some()
    }

    fn is_known_exception_id(&self, id: &str) -> bool {
        self.exception(id).is_some()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(SpdxError::registry(
            "loading license list",
            RegistryErrorKind::NotFound(path.to_path_buf()),
        ));
    }
    let content = std::fs::read_to_string(path).map_err(|e| SpdxError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        SpdxError::registry(
            format!("parsing {}", path.display()),
            RegistryErrorKind::Malformed(e.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LICENSES: &str = r#"{
        "licenseListVersion": "3.23",
        "licenses": [
            {"licenseId": "MIT", "name": "MIT License", "isOsiApproved": true,
             "seeAlso": ["https://opensource.org/license/mit/"]},
            {"licenseId": "GPL-2.0", "name": "GNU General Public License v2.0 only",
             "isDeprecatedLicenseId": true}
        ],
        "releaseDate": "2024-02-08"
    }"#;

    const EXCEPTIONS: &str = r#"{
        "licenseListVersion": "3.23",
        "exceptions": [
            {"licenseExceptionId": "Classpath-exception-2.0", "name": "Classpath exception 2.0"}
        ]
    }"#;

    #[test]
    fn test_from_license_json() {
        let registry = FileLicenseRegistry::from_license_json(LICENSES).unwrap();
        assert_eq!(registry.license_list_version().as_deref(), Some("3.23"));
        assert_eq!(registry.license_count(), 2);
        assert!(registry.is_listed_license("MIT"));
        assert!(registry.is_listed_license("mit"));
        assert!(registry.license("GPL-2.0").unwrap().is_deprecated_license_id);
        assert!(!registry.is_listed_license("ISC"));
    }

    #[test]
    fn test_load_from_files() {
        let mut licenses = tempfile::NamedTempFile::new().unwrap();
        licenses.write_all(LICENSES.as_bytes()).unwrap();
        let mut exceptions = tempfile::NamedTempFile::new().unwrap();
        exceptions.write_all(EXCEPTIONS.as_bytes()).unwrap();

        let registry = FileLicenseRegistry::load(licenses.path(), Some(exceptions.path())).unwrap();
        assert!(registry.is_known_exception_id("Classpath-exception-2.0"));
        assert_eq!(registry.exception_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = FileLicenseRegistry::load(Path::new("/nonexistent/licenses.json"), None).unwrap_err();
        assert!(matches!(
            err,
            SpdxError::Registry {
                source: RegistryErrorKind::NotFound(_),
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut licenses = tempfile::NamedTempFile::new().unwrap();
        licenses.write_all(b"{\"licenses\": 42}").unwrap();

        let err = FileLicenseRegistry::load(licenses.path(), None).unwrap_err();
        assert!(matches!(
            err,
            SpdxError::Registry {
                source: RegistryErrorKind::Malformed(_),
                ..
            }
        ));
    }
}
