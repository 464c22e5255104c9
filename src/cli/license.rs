//! Check-license command handler.
//!
//! Looks identifiers up in the configured license registry.

use crate::config::RegistryConfig;
use crate::model::LICENSE_REF_PREFIX;
use crate::registry::{load_registry, LicenseRegistry};
use anyhow::Result;
use std::fmt;

/// How the registry classifies an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseStatus {
    /// On the SPDX license list
    Listed,
    /// On the SPDX exception list
    Exception,
    /// A user-defined `LicenseRef-*`
    UserDefined,
    Unknown,
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed => write!(f, "listed license"),
            Self::Exception => write!(f, "listed exception"),
            Self::UserDefined => write!(f, "user-defined license"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a single identifier
#[must_use]
pub fn classify_license(registry: &dyn LicenseRegistry, id: &str) -> LicenseStatus {
    if id.starts_with(LICENSE_REF_PREFIX) {
        LicenseStatus::UserDefined
    } else if registry.is_listed_license(id) {
        LicenseStatus::Listed
    } else if registry.is_known_exception_id(id) {
        LicenseStatus::Exception
    } else {
        LicenseStatus::Unknown
    }
}

/// Run the check-license command.
///
/// Exits with code 1 when any identifier is unknown.
pub fn run_check_license(config: &RegistryConfig, ids: &[String]) -> Result<()> {
    let registry = load_registry(config);

    match registry.license_list_version() {
        Some(version) => println!("License list version: {version}"),
        None => println!("License list version: (unset)"),
    }

    let mut unknown = 0usize;
    for id in ids {
        let status = classify_license(registry.as_ref(), id);
        if status == LicenseStatus::Unknown {
            unknown += 1;
        }
        println!("{id}: {status}");
    }

    if unknown > 0 {
        tracing::warn!("{} of {} identifier(s) are unknown", unknown, ids.len());
        std::process::exit(1);
    }
    Ok(())
}
