//! **Build and serialize SPDX 2.3 software bill of materials documents.**
//!
//! `spdx-writer` provides an in-memory SPDX document model and a serializer
//! that turns it into the SPDX JSON, YAML or tag-value encodings.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The document model. [`SpdxDocument`] owns packages, files
//!   and snippets; elements refer to each other by [`SpdxId`]. License
//!   information is expressed with the [`AnyLicenseInfo`] algebra.
//! - **[`serialize`]**: [`SpdxSerializer`] converts a document into its wire
//!   form, replacing every cross-reference with an identifier and refusing to
//!   emit documents with dangling references or incomplete data.
//! - **[`registry`]**: The SPDX license list, used to stamp
//!   `licenseListVersion` and to report unknown identifiers.
//! - **[`config`]**: YAML configuration with discovery and validation.
//!
//! ## Building a Document
//!
//! ```no_run
//! use spdx_writer::{
//!     AnyLicenseInfo, CreationInfo, Creator, SpdxDocument, SpdxPackage, SpdxSerializer,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut info = CreationInfo::now();
//!     info.add_creator(Creator::tool("my-build-tool"));
//!     let mut doc = SpdxDocument::new("my-app", "https://example.com/spdx/my-app-1.0", info);
//!
//!     let pkg = doc.add_package(SpdxPackage::new("SPDXRef-my-app", "my-app"))?;
//!     pkg.version_info = Some("1.0.0".to_string());
//!     pkg.license_declared = Some(AnyLicenseInfo::or(vec![
//!         AnyLicenseInfo::license("MIT"),
//!         AnyLicenseInfo::license("Apache-2.0"),
//!     ])?);
//!     doc.add_document_describes("SPDXRef-my-app");
//!
//!     SpdxSerializer::default().write_to_path(&doc, "my-app.spdx.json".as_ref())?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::unused_self
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod serialize;

pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, Result, SpdxError};
pub use model::{
    AnyLicenseInfo, CreationInfo, Creator, DocumentValidator, SpdxDocument, SpdxFile, SpdxId,
    SpdxPackage, SpdxSnippet, ValidationReport,
};
pub use registry::{BuiltinLicenseRegistry, FileLicenseRegistry, LicenseRegistry};
pub use serialize::{OutputFormat, SerializerOptions, SpdxSerializer};
