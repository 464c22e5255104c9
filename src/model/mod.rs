//! In-memory SPDX 2.3 document model.
//!
//! A [`SpdxDocument`] owns every package, file and snippet it describes;
//! elements refer to one another only through [`SpdxId`] values, so the
//! object graph is a flat arena and reference cycles need no special
//! handling.
//!
//! License information is a closed algebra, [`AnyLicenseInfo`], with two
//! renderings: the diagnostic `Display` form and the wire expression from
//! [`AnyLicenseInfo::to_expression`].
//!
//! ```
//! use spdx_writer::model::{AnyLicenseInfo, CreationInfo, Creator, SpdxDocument, SpdxPackage};
//!
//! let mut info = CreationInfo::now();
//! info.add_creator(Creator::tool("spdx-writer"));
//! let mut doc = SpdxDocument::new("demo", "https://example.com/spdx/demo", info);
//!
//! let pkg = doc.add_package(SpdxPackage::new("SPDXRef-Package", "demo")).unwrap();
//! pkg.license_declared = Some(AnyLicenseInfo::or_later("GPL-2.0"));
//! doc.add_document_describes("SPDXRef-Package");
//! ```

mod document;
mod elements;
mod identifiers;
mod license;
mod metadata;
mod pointer;
mod validation;

pub use document::*;
pub use elements::*;
pub use identifiers::*;
pub use license::*;
pub use metadata::*;
pub use pointer::*;
pub use validation::*;
