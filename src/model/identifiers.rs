//! Element identifiers.
//!
//! Every element of an SPDX document is addressed by an identifier that is
//! unique within the document. Cross-element links (relationships, pointers,
//! `hasFiles`, `snippetFromFile`) store these identifiers instead of the
//! elements themselves, so the in-memory graph never owns a cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of identifiers local to a document.
pub const ELEMENT_REF_PREFIX: &str = "SPDXRef-";
/// Prefix of external document identifiers.
pub const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";
/// Identifier of the document element itself.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

/// Identifier of an SPDX element.
///
/// Identifiers are opaque strings; their syntax is checked by the
/// validation pass rather than at construction so documents can be built
/// from any source and reported on in one go.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpdxId(String);

impl SpdxId {
    /// Create an identifier from any string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identifier of the document element
    #[must_use]
    pub fn document() -> Self {
        Self(DOCUMENT_SPDX_ID.to_string())
    }

    /// Relationship target meaning "no element"
    #[must_use]
    pub fn none() -> Self {
        Self("NONE".to_string())
    }

    /// Relationship target meaning "not asserted"
    #[must_use]
    pub fn no_assertion() -> Self {
        Self("NOASSERTION".to_string())
    }

    /// Get the raw identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a document-local `SPDXRef-` identifier
    #[must_use]
    pub fn is_element_ref(&self) -> bool {
        self.0.starts_with(ELEMENT_REF_PREFIX)
    }

    /// Whether this is a `DocumentRef-` identifier (with or without element part)
    #[must_use]
    pub fn is_external_ref(&self) -> bool {
        self.0.starts_with(DOCUMENT_REF_PREFIX)
    }

    /// Whether this is one of the `NONE` / `NOASSERTION` relationship targets
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.0 == "NONE" || self.0 == "NOASSERTION"
    }

    /// For `DocumentRef-x:SPDXRef-y`, returns `DocumentRef-x`.
    ///
    /// A bare `DocumentRef-x` returns itself.
    #[must_use]
    pub fn external_document_id(&self) -> Option<&str> {
        if !self.is_external_ref() {
            return None;
        }
        Some(self.0.split_once(':').map_or(self.0.as_str(), |(doc, _)| doc))
    }
}

impl fmt::Display for SpdxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpdxId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SpdxId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SpdxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
