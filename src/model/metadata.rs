//! Value objects attached to documents, packages and files.

use super::SpdxId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render a timestamp the way SPDX expects it (`YYYY-MM-DDThh:mm:ssZ`).
#[must_use]
pub fn format_spdx_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Checksum algorithms accepted by SPDX 2.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA224")]
    Sha224,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA384")]
    Sha384,
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    #[serde(rename = "BLAKE2b-256")]
    Blake2b256,
    #[serde(rename = "BLAKE2b-384")]
    Blake2b384,
    #[serde(rename = "BLAKE2b-512")]
    Blake2b512,
    #[serde(rename = "BLAKE3")]
    Blake3,
    #[serde(rename = "MD2")]
    Md2,
    #[serde(rename = "MD4")]
    Md4,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "MD6")]
    Md6,
    #[serde(rename = "ADLER32")]
    Adler32,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha1 => "SHA1",
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
            Self::Blake2b256 => "BLAKE2b-256",
            Self::Blake2b384 => "BLAKE2b-384",
            Self::Blake2b512 => "BLAKE2b-512",
            Self::Blake3 => "BLAKE3",
            Self::Md2 => "MD2",
            Self::Md4 => "MD4",
            Self::Md5 => "MD5",
            Self::Md6 => "MD6",
            Self::Adler32 => "ADLER32",
        };
        f.write_str(name)
    }
}

/// Checksum of a package, file or external document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    /// Hash algorithm
    pub algorithm: ChecksumAlgorithm,
    /// Lowercase hex digest
    pub value: String,
}

impl Checksum {
    /// Create a new checksum
    pub fn new(algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.algorithm, self.value)
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorType {
    Person,
    Organization,
    Tool,
}

impl fmt::Display for CreatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "Person"),
            Self::Organization => write!(f, "Organization"),
            Self::Tool => write!(f, "Tool"),
        }
    }
}

/// Document creator or annotator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Creator {
    /// Creator type
    pub creator_type: CreatorType,
    /// Creator name, or tool name and version
    pub name: String,
    /// Optional email (persons and organizations only)
    pub email: Option<String>,
}

impl Creator {
    pub fn person(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Person,
            name: name.into(),
            email: None,
        }
    }

    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Organization,
            name: name.into(),
            email: None,
        }
    }

    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            creator_type: CreatorType::Tool,
            name: name.into(),
            email: None,
        }
    }

    /// Attach an email address
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Parse an SPDX creator string such as `"Person: Jane Doe (jane@example.com)"`.
    ///
    /// Returns `None` when the type prefix is missing or unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (kind, rest) = value.split_once(':')?;
        let creator_type = match kind.trim() {
            "Person" => CreatorType::Person,
            "Organization" => CreatorType::Organization,
            "Tool" => CreatorType::Tool,
            _ => return None,
        };
        let rest = rest.trim();

        let (name, email) = match (rest.rfind('('), rest.strip_suffix(')')) {
            (Some(open), Some(_)) if creator_type != CreatorType::Tool => {
                let email = rest[open + 1..rest.len() - 1].trim();
                let email = (!email.is_empty()).then(|| email.to_string());
                (rest[..open].trim().to_string(), email)
            }
            _ => (rest.to_string(), None),
        };

        Some(Self {
            creator_type,
            name,
            email,
        })
    }
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{}: {} ({})", self.creator_type, self.name, email),
            None => write!(f, "{}: {}", self.creator_type, self.name),
        }
    }
}

/// Document creation information
#[derive(Debug, Clone, PartialEq)]
pub struct CreationInfo {
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Creators in insertion order
    pub creators: Vec<Creator>,
    /// Version of the SPDX license list used
    pub license_list_version: Option<String>,
    /// Free-text comment
    pub comment: Option<String>,
}

impl CreationInfo {
    /// Creation info stamped with the current time
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Creation info with an explicit timestamp
    #[must_use]
    pub const fn at(created: DateTime<Utc>) -> Self {
        Self {
            created,
            creators: Vec::new(),
            license_list_version: None,
            comment: None,
        }
    }

    pub fn add_creator(&mut self, creator: Creator) {
        self.creators.push(creator);
    }
}

impl Default for CreationInfo {
    fn default() -> Self {
        Self::now()
    }
}

/// Annotation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationType {
    Review,
    Other,
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Review => write!(f, "REVIEW"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// Annotation on a document or element
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub annotator: Creator,
    pub date: DateTime<Utc>,
    pub annotation_type: AnnotationType,
    pub comment: String,
}

impl Annotation {
    pub fn new(
        annotator: Creator,
        date: DateTime<Utc>,
        annotation_type: AnnotationType,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            annotator,
            date,
            annotation_type,
            comment: comment.into(),
        }
    }
}

/// Category of a package external reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ReferenceCategory {
    Security,
    PackageManager,
    PersistentId,
    Other,
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Security => write!(f, "SECURITY"),
            Self::PackageManager => write!(f, "PACKAGE-MANAGER"),
            Self::PersistentId => write!(f, "PERSISTENT-ID"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// External reference of a package (purl, cpe, swh, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    pub category: ReferenceCategory,
    /// Reference type, e.g. `purl` or `cpe23Type`
    pub reference_type: String,
    pub locator: String,
    pub comment: Option<String>,
}

impl ExternalRef {
    pub fn new(
        category: ReferenceCategory,
        reference_type: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            category,
            reference_type: reference_type.into(),
            locator: locator.into(),
            comment: None,
        }
    }

    /// Shorthand for a `PACKAGE-MANAGER purl` reference
    pub fn purl(locator: impl Into<String>) -> Self {
        Self::new(ReferenceCategory::PackageManager, "purl", locator)
    }
}

/// Reference to another SPDX document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocumentRef {
    /// `DocumentRef-` identifier used by relationships in this document
    pub id: SpdxId,
    /// Namespace URI of the referenced document
    pub spdx_document: String,
    /// Checksum of the referenced document
    pub checksum: Checksum,
}

impl ExternalDocumentRef {
    pub fn new(id: impl Into<SpdxId>, spdx_document: impl Into<String>, checksum: Checksum) -> Self {
        Self {
            id: id.into(),
            spdx_document: spdx_document.into(),
            checksum,
        }
    }
}
