//! Packages, files, snippets and the relationships between them.

use super::{Annotation, AnyLicenseInfo, Checksum, ExternalRef, SpdxId, StartEndPointer};
use crate::error::{ConstructionErrorKind, Result, SpdxError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an identifiable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Document,
    Package,
    File,
    Snippet,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Package => write!(f, "package"),
            Self::File => write!(f, "file"),
            Self::Snippet => write!(f, "snippet"),
        }
    }
}

/// Common surface of identifiable elements.
pub trait SpdxElement {
    /// Document-unique identifier; fixed at construction
    fn id(&self) -> &SpdxId;

    fn kind(&self) -> ElementKind;

    fn comment(&self) -> Option<&str>;

    fn annotations(&self) -> &[Annotation];

    /// Concluded license, if the element carries one
    fn license_concluded(&self) -> Option<&AnyLicenseInfo>;

    /// License information found in the element's content
    fn license_info(&self) -> &[AnyLicenseInfo];
}

macro_rules! impl_spdx_element {
    ($ty:ty, $kind:expr, $info:ident) => {
        impl SpdxElement for $ty {
            fn id(&self) -> &SpdxId {
                &self.id
            }

            fn kind(&self) -> ElementKind {
                $kind
            }

            fn comment(&self) -> Option<&str> {
                self.comment.as_deref()
            }

            fn annotations(&self) -> &[Annotation] {
                &self.annotations
            }

            fn license_concluded(&self) -> Option<&AnyLicenseInfo> {
                self.license_concluded.as_ref()
            }

            fn license_info(&self) -> &[AnyLicenseInfo] {
                &self.$info
            }
        }
    };
}

/// Package verification code (digest over the analyzed file set)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVerificationCode {
    pub value: String,
    /// File names excluded from the digest
    pub excluded_files: Vec<String>,
}

impl PackageVerificationCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            excluded_files: Vec::new(),
        }
    }

    #[must_use]
    pub fn excluding(mut self, file: impl Into<String>) -> Self {
        self.excluded_files.push(file.into());
        self
    }
}

/// Primary purpose of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum PackagePurpose {
    Application,
    Framework,
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    Source,
    Archive,
    File,
    Install,
    Other,
}

impl fmt::Display for PackagePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => write!(f, "APPLICATION"),
            Self::Framework => write!(f, "FRAMEWORK"),
            Self::Library => write!(f, "LIBRARY"),
            Self::Container => write!(f, "CONTAINER"),
            Self::OperatingSystem => write!(f, "OPERATING-SYSTEM"),
            Self::Device => write!(f, "DEVICE"),
            Self::Firmware => write!(f, "FIRMWARE"),
            Self::Source => write!(f, "SOURCE"),
            Self::Archive => write!(f, "ARCHIVE"),
            Self::File => write!(f, "FILE"),
            Self::Install => write!(f, "INSTALL"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// File type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    Source,
    Binary,
    Archive,
    Application,
    Audio,
    Image,
    Text,
    Video,
    Documentation,
    Spdx,
    Other,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "SOURCE"),
            Self::Binary => write!(f, "BINARY"),
            Self::Archive => write!(f, "ARCHIVE"),
            Self::Application => write!(f, "APPLICATION"),
            Self::Audio => write!(f, "AUDIO"),
            Self::Image => write!(f, "IMAGE"),
            Self::Text => write!(f, "TEXT"),
            Self::Video => write!(f, "VIDEO"),
            Self::Documentation => write!(f, "DOCUMENTATION"),
            Self::Spdx => write!(f, "SPDX"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// A software package
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxPackage {
    id: SpdxId,
    pub name: String,
    pub version_info: Option<String>,
    pub package_file_name: Option<String>,
    /// `Person: ...` / `Organization: ...` / `NOASSERTION`
    pub supplier: Option<String>,
    pub originator: Option<String>,
    /// Download URL, `NONE` or `NOASSERTION`
    pub download_location: String,
    files_analyzed: bool,
    verification_code: Option<PackageVerificationCode>,
    /// Checksums in insertion order; duplicates are kept
    pub checksums: Vec<Checksum>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub license_concluded: Option<AnyLicenseInfo>,
    pub license_info_from_files: Vec<AnyLicenseInfo>,
    pub license_declared: Option<AnyLicenseInfo>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub external_refs: Vec<ExternalRef>,
    pub attribution_texts: Vec<String>,
    /// Files contained in the package, by identifier
    pub has_files: Vec<SpdxId>,
    pub primary_package_purpose: Option<PackagePurpose>,
    pub release_date: Option<DateTime<Utc>>,
    pub built_date: Option<DateTime<Utc>>,
    pub valid_until_date: Option<DateTime<Utc>>,
    pub annotations: Vec<Annotation>,
}

impl SpdxPackage {
    /// Create a package. Files are considered analyzed until told otherwise.
    pub fn new(id: impl Into<SpdxId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version_info: None,
            package_file_name: None,
            supplier: None,
            originator: None,
            download_location: "NOASSERTION".to_string(),
            files_analyzed: true,
            verification_code: None,
            checksums: Vec::new(),
            homepage: None,
            source_info: None,
            license_concluded: None,
            license_info_from_files: Vec::new(),
            license_declared: None,
            license_comments: None,
            copyright_text: None,
            summary: None,
            description: None,
            comment: None,
            external_refs: Vec::new(),
            attribution_texts: Vec::new(),
            has_files: Vec::new(),
            primary_package_purpose: None,
            release_date: None,
            built_date: None,
            valid_until_date: None,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn files_analyzed(&self) -> bool {
        self.files_analyzed
    }

    /// Turn file analysis on or off.
    ///
    /// Turning it off while a verification code is set is rejected.
    pub fn set_files_analyzed(&mut self, analyzed: bool) -> Result<()> {
        if !analyzed && self.verification_code.is_some() {
            return Err(SpdxError::construction(
                format!("package {}", self.id),
                ConstructionErrorKind::VerificationCodeWithoutAnalysis,
            ));
        }
        self.files_analyzed = analyzed;
        Ok(())
    }

    #[must_use]
    pub const fn verification_code(&self) -> Option<&PackageVerificationCode> {
        self.verification_code.as_ref()
    }

    /// Set the verification code; only valid while files are analyzed
    pub fn set_verification_code(&mut self, code: PackageVerificationCode) -> Result<()> {
        if !self.files_analyzed {
            return Err(SpdxError::construction(
                format!("package {}", self.id),
                ConstructionErrorKind::VerificationCodeWithoutAnalysis,
            ));
        }
        self.verification_code = Some(code);
        Ok(())
    }

    pub fn clear_verification_code(&mut self) {
        self.verification_code = None;
    }

    pub fn add_checksum(&mut self, checksum: Checksum) {
        self.checksums.push(checksum);
    }

    pub fn add_license_info_from_file(&mut self, license: AnyLicenseInfo) {
        self.license_info_from_files.push(license);
    }

    pub fn add_external_ref(&mut self, external_ref: ExternalRef) {
        self.external_refs.push(external_ref);
    }

    /// Record that the package contains the file with the given identifier
    pub fn add_file_reference(&mut self, file: impl Into<SpdxId>) {
        self.has_files.push(file.into());
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

impl_spdx_element!(SpdxPackage, ElementKind::Package, license_info_from_files);

/// A file
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxFile {
    id: SpdxId,
    /// Relative path, conventionally starting with `./`
    pub file_name: String,
    pub file_types: Vec<FileType>,
    pub checksums: Vec<Checksum>,
    pub license_concluded: Option<AnyLicenseInfo>,
    pub license_info_in_file: Vec<AnyLicenseInfo>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub notice_text: Option<String>,
    pub contributors: Vec<String>,
    pub attribution_texts: Vec<String>,
    pub comment: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl SpdxFile {
    pub fn new(id: impl Into<SpdxId>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            file_types: Vec::new(),
            checksums: Vec::new(),
            license_concluded: None,
            license_info_in_file: Vec::new(),
            license_comments: None,
            copyright_text: None,
            notice_text: None,
            contributors: Vec::new(),
            attribution_texts: Vec::new(),
            comment: None,
            annotations: Vec::new(),
        }
    }

    pub fn add_file_type(&mut self, file_type: FileType) {
        self.file_types.push(file_type);
    }

    pub fn add_checksum(&mut self, checksum: Checksum) {
        self.checksums.push(checksum);
    }

    pub fn add_license_info(&mut self, license: AnyLicenseInfo) {
        self.license_info_in_file.push(license);
    }

    pub fn add_contributor(&mut self, contributor: impl Into<String>) {
        self.contributors.push(contributor.into());
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

impl_spdx_element!(SpdxFile, ElementKind::File, license_info_in_file);

/// A snippet of a file, located by one or more pointer ranges
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxSnippet {
    id: SpdxId,
    /// File the snippet was taken from
    pub snippet_from_file: SpdxId,
    pub ranges: Vec<StartEndPointer>,
    pub name: Option<String>,
    pub license_concluded: Option<AnyLicenseInfo>,
    pub license_info_in_snippet: Vec<AnyLicenseInfo>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub attribution_texts: Vec<String>,
    pub comment: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl SpdxSnippet {
    pub fn new(id: impl Into<SpdxId>, snippet_from_file: impl Into<SpdxId>) -> Self {
        Self {
            id: id.into(),
            snippet_from_file: snippet_from_file.into(),
            ranges: Vec::new(),
            name: None,
            license_concluded: None,
            license_info_in_snippet: Vec::new(),
            license_comments: None,
            copyright_text: None,
            attribution_texts: Vec::new(),
            comment: None,
            annotations: Vec::new(),
        }
    }

    pub fn add_range(&mut self, range: StartEndPointer) {
        self.ranges.push(range);
    }

    pub fn add_license_info(&mut self, license: AnyLicenseInfo) {
        self.license_info_in_snippet.push(license);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Complete byte-offset ranges
    pub fn byte_ranges(&self) -> impl Iterator<Item = &StartEndPointer> {
        self.ranges.iter().filter(|r| r.is_byte_range())
    }

    /// Complete line-number ranges
    pub fn line_ranges(&self) -> impl Iterator<Item = &StartEndPointer> {
        self.ranges.iter().filter(|r| r.is_line_range())
    }
}

impl_spdx_element!(SpdxSnippet, ElementKind::Snippet, license_info_in_snippet);

/// SPDX 2.3 relationship vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum RelationshipType {
    Describes,
    DescribedBy,
    Contains,
    ContainedBy,
    DependsOn,
    DependencyOf,
    DependencyManifestOf,
    BuildDependencyOf,
    DevDependencyOf,
    OptionalDependencyOf,
    ProvidedDependencyOf,
    TestDependencyOf,
    RuntimeDependencyOf,
    ExampleOf,
    Generates,
    GeneratedFrom,
    AncestorOf,
    DescendantOf,
    VariantOf,
    DistributionArtifact,
    PatchFor,
    PatchApplied,
    CopyOf,
    FileAdded,
    FileDeleted,
    FileModified,
    ExpandedFromArchive,
    DynamicLink,
    StaticLink,
    DataFileOf,
    TestCaseOf,
    BuildToolOf,
    DevToolOf,
    TestOf,
    TestToolOf,
    DocumentationOf,
    OptionalComponentOf,
    MetafileOf,
    PackageOf,
    Amends,
    PrerequisiteFor,
    HasPrerequisite,
    RequirementDescriptionFor,
    SpecificationFor,
    Other,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // serde_json renders unit variants as a quoted string
        let quoted = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(quoted.trim_matches('"'))
    }
}

/// Directed relationship between two elements, both named by identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub element: SpdxId,
    pub relationship_type: RelationshipType,
    /// Local element, `DocumentRef-...` reference, `NONE` or `NOASSERTION`
    pub related_element: SpdxId,
    pub comment: Option<String>,
}

impl Relationship {
    pub fn new(
        element: impl Into<SpdxId>,
        relationship_type: RelationshipType,
        related_element: impl Into<SpdxId>,
    ) -> Self {
        Self {
            element: element.into(),
            relationship_type,
            related_element: related_element.into(),
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.element, self.relationship_type, self.related_element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChecksumAlgorithm;

    #[test]
    fn test_verification_code_requires_analysis() {
        let mut pkg = SpdxPackage::new("SPDXRef-Package", "demo");
        pkg.set_files_analyzed(false).unwrap();

        let err = pkg
            .set_verification_code(PackageVerificationCode::new("d6a770ba38583ed4bb4525bd96e50461655d2758"))
            .unwrap_err();
        assert!(matches!(err, SpdxError::Construction { .. }));
        assert!(pkg.verification_code().is_none());
    }

    #[test]
    fn test_cannot_disable_analysis_with_code() {
        let mut pkg = SpdxPackage::new("SPDXRef-Package", "demo");
        pkg.set_verification_code(PackageVerificationCode::new("abc").excluding("./package.spdx"))
            .unwrap();

        assert!(pkg.set_files_analyzed(false).is_err());
        assert!(pkg.files_analyzed());

        pkg.clear_verification_code();
        assert!(pkg.set_files_analyzed(false).is_ok());
    }

    #[test]
    fn test_duplicate_checksums_are_kept() {
        let mut pkg = SpdxPackage::new("SPDXRef-Package", "demo");
        let checksum = Checksum::new(ChecksumAlgorithm::Sha1, "85ed0817af83a24ad8da68c2b5094de69833983c");
        pkg.add_checksum(checksum.clone());
        pkg.add_checksum(checksum);
        assert_eq!(pkg.checksums.len(), 2);
    }

    #[test]
    fn test_element_trait() {
        let mut file = SpdxFile::new("SPDXRef-File", "./src/lib.rs");
        file.comment = Some("generated".to_string());
        file.add_license_info(AnyLicenseInfo::license("MIT"));

        let element: &dyn SpdxElement = &file;
        assert_eq!(element.id().as_str(), "SPDXRef-File");
        assert_eq!(element.kind(), ElementKind::File);
        assert_eq!(element.comment(), Some("generated"));
        assert_eq!(element.license_info().len(), 1);
        assert!(element.license_concluded().is_none());
    }

    #[test]
    fn test_snippet_range_filters() {
        let mut snippet = SpdxSnippet::new("SPDXRef-Snippet", "SPDXRef-File");
        snippet.add_range(StartEndPointer::bytes("SPDXRef-File", 310, 420));
        snippet.add_range(StartEndPointer::lines("SPDXRef-File", 5, 23));
        snippet.add_range(StartEndPointer::new());

        assert_eq!(snippet.byte_ranges().count(), 1);
        assert_eq!(snippet.line_ranges().count(), 1);
    }

    #[test]
    fn test_relationship_type_display() {
        assert_eq!(RelationshipType::DependsOn.to_string(), "DEPENDS_ON");
        assert_eq!(RelationshipType::ExpandedFromArchive.to_string(), "EXPANDED_FROM_ARCHIVE");
        assert_eq!(
            Relationship::new("SPDXRef-DOCUMENT", RelationshipType::Describes, "SPDXRef-Package")
                .to_string(),
            "SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package"
        );
    }

    #[test]
    fn test_package_purpose_serde() {
        let json = serde_json::to_string(&PackagePurpose::OperatingSystem).unwrap();
        assert_eq!(json, "\"OPERATING-SYSTEM\"");
    }
}
