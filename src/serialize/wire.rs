//! SPDX 2.3 JSON wire structures and the conversion into them.
//!
//! The wire form is a plain tree: every element appears exactly once, in
//! its document-level array, and every cross-reference is a bare
//! identifier string. Optional fields and empty sequences are omitted.

use crate::error::{ErrorContext, Result, SerializeErrorKind, SpdxError};
use crate::model::{
    format_spdx_date, AnnotationType, AnyLicenseInfo, Checksum, ChecksumAlgorithm, FileType,
    PackagePurpose, ReferenceCategory, RelationshipType, SinglePointer, SpdxDocument, SpdxElement,
    SpdxFile, SpdxId, SpdxPackage, SpdxSnippet, StartEndPointer,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub spdx_version: String,
    pub creation_info: WireCreationInfo,
    pub name: String,
    pub data_license: String,
    pub document_namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_document_refs: Vec<WireExternalDocumentRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub has_extracted_licensing_infos: Vec<WireExtractedLicensingInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<WireAnnotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_describes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<WirePackage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<WireFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<WireSnippet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<WireRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCreationInfo {
    pub created: String,
    pub creators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_list_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChecksum {
    pub algorithm: ChecksumAlgorithm,
    pub checksum_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireExternalDocumentRef {
    pub external_document_id: String,
    pub spdx_document: String,
    pub checksum: WireChecksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireExtractedLicensingInfo {
    pub license_id: String,
    pub extracted_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see_alsos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnnotation {
    pub annotator: String,
    pub annotation_date: String,
    pub annotation_type: AnnotationType,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVerificationCode {
    pub package_verification_code_value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_verification_code_excluded_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireExternalRef {
    pub reference_category: ReferenceCategory,
    pub reference_type: String,
    pub reference_locator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePackage {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator: Option<String>,
    pub download_location: String,
    pub files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_verification_code: Option<WireVerificationCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<WireChecksum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub license_info_from_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<WireExternalRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribution_texts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub has_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_package_purpose: Option<PackagePurpose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFile {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<FileType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<WireChecksum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub license_info_in_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_contributors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribution_texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSnippet {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub snippet_from_file: String,
    pub ranges: Vec<WireRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub license_info_in_snippets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribution_texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<WireAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRange {
    pub start_pointer: WirePointer,
    pub end_pointer: WirePointer,
}

/// Exactly one of `offset` / `line_number` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePointer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<i64>,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRelationship {
    pub spdx_element_id: String,
    pub relationship_type: RelationshipType,
    pub related_spdx_element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts a document into its wire tree, checking every reference
/// against the document's element arena.
pub(super) struct WireEncoder<'d> {
    doc: &'d SpdxDocument,
}

impl<'d> WireEncoder<'d> {
    pub(super) const fn new(doc: &'d SpdxDocument) -> Self {
        Self { doc }
    }

    /// Build the wire tree; `license_list_version` fills the creation info
    /// when the document leaves it unset.
    pub(super) fn encode(&self, license_list_version: Option<String>) -> Result<WireDocument> {
        let doc = self.doc;
        let id = doc.id();

        let creation_info = WireCreationInfo {
            created: format_spdx_date(&doc.creation_info.created),
            creators: doc.creation_info.creators.iter().map(ToString::to_string).collect(),
            license_list_version: doc
                .creation_info
                .license_list_version
                .clone()
                .or(license_list_version),
            comment: doc.creation_info.comment.clone(),
        };

        let relationships = doc
            .relationships()
            .iter()
            .map(|rel| {
                let element = self.resolve_relationship_end(&rel.element, "spdxElementId")?;
                let related = self.resolve_relationship_end(&rel.related_element, "relatedSpdxElement")?;
                Ok(WireRelationship {
                    spdx_element_id: element,
                    relationship_type: rel.relationship_type,
                    related_spdx_element: related,
                    comment: rel.comment.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WireDocument {
            spdx_id: id.to_string(),
            spdx_version: doc.spdx_version.clone(),
            creation_info,
            name: doc.name.clone(),
            data_license: license_expression(&doc.data_license, id, "dataLicense")?,
            document_namespace: doc.document_namespace.clone(),
            comment: doc.comment.clone(),
            external_document_refs: doc
                .external_document_refs()
                .iter()
                .map(|ext| WireExternalDocumentRef {
                    external_document_id: ext.id.to_string(),
                    spdx_document: ext.spdx_document.clone(),
                    checksum: wire_checksum(&ext.checksum),
                })
                .collect(),
            has_extracted_licensing_infos: doc
                .extracted_licensing_infos()
                .iter()
                .map(|info| WireExtractedLicensingInfo {
                    license_id: info.license_id.clone(),
                    extracted_text: info.extracted_text.clone(),
                    name: info.name.clone(),
                    comment: info.comment.clone(),
                    see_alsos: info.see_alsos.clone(),
                })
                .collect(),
            annotations: wire_annotations(doc.annotations()),
            document_describes: doc.document_describes().map(ToString::to_string).collect(),
            packages: doc.packages().map(|p| self.package(p)).collect::<Result<_>>()?,
            files: doc.files().map(|f| self.file(f)).collect::<Result<_>>()?,
            snippets: doc.snippets().map(|s| self.snippet(s)).collect::<Result<_>>()?,
            relationships,
        })
    }

    fn package(&self, pkg: &SpdxPackage) -> Result<WirePackage> {
        let id = pkg.id();
        let has_files = pkg
            .has_files
            .iter()
            .map(|file| self.resolve_local(id, file, "hasFiles"))
            .collect::<Result<Vec<_>>>()?;

        Ok(WirePackage {
            spdx_id: id.to_string(),
            name: pkg.name.clone(),
            version_info: pkg.version_info.clone(),
            package_file_name: pkg.package_file_name.clone(),
            supplier: pkg.supplier.clone(),
            originator: pkg.originator.clone(),
            download_location: pkg.download_location.clone(),
            files_analyzed: pkg.files_analyzed(),
            package_verification_code: pkg.verification_code().map(|code| WireVerificationCode {
                package_verification_code_value: code.value.clone(),
                package_verification_code_excluded_files: code.excluded_files.clone(),
            }),
            checksums: wire_checksums(&pkg.checksums),
            homepage: pkg.homepage.clone(),
            source_info: pkg.source_info.clone(),
            license_concluded: optional_expression(pkg.license_concluded.as_ref(), id, "licenseConcluded")?,
            license_info_from_files: expressions(&pkg.license_info_from_files, id, "licenseInfoFromFiles")?,
            license_declared: optional_expression(pkg.license_declared.as_ref(), id, "licenseDeclared")?,
            license_comments: pkg.license_comments.clone(),
            copyright_text: pkg.copyright_text.clone(),
            summary: pkg.summary.clone(),
            description: pkg.description.clone(),
            comment: pkg.comment.clone(),
            external_refs: pkg
                .external_refs
                .iter()
                .map(|r| WireExternalRef {
                    reference_category: r.category,
                    reference_type: r.reference_type.clone(),
                    reference_locator: r.locator.clone(),
                    comment: r.comment.clone(),
                })
                .collect(),
            attribution_texts: pkg.attribution_texts.clone(),
            has_files,
            primary_package_purpose: pkg.primary_package_purpose,
            release_date: optional_date(pkg.release_date.as_ref()),
            built_date: optional_date(pkg.built_date.as_ref()),
            valid_until_date: optional_date(pkg.valid_until_date.as_ref()),
            annotations: wire_annotations(&pkg.annotations),
        })
    }

    fn file(&self, file: &SpdxFile) -> Result<WireFile> {
        let id = file.id();
        Ok(WireFile {
            spdx_id: id.to_string(),
            file_name: file.file_name.clone(),
            file_types: file.file_types.clone(),
            checksums: wire_checksums(&file.checksums),
            license_concluded: optional_expression(file.license_concluded.as_ref(), id, "licenseConcluded")?,
            license_info_in_files: expressions(&file.license_info_in_file, id, "licenseInfoInFiles")?,
            license_comments: file.license_comments.clone(),
            copyright_text: file.copyright_text.clone(),
            notice_text: file.notice_text.clone(),
            file_contributors: file.contributors.clone(),
            attribution_texts: file.attribution_texts.clone(),
            comment: file.comment.clone(),
            annotations: wire_annotations(&file.annotations),
        })
    }

    fn snippet(&self, snippet: &SpdxSnippet) -> Result<WireSnippet> {
        let id = snippet.id();
        let ranges = snippet
            .ranges
            .iter()
            .enumerate()
            .map(|(i, range)| self.range(id, range, &format!("ranges[{i}]")))
            .collect::<Result<Vec<_>>>()?;

        Ok(WireSnippet {
            spdx_id: id.to_string(),
            snippet_from_file: self.resolve_local(id, &snippet.snippet_from_file, "snippetFromFile")?,
            ranges,
            name: snippet.name.clone(),
            license_concluded: optional_expression(snippet.license_concluded.as_ref(), id, "licenseConcluded")?,
            license_info_in_snippets: expressions(&snippet.license_info_in_snippet, id, "licenseInfoInSnippets")?,
            license_comments: snippet.license_comments.clone(),
            copyright_text: snippet.copyright_text.clone(),
            attribution_texts: snippet.attribution_texts.clone(),
            comment: snippet.comment.clone(),
            annotations: wire_annotations(&snippet.annotations),
        })
    }

    fn range(&self, owner: &SpdxId, range: &StartEndPointer, field: &str) -> Result<WireRange> {
        let missing = |side: &'static str| {
            SpdxError::serialize(
                format!("element {owner}"),
                SerializeErrorKind::UnsetRangeEnd {
                    field: field.to_string(),
                    side,
                },
            )
        };
        let start = range.start.as_ref().ok_or_else(|| missing("start"))?;
        let end = range.end.as_ref().ok_or_else(|| missing("end"))?;

        Ok(WireRange {
            start_pointer: self.pointer(owner, start, &format!("{field}.startPointer"))?,
            end_pointer: self.pointer(owner, end, &format!("{field}.endPointer"))?,
        })
    }

    fn pointer(&self, owner: &SpdxId, pointer: &SinglePointer, field: &str) -> Result<WirePointer> {
        let reference = pointer.reference().ok_or_else(|| {
            SpdxError::serialize(
                format!("element {owner}"),
                SerializeErrorKind::UnsetPointerReference {
                    field: field.to_string(),
                },
            )
        })?;
        let reference = self.resolve_local(owner, reference, &format!("{field}.reference"))?;

        Ok(match pointer {
            SinglePointer::ByteOffset(p) => WirePointer {
                offset: Some(p.offset),
                line_number: None,
                reference,
            },
            SinglePointer::LineChar(p) => WirePointer {
                offset: None,
                line_number: Some(p.line_number),
                reference,
            },
        })
    }

    /// References that must name an element of this document
    fn resolve_local(&self, owner: &SpdxId, target: &SpdxId, field: &str) -> Result<String> {
        if self.doc.contains_element(target) {
            Ok(target.to_string())
        } else {
            Err(SpdxError::unresolved(owner.as_str(), field, target.as_str()))
        }
    }

    /// Relationship ends may also name external documents or the sentinels
    fn resolve_relationship_end(&self, target: &SpdxId, field: &str) -> Result<String> {
        if self.doc.resolves(target) {
            Ok(target.to_string())
        } else {
            Err(SpdxError::unresolved("relationship", field, target.as_str()))
        }
    }
}

fn license_expression(license: &AnyLicenseInfo, owner: &SpdxId, field: &str) -> Result<String> {
    license
        .to_expression()
        .with_context(|| format!("element {owner} field '{field}'"))
}

fn optional_expression(
    license: Option<&AnyLicenseInfo>,
    owner: &SpdxId,
    field: &str,
) -> Result<Option<String>> {
    license
        .map(|lic| license_expression(lic, owner, field))
        .transpose()
}

fn expressions(licenses: &[AnyLicenseInfo], owner: &SpdxId, field: &str) -> Result<Vec<String>> {
    licenses
        .iter()
        .map(|lic| license_expression(lic, owner, field))
        .collect()
}

fn wire_checksum(checksum: &Checksum) -> WireChecksum {
    WireChecksum {
        algorithm: checksum.algorithm,
        checksum_value: checksum.value.clone(),
    }
}

fn wire_checksums(checksums: &[Checksum]) -> Vec<WireChecksum> {
    checksums.iter().map(wire_checksum).collect()
}

fn wire_annotations(annotations: &[crate::model::Annotation]) -> Vec<WireAnnotation> {
    annotations
        .iter()
        .map(|a| WireAnnotation {
            annotator: a.annotator.to_string(),
            annotation_date: format_spdx_date(&a.date),
            annotation_type: a.annotation_type,
            comment: a.comment.clone(),
        })
        .collect()
}

fn optional_date(date: Option<&DateTime<Utc>>) -> Option<String> {
    date.map(format_spdx_date)
}
