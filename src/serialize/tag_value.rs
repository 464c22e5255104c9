//! SPDX tag-value encoder.
//!
//! Renders an already-checked [`WireDocument`], so the identifiers written
//! here are exactly those of the JSON and YAML encodings.
//!
//! `documentDescribes` and `hasFiles` have no tag of their own and become
//! `DESCRIBES` / `CONTAINS` relationships, unless the document already
//! states the same relationship explicitly. Multi-line values are wrapped in
//! `<text>` blocks; a value containing `</text>` cannot be wrapped and is
//! rejected.

use super::wire::{
    WireAnnotation, WireChecksum, WireDocument, WireFile, WirePackage, WirePointer, WireRange,
    WireRelationship, WireSnippet,
};
use crate::error::{Result, SerializeErrorKind, SpdxError};
use crate::model::RelationshipType;
use std::fmt::Write as _;

const TEXT_CLOSE: &str = "</text>";

/// Render a wire document as SPDX tag-value text
pub fn render(doc: &WireDocument) -> Result<String> {
    let mut out = TagWriter::default();

    out.tag("SPDXVersion", &doc.spdx_version);
    out.tag("DataLicense", &doc.data_license);
    out.tag("SPDXID", &doc.spdx_id);
    out.tag("DocumentName", &doc.name);
    out.tag("DocumentNamespace", &doc.document_namespace);
    for ext in &doc.external_document_refs {
        out.tag(
            "ExternalDocumentRef",
            &format!("{} {} {}", ext.external_document_id, ext.spdx_document, checksum(&ext.checksum)),
        );
    }
    out.text_opt("DocumentComment", doc.comment.as_deref());

    out.section("Creation Information");
    for creator in &doc.creation_info.creators {
        out.tag("Creator", creator);
    }
    out.tag("Created", &doc.creation_info.created);
    out.opt("LicenseListVersion", doc.creation_info.license_list_version.as_deref());
    out.text_opt("CreatorComment", doc.creation_info.comment.as_deref());
    out.annotations(&doc.spdx_id, &doc.annotations);

    if !doc.document_describes.is_empty() {
        out.section("Document Describes");
        for described in &doc.document_describes {
            if !is_stated(&doc.relationships, &doc.spdx_id, RelationshipType::Describes, described) {
                out.relationship(&doc.spdx_id, RelationshipType::Describes, described, None);
            }
        }
    }

    for pkg in &doc.packages {
        out.package(pkg, &doc.relationships);
    }
    for file in &doc.files {
        out.file(file);
    }
    for snippet in &doc.snippets {
        out.snippet(snippet);
    }

    for info in &doc.has_extracted_licensing_infos {
        out.section("Other Licensing Information");
        out.tag("LicenseID", &info.license_id);
        out.text("ExtractedText", &info.extracted_text);
        out.opt("LicenseName", info.name.as_deref());
        for see_also in &info.see_alsos {
            out.tag("LicenseCrossReference", see_also);
        }
        out.text_opt("LicenseComment", info.comment.as_deref());
    }

    if !doc.relationships.is_empty() {
        out.section("Relationships");
        for rel in &doc.relationships {
            out.relationship(
                &rel.spdx_element_id,
                rel.relationship_type,
                &rel.related_spdx_element,
                rel.comment.as_deref(),
            );
        }
    }

    out.finish()
}

/// Whether `relationships` already contains `element relationship_type related`
fn is_stated(
    relationships: &[WireRelationship],
    element: &str,
    relationship_type: RelationshipType,
    related: &str,
) -> bool {
    relationships.iter().any(|rel| {
        rel.relationship_type == relationship_type
            && rel.spdx_element_id == element
            && rel.related_spdx_element == related
    })
}

fn checksum(checksum: &WireChecksum) -> String {
    format!("{}: {}", checksum.algorithm, checksum.checksum_value)
}

/// Range value and whether it is a byte range. A mixed range keeps the
/// kind of its start pointer.
fn range(range: &WireRange) -> (String, bool) {
    let value = |p: &WirePointer| p.offset.or(p.line_number).unwrap_or_default();
    let (start, end) = (&range.start_pointer, &range.end_pointer);
    (format!("{}:{}", value(start), value(end)), start.offset.is_some())
}

#[derive(Default)]
struct TagWriter {
    buf: String,
    /// First tag whose value could not be wrapped
    unencodable: Option<String>,
}

impl TagWriter {
    fn finish(self) -> Result<String> {
        match self.unencodable {
            Some(field) => Err(SpdxError::serialize(
                "encoding tag-value",
                SerializeErrorKind::UnencodableText { field },
            )),
            None => Ok(self.buf),
        }
    }

    fn section(&mut self, title: &str) {
        let _ = write!(self.buf, "\n## {title}\n\n");
    }

    fn tag(&mut self, tag: &str, value: &str) {
        if value.contains('\n') {
            self.text(tag, value);
        } else {
            let _ = writeln!(self.buf, "{tag}: {value}");
        }
    }

    fn opt(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.tag(tag, value);
        }
    }

    fn text(&mut self, tag: &str, value: &str) {
        if value.contains(TEXT_CLOSE) && self.unencodable.is_none() {
            self.unencodable = Some(tag.to_string());
        }
        let _ = writeln!(self.buf, "{tag}: <text>{value}{TEXT_CLOSE}");
    }

    fn text_opt(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.text(tag, value);
        }
    }

    fn relationship(
        &mut self,
        element: &str,
        relationship_type: RelationshipType,
        related: &str,
        comment: Option<&str>,
    ) {
        self.tag("Relationship", &format!("{element} {relationship_type} {related}"));
        self.text_opt("RelationshipComment", comment);
    }

    fn annotations(&mut self, element: &str, annotations: &[WireAnnotation]) {
        for annotation in annotations {
            self.tag("Annotator", &annotation.annotator);
            self.tag("AnnotationDate", &annotation.annotation_date);
            self.tag("AnnotationType", &annotation.annotation_type.to_string());
            self.tag("SPDXREF", element);
            self.text("AnnotationComment", &annotation.comment);
        }
    }

    fn package(&mut self, pkg: &WirePackage, relationships: &[WireRelationship]) {
        self.section("Package Information");
        self.tag("PackageName", &pkg.name);
        self.tag("SPDXID", &pkg.spdx_id);
        self.opt("PackageVersion", pkg.version_info.as_deref());
        self.opt("PackageFileName", pkg.package_file_name.as_deref());
        self.opt("PackageSupplier", pkg.supplier.as_deref());
        self.opt("PackageOriginator", pkg.originator.as_deref());
        self.tag("PackageDownloadLocation", &pkg.download_location);
        self.tag("FilesAnalyzed", if pkg.files_analyzed { "true" } else { "false" });
        if let Some(code) = &pkg.package_verification_code {
            let excluded = &code.package_verification_code_excluded_files;
            if excluded.is_empty() {
                self.tag("PackageVerificationCode", &code.package_verification_code_value);
            } else {
                self.tag(
                    "PackageVerificationCode",
                    &format!(
                        "{} (excludes: {})",
                        code.package_verification_code_value,
                        excluded.join(", ")
                    ),
                );
            }
        }
        for sum in &pkg.checksums {
            self.tag("PackageChecksum", &checksum(sum));
        }
        self.opt("PackageHomePage", pkg.homepage.as_deref());
        self.text_opt("PackageSourceInfo", pkg.source_info.as_deref());
        if let Some(purpose) = pkg.primary_package_purpose {
            self.tag("PrimaryPackagePurpose", &purpose.to_string());
        }
        self.opt("ReleaseDate", pkg.release_date.as_deref());
        self.opt("BuiltDate", pkg.built_date.as_deref());
        self.opt("ValidUntilDate", pkg.valid_until_date.as_deref());
        self.opt("PackageLicenseConcluded", pkg.license_concluded.as_deref());
        for info in &pkg.license_info_from_files {
            self.tag("PackageLicenseInfoFromFiles", info);
        }
        self.opt("PackageLicenseDeclared", pkg.license_declared.as_deref());
        self.text_opt("PackageLicenseComments", pkg.license_comments.as_deref());
        self.text_opt("PackageCopyrightText", pkg.copyright_text.as_deref());
        self.text_opt("PackageSummary", pkg.summary.as_deref());
        self.text_opt("PackageDescription", pkg.description.as_deref());
        self.text_opt("PackageComment", pkg.comment.as_deref());
        for ext in &pkg.external_refs {
            self.tag(
                "ExternalRef",
                &format!("{} {} {}", ext.reference_category, ext.reference_type, ext.reference_locator),
            );
            self.text_opt("ExternalRefComment", ext.comment.as_deref());
        }
        for text in &pkg.attribution_texts {
            self.text("PackageAttributionText", text);
        }
        for file in &pkg.has_files {
            if !is_stated(relationships, &pkg.spdx_id, RelationshipType::Contains, file) {
                self.relationship(&pkg.spdx_id, RelationshipType::Contains, file, None);
            }
        }
        self.annotations(&pkg.spdx_id, &pkg.annotations);
    }

    fn file(&mut self, file: &WireFile) {
        self.section("File Information");
        self.tag("FileName", &file.file_name);
        self.tag("SPDXID", &file.spdx_id);
        for file_type in &file.file_types {
            self.tag("FileType", &file_type.to_string());
        }
        for sum in &file.checksums {
            self.tag("FileChecksum", &checksum(sum));
        }
        self.opt("LicenseConcluded", file.license_concluded.as_deref());
        for info in &file.license_info_in_files {
            self.tag("LicenseInfoInFile", info);
        }
        self.text_opt("LicenseComments", file.license_comments.as_deref());
        self.text_opt("FileCopyrightText", file.copyright_text.as_deref());
        self.text_opt("FileNotice", file.notice_text.as_deref());
        for contributor in &file.file_contributors {
            self.tag("FileContributor", contributor);
        }
        for text in &file.attribution_texts {
            self.text("FileAttributionText", text);
        }
        self.text_opt("FileComment", file.comment.as_deref());
        self.annotations(&file.spdx_id, &file.annotations);
    }

    fn snippet(&mut self, snippet: &WireSnippet) {
        self.section("Snippet Information");
        self.tag("SnippetSPDXID", &snippet.spdx_id);
        self.tag("SnippetFromFileSPDXID", &snippet.snippet_from_file);
        for r in &snippet.ranges {
            let (value, is_bytes) = range(r);
            let tag = if is_bytes { "SnippetByteRange" } else { "SnippetLineRange" };
            self.tag(tag, &value);
        }
        self.opt("SnippetLicenseConcluded", snippet.license_concluded.as_deref());
        for info in &snippet.license_info_in_snippets {
            self.tag("LicenseInfoInSnippet", info);
        }
        self.text_opt("SnippetLicenseComments", snippet.license_comments.as_deref());
        self.text_opt("SnippetCopyrightText", snippet.copyright_text.as_deref());
        self.text_opt("SnippetComment", snippet.comment.as_deref());
        self.opt("SnippetName", snippet.name.as_deref());
        for text in &snippet.attribution_texts {
            self.text("SnippetAttributionText", text);
        }
        self.annotations(&snippet.spdx_id, &snippet.annotations);
    }
}
