//! Explicit validation pass over a finished document.
//!
//! Documents are built incrementally and only need to be consistent when
//! they are written out. [`DocumentValidator`] checks the invariants the
//! serializer does not: identifier syntax, `documentDescribes` targets,
//! snippet range coverage, verification codes and license identifiers.

use super::{AnyLicenseInfo, SpdxDocument, SpdxElement, SpdxId, SpdxSnippet, LICENSE_REF_PREFIX};
use crate::error::{Result, SpdxError};
use crate::registry::LicenseRegistry;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

fn element_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(DocumentRef-[A-Za-z0-9.\-]+:)?SPDXRef-[A-Za-z0-9.\-]+$")
            .expect("element id pattern is valid")
    })
}

fn document_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^DocumentRef-[A-Za-z0-9.\-]+$").expect("document ref pattern is valid")
    })
}

fn license_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(DocumentRef-[A-Za-z0-9.\-]+:)?LicenseRef-[A-Za-z0-9.\-]+$")
            .expect("license ref pattern is valid")
    })
}

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IssueSeverity {
    /// The document cannot be written as-is
    Error,
    /// Metadata quality problem; the document is still writable
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding of the validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    /// Element the issue was found on
    pub element: Option<SpdxId>,
    /// Wire field name, e.g. `documentDescribes`
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(id) => write!(f, "[{}] {}.{}: {}", self.severity, id, self.field, self.message),
            None => write!(f, "[{}] {}: {}", self.severity, self.field, self.message),
        }
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Error)
    }

    /// Turn errors into a single [`SpdxError::Validation`]; warnings pass
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            return Ok(self);
        }
        let messages: Vec<String> = self.errors().map(ToString::to_string).collect();
        Err(SpdxError::validation(messages.join("; ")))
    }

    fn push(
        &mut self,
        severity: IssueSeverity,
        element: Option<&SpdxId>,
        field: &str,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            element: element.cloned(),
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn error(&mut self, element: Option<&SpdxId>, field: &str, message: impl Into<String>) {
        self.push(IssueSeverity::Error, element, field, message);
    }

    fn warning(&mut self, element: Option<&SpdxId>, field: &str, message: impl Into<String>) {
        self.push(IssueSeverity::Warning, element, field, message);
    }
}

/// Validates documents before serialization.
#[derive(Default)]
pub struct DocumentValidator<'r> {
    registry: Option<&'r dyn LicenseRegistry>,
}

impl<'r> DocumentValidator<'r> {
    #[must_use]
    pub fn new() -> Self {
        Self { registry: None }
    }

    /// Report license and exception identifiers the registry does not know
    #[must_use]
    pub fn with_registry(mut self, registry: &'r dyn LicenseRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Run every check and collect the findings
    #[must_use]
    pub fn validate(&self, doc: &SpdxDocument) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_document(doc, &mut report);
        self.check_identifiers(doc, &mut report);
        self.check_references(doc, &mut report);
        for snippet in doc.snippets() {
            self.check_snippet(doc, snippet, &mut report);
        }
        for pkg in doc.packages() {
            if pkg.verification_code().is_some() && !pkg.files_analyzed() {
                report.error(
                    Some(pkg.id()),
                    "packageVerificationCode",
                    "verification code is only meaningful when filesAnalyzed is true",
                );
            }
        }
        self.check_licenses(doc, &mut report);

        tracing::debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated document {}",
            doc.name
        );
        report
    }

    fn check_document(&self, doc: &SpdxDocument, report: &mut ValidationReport) {
        let id = Some(doc.id());
        if doc.name.trim().is_empty() {
            report.error(id, "name", "document name is empty");
        }
        if doc.document_namespace.trim().is_empty() {
            report.error(id, "documentNamespace", "document namespace is empty");
        } else if doc.document_namespace.contains('#') {
            report.error(id, "documentNamespace", "document namespace must not contain '#'");
        }
        if doc.creation_info.creators.is_empty() {
            report.error(id, "creationInfo.creators", "at least one creator is required");
        }
        if doc.creation_info.license_list_version.is_none() {
            report.warning(id, "creationInfo.licenseListVersion", "license list version is not set");
        }
    }

    fn check_identifiers(&self, doc: &SpdxDocument, report: &mut ValidationReport) {
        let element_ids = std::iter::once(doc.id())
            .chain(doc.packages().map(SpdxElement::id))
            .chain(doc.files().map(SpdxElement::id))
            .chain(doc.snippets().map(SpdxElement::id));
        for id in element_ids {
            if !element_id_pattern().is_match(id.as_str()) {
                report.error(Some(id), "SPDXID", format!("'{id}' is not a valid SPDX identifier"));
            }
        }

        for ext in doc.external_document_refs() {
            if !document_ref_pattern().is_match(ext.id.as_str()) {
                report.error(
                    Some(&ext.id),
                    "externalDocumentId",
                    format!("'{}' is not a valid DocumentRef identifier", ext.id),
                );
            }
        }

        for info in doc.extracted_licensing_infos() {
            if !license_ref_pattern().is_match(&info.license_id) {
                report.error(
                    None,
                    "hasExtractedLicensingInfos",
                    format!("'{}' is not a valid LicenseRef identifier", info.license_id),
                );
            }
        }
    }

    fn check_references(&self, doc: &SpdxDocument, report: &mut ValidationReport) {
        for described in doc.document_describes() {
            if !doc.contains_element(described) {
                report.error(
                    Some(doc.id()),
                    "documentDescribes",
                    format!("{described} is not an element of this document"),
                );
            }
        }

        for rel in doc.relationships() {
            for (field, target) in [
                ("spdxElementId", &rel.element),
                ("relatedSpdxElement", &rel.related_element),
            ] {
                if !doc.resolves(target) {
                    report.error(
                        Some(&rel.element),
                        field,
                        format!("{target} does not resolve ({rel})"),
                    );
                }
            }
        }

        for pkg in doc.packages() {
            for file in &pkg.has_files {
                if doc.file(file).is_none() {
                    report.error(Some(pkg.id()), "hasFiles", format!("{file} is not a file of this document"));
                }
            }
        }
    }

    fn check_snippet(&self, doc: &SpdxDocument, snippet: &SpdxSnippet, report: &mut ValidationReport) {
        let id = Some(snippet.id());
        if doc.file(&snippet.snippet_from_file).is_none() {
            report.error(
                id,
                "snippetFromFile",
                format!("{} is not a file of this document", snippet.snippet_from_file),
            );
        }
        if snippet.byte_ranges().next().is_none() {
            report.error(id, "ranges", "snippet needs at least one byte range");
        }
        if snippet.line_ranges().next().is_none() {
            report.error(id, "ranges", "snippet needs at least one line range");
        }

        for (i, range) in snippet.ranges.iter().enumerate() {
            if !range.is_complete() {
                report.error(id, "ranges", format!("range {i} is incomplete ({range})"));
                continue;
            }
            let pointers = range.start.iter().chain(range.end.iter());
            for pointer in pointers {
                match pointer.reference() {
                    None => report.error(id, "ranges", format!("range {i} has a pointer without reference")),
                    Some(reference) if *reference != snippet.snippet_from_file => report.error(
                        id,
                        "ranges",
                        format!(
                            "range {i} points into {reference}, not {}",
                            snippet.snippet_from_file
                        ),
                    ),
                    Some(_) => {}
                }
            }
        }
    }

    fn check_licenses(&self, doc: &SpdxDocument, report: &mut ValidationReport) {
        for (id, license) in doc.license_trees() {
            self.check_license_tree(doc, id, license, report);
        }
    }

    fn check_license_tree(
        &self,
        doc: &SpdxDocument,
        element: &SpdxId,
        license: &AnyLicenseInfo,
        report: &mut ValidationReport,
    ) {
        for license_id in license.license_ids() {
            if license_id.starts_with(LICENSE_REF_PREFIX) {
                if doc.extracted_licensing_info(license_id).is_none() {
                    report.warning(
                        Some(element),
                        "hasExtractedLicensingInfos",
                        format!("{license_id} has no extracted licensing info"),
                    );
                }
            } else if let Some(registry) = self.registry {
                if !registry.is_known_license_id(license_id) {
                    report.warning(
                        Some(element),
                        "license",
                        format!("{license_id} is not on the SPDX license list"),
                    );
                }
            }
        }

        if let Some(registry) = self.registry {
            for exception in license.exception_ids() {
                if !registry.is_known_exception_id(exception) {
                    report.warning(
                        Some(element),
                        "license",
                        format!("{exception} is not a listed license exception"),
                    );
                }
            }
        }
    }
}
