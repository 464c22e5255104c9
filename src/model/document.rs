//! The SPDX document: an arena owning every element by identifier.
//!
//! Elements never hold each other. A snippet names its file, a relationship
//! names both ends and a package names its files, all by [`SpdxId`]. The
//! serializer resolves those identifiers against this arena.

use super::{
    Annotation, AnyLicenseInfo, CreationInfo, ElementKind, ExternalDocumentRef,
    ExtractedLicensingInfo, Relationship, SpdxElement, SpdxFile, SpdxId, SpdxPackage, SpdxSnippet,
};
use crate::error::{ConstructionErrorKind, Result, SpdxError};
use indexmap::{IndexMap, IndexSet};

/// Default SPDX specification version written by this crate.
pub const SPDX_VERSION: &str = "SPDX-2.3";
/// License of the SPDX document data itself.
pub const DATA_LICENSE: &str = "CC0-1.0";

/// Borrowed view of any element in a document
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Document(&'a SpdxDocument),
    Package(&'a SpdxPackage),
    File(&'a SpdxFile),
    Snippet(&'a SpdxSnippet),
}

impl ElementRef<'_> {
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Document(_) => ElementKind::Document,
            Self::Package(_) => ElementKind::Package,
            Self::File(_) => ElementKind::File,
            Self::Snippet(_) => ElementKind::Snippet,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SpdxId {
        match self {
            Self::Document(doc) => &doc.id,
            Self::Package(pkg) => pkg.id(),
            Self::File(file) => file.id(),
            Self::Snippet(snippet) => snippet.id(),
        }
    }
}

/// Root aggregate of an SPDX document.
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxDocument {
    id: SpdxId,
    pub spdx_version: String,
    pub data_license: AnyLicenseInfo,
    pub name: String,
    /// Unique URI of this document
    pub document_namespace: String,
    pub creation_info: CreationInfo,
    pub comment: Option<String>,
    packages: IndexMap<SpdxId, SpdxPackage>,
    files: IndexMap<SpdxId, SpdxFile>,
    snippets: IndexMap<SpdxId, SpdxSnippet>,
    relationships: Vec<Relationship>,
    annotations: Vec<Annotation>,
    external_document_refs: Vec<ExternalDocumentRef>,
    document_describes: IndexSet<SpdxId>,
    extracted_licensing_infos: Vec<ExtractedLicensingInfo>,
}

impl SpdxDocument {
    /// Create an empty SPDX-2.3 document with `SPDXRef-DOCUMENT` as identifier
    pub fn new(
        name: impl Into<String>,
        document_namespace: impl Into<String>,
        creation_info: CreationInfo,
    ) -> Self {
        Self::with_id(SpdxId::document(), name, document_namespace, creation_info)
    }

    /// Create an empty document with a custom identifier
    pub fn with_id(
        id: impl Into<SpdxId>,
        name: impl Into<String>,
        document_namespace: impl Into<String>,
        creation_info: CreationInfo,
    ) -> Self {
        Self {
            id: id.into(),
            spdx_version: SPDX_VERSION.to_string(),
            data_license: AnyLicenseInfo::license(DATA_LICENSE),
            name: name.into(),
            document_namespace: document_namespace.into(),
            creation_info,
            comment: None,
            packages: IndexMap::new(),
            files: IndexMap::new(),
            snippets: IndexMap::new(),
            relationships: Vec::new(),
            annotations: Vec::new(),
            external_document_refs: Vec::new(),
            document_describes: IndexSet::new(),
            extracted_licensing_infos: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &SpdxId {
        &self.id
    }

    // ------------------------------------------------------------------
    // Element arena
    // ------------------------------------------------------------------

    fn ensure_unused(&self, id: &SpdxId) -> Result<()> {
        if self.contains_element(id) {
            return Err(SpdxError::construction(
                format!("adding element to document {}", self.name),
                ConstructionErrorKind::DuplicateIdentifier(id.to_string()),
            ));
        }
        Ok(())
    }

    /// Add a package; fails if its identifier is already taken
    pub fn add_package(&mut self, package: SpdxPackage) -> Result<&mut SpdxPackage> {
        self.ensure_unused(package.id())?;
        let id = package.id().clone();
        Ok(self.packages.entry(id).or_insert(package))
    }

    /// Add a file; fails if its identifier is already taken
    pub fn add_file(&mut self, file: SpdxFile) -> Result<&mut SpdxFile> {
        self.ensure_unused(file.id())?;
        let id = file.id().clone();
        Ok(self.files.entry(id).or_insert(file))
    }

    /// Add a snippet; fails if its identifier is already taken
    pub fn add_snippet(&mut self, snippet: SpdxSnippet) -> Result<&mut SpdxSnippet> {
        self.ensure_unused(snippet.id())?;
        let id = snippet.id().clone();
        Ok(self.snippets.entry(id).or_insert(snippet))
    }

    #[must_use]
    pub fn package(&self, id: &SpdxId) -> Option<&SpdxPackage> {
        self.packages.get(id)
    }

    pub fn package_mut(&mut self, id: &SpdxId) -> Option<&mut SpdxPackage> {
        self.packages.get_mut(id)
    }

    #[must_use]
    pub fn file(&self, id: &SpdxId) -> Option<&SpdxFile> {
        self.files.get(id)
    }

    pub fn file_mut(&mut self, id: &SpdxId) -> Option<&mut SpdxFile> {
        self.files.get_mut(id)
    }

    #[must_use]
    pub fn snippet(&self, id: &SpdxId) -> Option<&SpdxSnippet> {
        self.snippets.get(id)
    }

    pub fn snippet_mut(&mut self, id: &SpdxId) -> Option<&mut SpdxSnippet> {
        self.snippets.get_mut(id)
    }

    /// Packages in insertion order
    pub fn packages(&self) -> impl Iterator<Item = &SpdxPackage> {
        self.packages.values()
    }

    /// Files in insertion order
    pub fn files(&self) -> impl Iterator<Item = &SpdxFile> {
        self.files.values()
    }

    /// Snippets in insertion order
    pub fn snippets(&self) -> impl Iterator<Item = &SpdxSnippet> {
        self.snippets.values()
    }

    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn snippet_count(&self) -> usize {
        self.snippets.len()
    }

    /// Look up any element, including the document itself
    #[must_use]
    pub fn element(&self, id: &SpdxId) -> Option<ElementRef<'_>> {
        if *id == self.id {
            return Some(ElementRef::Document(self));
        }
        self.packages
            .get(id)
            .map(ElementRef::Package)
            .or_else(|| self.files.get(id).map(ElementRef::File))
            .or_else(|| self.snippets.get(id).map(ElementRef::Snippet))
    }

    /// Whether `id` names the document or an element it owns
    #[must_use]
    pub fn contains_element(&self, id: &SpdxId) -> bool {
        *id == self.id
            || self.packages.contains_key(id)
            || self.files.contains_key(id)
            || self.snippets.contains_key(id)
    }

    /// Whether `id` is a valid relationship target for this document.
    ///
    /// Accepts local elements, `DocumentRef-` references to declared
    /// external documents, and the `NONE` / `NOASSERTION` sentinels.
    #[must_use]
    pub fn resolves(&self, id: &SpdxId) -> bool {
        if id.is_sentinel() || self.contains_element(id) {
            return true;
        }
        id.external_document_id().is_some_and(|doc| {
            self.external_document_refs
                .iter()
                .any(|ext| ext.id.as_str() == doc)
        })
    }

    // ------------------------------------------------------------------
    // Owned sequences
    // ------------------------------------------------------------------

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn add_external_document_ref(&mut self, external_ref: ExternalDocumentRef) {
        self.external_document_refs.push(external_ref);
    }

    /// Mark an element as described by this document.
    ///
    /// Returns `false` when it was already listed.
    pub fn add_document_describes(&mut self, id: impl Into<SpdxId>) -> bool {
        self.document_describes.insert(id.into())
    }

    pub fn add_extracted_licensing_info(&mut self, info: ExtractedLicensingInfo) {
        self.extracted_licensing_infos.push(info);
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub fn external_document_refs(&self) -> &[ExternalDocumentRef] {
        &self.external_document_refs
    }

    pub fn document_describes(&self) -> impl Iterator<Item = &SpdxId> {
        self.document_describes.iter()
    }

    #[must_use]
    pub fn extracted_licensing_infos(&self) -> &[ExtractedLicensingInfo] {
        &self.extracted_licensing_infos
    }

    /// Find the definition of a `LicenseRef-*`
    #[must_use]
    pub fn extracted_licensing_info(&self, license_id: &str) -> Option<&ExtractedLicensingInfo> {
        self.extracted_licensing_infos
            .iter()
            .find(|info| info.license_id == license_id)
    }

    pub fn clear_packages(&mut self) {
        self.packages.clear();
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn clear_snippets(&mut self) {
        self.snippets.clear();
    }

    pub fn clear_relationships(&mut self) {
        self.relationships.clear();
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    pub fn clear_external_document_refs(&mut self) {
        self.external_document_refs.clear();
    }

    pub fn clear_document_describes(&mut self) {
        self.document_describes.clear();
    }

    pub fn clear_extracted_licensing_infos(&mut self) {
        self.extracted_licensing_infos.clear();
    }

    /// All license trees in the document, with the element that carries them
    pub fn license_trees(&self) -> impl Iterator<Item = (&SpdxId, &AnyLicenseInfo)> {
        let doc = std::iter::once((&self.id, &self.data_license));
        let packages = self.packages.values().flat_map(|pkg| {
            pkg.license_concluded
                .iter()
                .chain(pkg.license_declared.iter())
                .chain(pkg.license_info_from_files.iter())
                .map(move |lic| (pkg.id(), lic))
        });
        let files = self.files.values().flat_map(element_licenses);
        let snippets = self.snippets.values().flat_map(element_licenses);
        doc.chain(packages).chain(files).chain(snippets)
    }
}

fn element_licenses<E: SpdxElement>(element: &E) -> impl Iterator<Item = (&SpdxId, &AnyLicenseInfo)> {
    element
        .license_concluded()
        .into_iter()
        .chain(element.license_info())
        .map(move |lic| (element.id(), lic))
}
