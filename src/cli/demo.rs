//! Demo command handler.
//!
//! Builds a small but complete document that exercises every part of the
//! model (license algebra, snippets, external references, relationship
//! cycles) and writes it in the configured format.

use crate::config::{AppConfig, DocumentConfig};
use crate::error::Result;
use crate::model::{
    Annotation, AnnotationType, AnyLicenseInfo, Checksum, ChecksumAlgorithm, CreationInfo, Creator,
    DocumentValidator, ExternalDocumentRef, ExternalRef, ExtractedLicensingInfo, FileType, IssueSeverity,
    PackagePurpose, PackageVerificationCode, Relationship, RelationshipType, SpdxDocument,
    SpdxFile, SpdxPackage, SpdxSnippet, StartEndPointer,
};
use crate::registry::{load_registry, LicenseRegistry};
use crate::serialize::{OutputTarget, SpdxSerializer};
use anyhow::{bail, Context};

const PACKAGE_ID: &str = "SPDXRef-Package";
const SOURCE_FILE_ID: &str = "SPDXRef-DoapSource";
const C_FILE_ID: &str = "SPDXRef-File";
const SNIPPET_ID: &str = "SPDXRef-Snippet";
const TOOLS_DOC_ID: &str = "DocumentRef-spdx-tool-1.2";

/// Run the demo command
pub fn run_demo(config: &AppConfig, name: &str) -> anyhow::Result<()> {
    let registry = load_registry(&config.registry);

    let mut doc = build_demo_document(name, &config.document)
        .context("failed to build demo document")?;
    doc.creation_info.license_list_version = registry.license_list_version();

    if config.validation.validate_before_write {
        validate(config, &doc, registry.as_ref())?;
    }

    let serializer = SpdxSerializer::new(config.serializer_options()).with_registry(registry.as_ref());
    let rendered = serializer
        .render(&doc)
        .with_context(|| format!("failed to serialize {}", doc.name))?;

    let target = OutputTarget::from_option(config.output.file.clone());
    target.write(&rendered)?;
    Ok(())
}

fn validate(config: &AppConfig, doc: &SpdxDocument, registry: &dyn LicenseRegistry) -> anyhow::Result<()> {
    let report = DocumentValidator::new().with_registry(registry).validate(doc);
    for issue in &report.issues {
        match issue.severity {
            IssueSeverity::Error => tracing::error!("{}", issue),
            IssueSeverity::Warning => tracing::warn!("{}", issue),
        }
    }

    if !report.is_valid() {
        bail!("document has {} validation error(s)", report.error_count());
    }
    if config.validation.fail_on_warning && report.warning_count() > 0 {
        bail!(
            "document has {} validation warning(s) and fail_on_warning is set",
            report.warning_count()
        );
    }
    Ok(())
}

/// Build the demo document
pub fn build_demo_document(name: &str, config: &DocumentConfig) -> Result<SpdxDocument> {
    let mut info = CreationInfo::now();
    for creator in &config.creators {
        match Creator::parse(creator) {
            Some(c) => info.add_creator(c),
            None => tracing::warn!("Ignoring malformed creator '{}'", creator),
        }
    }
    info.comment = Some("Generated by the spdx-writer demo command.".to_string());

    let namespace = config.namespace_for(&format!("{name}-{}", info.created.format("%Y%m%dT%H%M%SZ")));
    let mut doc = SpdxDocument::new(name, namespace, info);
    doc.comment = Some("Example document covering packages, files, snippets and license expressions.".to_string());

    doc.add_external_document_ref(ExternalDocumentRef::new(
        TOOLS_DOC_ID,
        "http://spdx.org/spdxdocs/spdx-tools-v1.2-3F2504E0-4F89-41D3-9A0C-0305E82C3301",
        Checksum::new(ChecksumAlgorithm::Sha1, "d6a770ba38583ed4bb4525bd96e50461655d2759"),
    ));

    add_extracted_licenses(&mut doc);
    add_files(&mut doc)?;
    add_package(&mut doc)?;
    add_snippet(&mut doc)?;

    doc.add_document_describes(PACKAGE_ID);
    doc.add_relationship(Relationship::new(
        doc.id().clone(),
        RelationshipType::CopyOf,
        format!("{TOOLS_DOC_ID}:SPDXRef-ToolsElement"),
    ));
    // Package and file refer to each other; the wire form stays acyclic
    doc.add_relationship(Relationship::new(PACKAGE_ID, RelationshipType::Contains, C_FILE_ID));
    doc.add_relationship(Relationship::new(C_FILE_ID, RelationshipType::ContainedBy, PACKAGE_ID));
    doc.add_relationship(
        Relationship::new(C_FILE_ID, RelationshipType::GeneratedFrom, SOURCE_FILE_ID)
            .with_comment("Compiled from the DOAP project sources."),
    );

    Ok(doc)
}

fn add_extracted_licenses(doc: &mut SpdxDocument) {
    doc.add_extracted_licensing_info(
        ExtractedLicensingInfo::new(
            "LicenseRef-1",
            "/*\n * (c) Copyright 2000-2009 Hewlett-Packard Development Company, LP\n * All rights reserved.\n */",
        ),
    );
    doc.add_extracted_licensing_info(
        ExtractedLicensingInfo::new(
            "LicenseRef-2",
            "This package includes the GRDDL parser developed by Hewlett Packard under the following license.",
        )
        .with_name("GRDDL parser license"),
    );
    let mut beer = ExtractedLicensingInfo::new(
        "LicenseRef-Beerware-4.2",
        "\"THE BEER-WARE LICENSE\" (Revision 42): you can do whatever you want with this stuff.",
    )
    .with_name("Beer-Ware License (Version 42)");
    beer.see_alsos.push("http://people.freebsd.org/~phk/".to_string());
    beer.comment = Some("The beerware license has a couple of other standard variants.".to_string());
    doc.add_extracted_licensing_info(beer);
}

fn add_files(doc: &mut SpdxDocument) -> Result<()> {
    let source = doc.add_file(SpdxFile::new(SOURCE_FILE_ID, "./src/org/spdx/parser/DOAPProject.java"))?;
    source.add_file_type(FileType::Source);
    source.add_checksum(Checksum::new(
        ChecksumAlgorithm::Sha1,
        "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12",
    ));
    source.license_concluded = Some(AnyLicenseInfo::license("Apache-2.0"));
    source.add_license_info(AnyLicenseInfo::license("Apache-2.0"));
    source.copyright_text = Some("Copyright 2010, 2011 Source Auditor Inc.".to_string());
    source.add_contributor("Protecode Inc.");
    source.add_contributor("Source Auditor Inc.");

    let c_file = doc.add_file(SpdxFile::new(C_FILE_ID, "./package/foo.c"))?;
    c_file.add_file_type(FileType::Source);
    c_file.add_checksum(Checksum::new(
        ChecksumAlgorithm::Md5,
        "624c1abb3664f4b35547e7c73864ad24",
    ));
    c_file.license_concluded = Some(AnyLicenseInfo::or(vec![
        AnyLicenseInfo::license("GPL-2.0-only"),
        AnyLicenseInfo::license("LicenseRef-2"),
    ])?);
    c_file.add_license_info(AnyLicenseInfo::license("GPL-2.0-only"));
    c_file.add_license_info(AnyLicenseInfo::license("LicenseRef-2"));
    c_file.license_comments = Some("The concluded license was taken from the package level.".to_string());
    c_file.notice_text = Some("Copyright (c) 2001 Aaron Lehmann aaroni@vitelus.com".to_string());
    c_file.comment = Some("The concluded license was taken from the package level that the file was included in.".to_string());
    Ok(())
}

fn add_package(doc: &mut SpdxDocument) -> Result<()> {
    let pkg = doc.add_package(SpdxPackage::new(PACKAGE_ID, "glibc"))?;
    pkg.version_info = Some("2.11.1".to_string());
    pkg.package_file_name = Some("glibc-2.11.1.tar.gz".to_string());
    pkg.supplier = Some("Person: Jane Doe (jane.doe@example.com)".to_string());
    pkg.originator = Some("Organization: ExampleCodeInspect (contact@example.com)".to_string());
    pkg.download_location = "http://ftp.gnu.org/gnu/glibc/glibc-ports-2.15.tar.gz".to_string();
    pkg.homepage = Some("http://ftp.gnu.org/gnu/glibc".to_string());
    pkg.primary_package_purpose = Some(PackagePurpose::Source);
    pkg.set_verification_code(
        PackageVerificationCode::new("d6a770ba38583ed4bb4525bd96e50461655d2758").excluding("./package.spdx"),
    )?;
    pkg.add_checksum(Checksum::new(
        ChecksumAlgorithm::Sha256,
        "11b6d3ee554eedf79299905a98f9b9a04e498210b59f15094c916c91d150efcd",
    ));

    pkg.license_concluded = Some(AnyLicenseInfo::or(vec![
        AnyLicenseInfo::license("LGPL-2.0-only"),
        AnyLicenseInfo::license("LicenseRef-1"),
    ])?);
    pkg.license_declared = Some(AnyLicenseInfo::and(vec![
        AnyLicenseInfo::license("LGPL-2.0-only"),
        AnyLicenseInfo::with_exception(AnyLicenseInfo::or_later("GPL-2.0"), "Classpath-exception-2.0"),
        AnyLicenseInfo::license("LicenseRef-Beerware-4.2"),
    ])?);
    pkg.add_license_info_from_file(AnyLicenseInfo::license("GPL-2.0-only"));
    pkg.add_license_info_from_file(AnyLicenseInfo::license("LicenseRef-2"));
    pkg.add_license_info_from_file(AnyLicenseInfo::license("LicenseRef-1"));
    pkg.license_comments = Some("The license for this project changed with the release of version x.y.".to_string());
    pkg.copyright_text = Some("Copyright 2008-2010 John Smith".to_string());
    pkg.summary = Some("GNU C library.".to_string());
    pkg.add_external_ref(ExternalRef::purl("pkg:generic/glibc@2.11.1"));
    pkg.add_file_reference(SOURCE_FILE_ID);
    pkg.add_file_reference(C_FILE_ID);
    pkg.add_annotation(Annotation::new(
        Creator::person("Package Reviewer"),
        chrono::Utc::now(),
        AnnotationType::Review,
        "Reviewed the concluded license against the package sources.",
    ));
    Ok(())
}

fn add_snippet(doc: &mut SpdxDocument) -> Result<()> {
    let mut snippet = SpdxSnippet::new(SNIPPET_ID, SOURCE_FILE_ID);
    snippet.name = Some("from linux kernel".to_string());
    snippet.add_range(StartEndPointer::bytes(SOURCE_FILE_ID, 310, 420));
    snippet.add_range(StartEndPointer::lines(SOURCE_FILE_ID, 5, 23));
    snippet.license_concluded = Some(AnyLicenseInfo::license("GPL-2.0-only"));
    snippet.add_license_info(AnyLicenseInfo::license("GPL-2.0-only"));
    snippet.copyright_text = Some("Copyright 2008-2010 John Smith".to_string());
    snippet.comment = Some("This snippet was identified as significant and highlighted in this Apache-2.0 file.".to_string());
    doc.add_snippet(snippet)?;
    Ok(())
}
