//! Integration tests for the reference-safe serializer
//!
//! These tests build documents through the public API and check the
//! rendered output: identifier substitution, field omission, failure
//! modes and atomic writes.

use serde_json::Value;
use spdx_writer::{
    error::{SerializeErrorKind, SpdxError},
    model::{
        AnyLicenseInfo, CreationInfo, Creator, Relationship, RelationshipType, SinglePointer,
        SpdxDocument, SpdxFile, SpdxPackage, SpdxSnippet, StartEndPointer,
    },
    serialize::{OutputFormat, SerializerOptions, SpdxSerializer},
    BuiltinLicenseRegistry,
};
use std::collections::HashMap;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

fn document() -> SpdxDocument {
    let mut info = CreationInfo::now();
    info.add_creator(Creator::tool("spdx-writer-tests"));
    SpdxDocument::new("fixture", "https://example.com/spdx/fixture", info)
}

/// Package P containing file F, with P described and related to F both ways
fn package_with_file() -> SpdxDocument {
    let mut doc = document();
    doc.add_file(SpdxFile::new("SPDXRef-F", "./src/main.c")).unwrap();
    let pkg = doc.add_package(SpdxPackage::new("SPDXRef-P", "p")).unwrap();
    pkg.add_file_reference("SPDXRef-F");
    pkg.license_declared = Some(AnyLicenseInfo::license("MIT"));

    doc.add_document_describes("SPDXRef-P");
    doc.add_relationship(Relationship::new("SPDXRef-DOCUMENT", RelationshipType::Describes, "SPDXRef-P"));
    doc.add_relationship(Relationship::new("SPDXRef-P", RelationshipType::Contains, "SPDXRef-F"));
    doc.add_relationship(Relationship::new("SPDXRef-F", RelationshipType::ContainedBy, "SPDXRef-P"));
    doc
}

fn render_json(doc: &SpdxDocument) -> Value {
    let rendered = SpdxSerializer::default().render(doc).expect("document should serialize");
    serde_json::from_str(&rendered).expect("output should be valid JSON")
}

/// Count objects carrying an `SPDXID` key, per identifier
fn expanded_objects(value: &Value, counts: &mut HashMap<String, usize>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("SPDXID") {
                *counts.entry(id.clone()).or_default() += 1;
            }
            for v in map.values() {
                expanded_objects(v, counts);
            }
        }
        Value::Array(items) => {
            for v in items {
                expanded_objects(v, counts);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Identifier Substitution
// ============================================================================

mod substitution_tests {
    use super::*;

    #[test]
    fn test_each_element_expanded_exactly_once() {
        let json = render_json(&package_with_file());

        let mut counts = HashMap::new();
        expanded_objects(&json, &mut counts);
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&n| n == 1), "{counts:?}");
    }

    #[test]
    fn test_references_are_bare_strings() {
        let json = render_json(&package_with_file());

        let relationships = json["relationships"].as_array().unwrap();
        assert_eq!(relationships.len(), 3);
        assert_eq!(relationships[0]["spdxElementId"], "SPDXRef-DOCUMENT");
        assert_eq!(relationships[0]["relationshipType"], "DESCRIBES");
        assert_eq!(relationships[0]["relatedSpdxElement"], "SPDXRef-P");
        assert_eq!(relationships[1]["relatedSpdxElement"], "SPDXRef-F");
        assert_eq!(relationships[2]["relationshipType"], "CONTAINED_BY");

        assert_eq!(json["documentDescribes"], serde_json::json!(["SPDXRef-P"]));
        assert_eq!(json["packages"][0]["hasFiles"], serde_json::json!(["SPDXRef-F"]));
    }

    #[test]
    fn test_snippet_references() {
        let mut doc = package_with_file();
        let mut snippet = SpdxSnippet::new("SPDXRef-S", "SPDXRef-F");
        snippet.add_range(StartEndPointer::bytes("SPDXRef-F", 100, 200));
        snippet.add_range(StartEndPointer::lines("SPDXRef-F", 4, 9));
        doc.add_snippet(snippet).unwrap();

        let json = render_json(&doc);
        let snippet = &json["snippets"][0];
        assert_eq!(snippet["snippetFromFile"], "SPDXRef-F");
        assert_eq!(
            snippet["ranges"][0],
            serde_json::json!({
                "startPointer": {"offset": 100, "reference": "SPDXRef-F"},
                "endPointer": {"offset": 200, "reference": "SPDXRef-F"},
            })
        );
        assert_eq!(snippet["ranges"][1]["endPointer"]["lineNumber"], 9);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut doc = document();
        for id in ["SPDXRef-zeta", "SPDXRef-alpha", "SPDXRef-mid"] {
            doc.add_package(SpdxPackage::new(id, id)).unwrap();
        }

        let json = render_json(&doc);
        let ids: Vec<&str> = json["packages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["SPDXID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["SPDXRef-zeta", "SPDXRef-alpha", "SPDXRef-mid"]);
    }

    #[test]
    fn test_external_document_reference_in_relationship() {
        use spdx_writer::model::{Checksum, ChecksumAlgorithm, ExternalDocumentRef};

        let mut doc = package_with_file();
        doc.add_external_document_ref(ExternalDocumentRef::new(
            "DocumentRef-other",
            "https://example.com/spdx/other",
            Checksum::new(ChecksumAlgorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
        ));
        doc.add_relationship(Relationship::new(
            "SPDXRef-P",
            RelationshipType::DependsOn,
            "DocumentRef-other:SPDXRef-lib",
        ));
        doc.add_relationship(Relationship::new("SPDXRef-F", RelationshipType::DependsOn, "NONE"));

        let json = render_json(&doc);
        assert_eq!(json["externalDocumentRefs"][0]["externalDocumentId"], "DocumentRef-other");
        assert_eq!(json["externalDocumentRefs"][0]["checksum"]["algorithm"], "SHA1");
        assert_eq!(json["relationships"][3]["relatedSpdxElement"], "DocumentRef-other:SPDXRef-lib");
        assert_eq!(json["relationships"][4]["relatedSpdxElement"], "NONE");
    }
}

// ============================================================================
// Omission
// ============================================================================

mod omission_tests {
    use super::*;

    #[test]
    fn test_unset_optional_fields_absent() {
        let json = render_json(&package_with_file());

        let pkg = json["packages"][0].as_object().unwrap();
        for key in [
            "versionInfo",
            "supplier",
            "homepage",
            "licenseConcluded",
            "comment",
            "checksums",
            "externalRefs",
            "annotations",
            "packageVerificationCode",
        ] {
            assert!(!pkg.contains_key(key), "unexpected key {key}");
        }
        assert_eq!(pkg["licenseDeclared"], "MIT");
        assert_eq!(pkg["downloadLocation"], "NOASSERTION");
        assert_eq!(pkg["filesAnalyzed"], true);

        let file = json["files"][0].as_object().unwrap();
        assert_eq!(file.len(), 2, "{file:?}");

        let root = json.as_object().unwrap();
        assert!(!root.contains_key("snippets"));
        assert!(!root.contains_key("comment"));
        assert!(!root.contains_key("hasExtractedLicensingInfos"));
        assert!(!json["creationInfo"].as_object().unwrap().contains_key("licenseListVersion"));
    }

    #[test]
    fn test_no_null_values() {
        let rendered = SpdxSerializer::default().render(&package_with_file()).unwrap();
        assert!(!rendered.contains("null"));
    }
}

// ============================================================================
// Failure Modes
// ============================================================================

mod failure_tests {
    use super::*;

    fn assert_serialize_error(err: &SpdxError, check: impl Fn(&SerializeErrorKind) -> bool) {
        match err {
            SpdxError::Serialize { source, .. } => assert!(check(source), "unexpected kind: {source:?}"),
            other => panic!("expected serialize error, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_range_fails() {
        let mut doc = package_with_file();
        let mut snippet = SpdxSnippet::new("SPDXRef-S", "SPDXRef-F");
        let mut range = StartEndPointer::new();
        range.set_start(SinglePointer::byte_offset(999).in_element("SPDXRef-F"));
        snippet.add_range(range);
        doc.add_snippet(snippet).unwrap();

        let err = SpdxSerializer::default().render(&doc).unwrap_err();
        assert_serialize_error(&err, |kind| {
            matches!(kind, SerializeErrorKind::UnsetRangeEnd { side: "end", .. })
        });
        assert!(err.to_string().contains("SPDXRef-S"));
    }

    #[test]
    fn test_pointer_without_reference_fails() {
        let mut doc = package_with_file();
        let mut snippet = SpdxSnippet::new("SPDXRef-S", "SPDXRef-F");
        snippet.add_range(StartEndPointer::between(
            SinglePointer::byte_offset(1),
            SinglePointer::byte_offset(2).in_element("SPDXRef-F"),
        ));
        doc.add_snippet(snippet).unwrap();

        let err = SpdxSerializer::default().render(&doc).unwrap_err();
        assert_serialize_error(&err, |kind| {
            matches!(kind, SerializeErrorKind::UnsetPointerReference { field } if field == "ranges[0].startPointer")
        });
    }

    #[test]
    fn test_unresolved_relationship_fails() {
        let mut doc = package_with_file();
        doc.add_relationship(Relationship::new("SPDXRef-P", RelationshipType::DependsOn, "SPDXRef-missing"));

        let err = SpdxSerializer::default().render(&doc).unwrap_err();
        assert_serialize_error(&err, |kind| {
            matches!(kind, SerializeErrorKind::UnresolvedReference { reference, .. } if reference == "SPDXRef-missing")
        });
    }

    #[test]
    fn test_undeclared_external_document_fails() {
        let mut doc = package_with_file();
        doc.add_relationship(Relationship::new(
            "SPDXRef-P",
            RelationshipType::DependsOn,
            "DocumentRef-unknown:SPDXRef-lib",
        ));

        assert!(SpdxSerializer::default().render(&doc).is_err());
    }

    #[test]
    fn test_unresolved_has_files_fails() {
        let mut doc = package_with_file();
        doc.package_mut(&"SPDXRef-P".into())
            .unwrap()
            .add_file_reference("SPDXRef-gone");

        let err = SpdxSerializer::default().render(&doc).unwrap_err();
        assert_serialize_error(&err, |kind| {
            matches!(kind, SerializeErrorKind::UnresolvedReference { field, .. } if field == "hasFiles")
        });
    }

    #[test]
    fn test_blank_license_id_fails() {
        let mut doc = package_with_file();
        doc.package_mut(&"SPDXRef-P".into()).unwrap().license_declared = Some(
            AnyLicenseInfo::and(vec![AnyLicenseInfo::license("MIT"), AnyLicenseInfo::license("")])
                .unwrap(),
        );

        let err = SpdxSerializer::default().render(&doc).unwrap_err();
        assert_serialize_error(&err, |kind| matches!(kind, SerializeErrorKind::UnsetLicense { .. }));
        assert!(err.to_string().contains("SPDXRef-P"));
    }

    #[test]
    fn test_dangling_document_describes_is_not_a_serialize_error() {
        let mut doc = package_with_file();
        doc.add_document_describes("SPDXRef-elsewhere");

        let json = render_json(&doc);
        assert_eq!(json["documentDescribes"][1], "SPDXRef-elsewhere");
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.spdx.json");

        let mut doc = package_with_file();
        doc.add_relationship(Relationship::new("SPDXRef-P", RelationshipType::DependsOn, "SPDXRef-missing"));

        assert!(SpdxSerializer::default().write_to_path(&doc, &path).is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.spdx.json");
        std::fs::write(&path, "previous").unwrap();

        let mut doc = package_with_file();
        let mut snippet = SpdxSnippet::new("SPDXRef-S", "SPDXRef-F");
        snippet.add_range(StartEndPointer::new());
        doc.add_snippet(snippet).unwrap();

        assert!(SpdxSerializer::default().write_to_path(&doc, &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }
}

// ============================================================================
// Encoders
// ============================================================================

mod encoder_tests {
    use super::*;

    fn render(doc: &SpdxDocument, format: OutputFormat) -> String {
        SpdxSerializer::new(SerializerOptions { format, pretty: true })
            .render(doc)
            .unwrap()
    }

    #[test]
    fn test_write_to_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.spdx.json");

        SpdxSerializer::default()
            .write_to_path(&package_with_file(), &path)
            .unwrap();

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["spdxVersion"], "SPDX-2.3");
        assert_eq!(json["dataLicense"], "CC0-1.0");
    }

    #[test]
    fn test_yaml_matches_json() {
        let doc = package_with_file();
        let json = render_json(&doc);
        let yaml: Value = serde_yaml_ng::from_str(&render(&doc, OutputFormat::Yaml)).unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_tag_value_identifiers() {
        let mut doc = package_with_file();
        let mut snippet = SpdxSnippet::new("SPDXRef-S", "SPDXRef-F");
        snippet.add_range(StartEndPointer::bytes("SPDXRef-F", 100, 200));
        snippet.add_range(StartEndPointer::lines("SPDXRef-F", 4, 9));
        doc.add_snippet(snippet).unwrap();

        let text = render(&doc, OutputFormat::TagValue);
        assert!(text.starts_with("SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n"));
        assert!(text.contains("PackageName: p\nSPDXID: SPDXRef-P\n"));
        assert!(text.contains("PackageLicenseDeclared: MIT\n"));
        assert_eq!(text.matches("Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-P\n").count(), 1);
        assert_eq!(text.matches("Relationship: SPDXRef-P CONTAINS SPDXRef-F\n").count(), 1);
        assert!(text.contains("SnippetFromFileSPDXID: SPDXRef-F\n"));
        assert!(text.contains("SnippetByteRange: 100:200\n"));
        assert!(text.contains("SnippetLineRange: 4:9\n"));
    }

    #[test]
    fn test_tag_value_implicit_relationships() {
        let mut doc = document();
        doc.add_file(SpdxFile::new("SPDXRef-F", "./src/main.c")).unwrap();
        doc.add_package(SpdxPackage::new("SPDXRef-P", "p"))
            .unwrap()
            .add_file_reference("SPDXRef-F");
        doc.add_document_describes("SPDXRef-P");

        let text = render(&doc, OutputFormat::TagValue);
        assert_eq!(text.matches("Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-P\n").count(), 1);
        assert_eq!(text.matches("Relationship: SPDXRef-P CONTAINS SPDXRef-F\n").count(), 1);
    }

    #[test]
    fn test_tag_value_rejects_text_close_marker() {
        let mut doc = package_with_file();
        doc.comment = Some("ends early </text> here".to_string());

        let result = SpdxSerializer::new(SerializerOptions {
            format: OutputFormat::TagValue,
            pretty: true,
        })
        .render(&doc);
        assert!(matches!(
            result,
            Err(SpdxError::Serialize {
                source: SerializeErrorKind::UnencodableText { .. },
                ..
            })
        ));

        // JSON has no such restriction
        assert!(SpdxSerializer::default().render(&doc).is_ok());
    }

    #[test]
    fn test_registry_version_in_every_format() {
        let registry = BuiltinLicenseRegistry::new(Some("3.23".to_string()));
        let doc = package_with_file();

        for format in [OutputFormat::Json, OutputFormat::Yaml, OutputFormat::TagValue] {
            let rendered = SpdxSerializer::new(SerializerOptions { format, pretty: true })
                .with_registry(&registry)
                .render(&doc)
                .unwrap();
            assert!(rendered.contains("3.23"), "{format}: {rendered}");
        }
    }
}
