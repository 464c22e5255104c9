//! Reference-safe SPDX serializer.
//!
//! Serialization is two-phase. The document is first converted into a
//! wire tree ([`WireDocument`]) in which every element appears once and
//! every reference is a bare identifier; any reference that does not
//! resolve, any incomplete snippet range and any license leaf without an
//! identifier aborts the conversion. Only a complete wire tree is ever
//! encoded, and files are written atomically, so a failed serialization
//! produces no output at all.

mod output;
pub mod tag_value;
mod wire;

pub use output::{write_atomic, OutputTarget};
pub use wire::{
    WireAnnotation, WireChecksum, WireCreationInfo, WireDocument, WireExternalDocumentRef,
    WireExternalRef, WireExtractedLicensingInfo, WireFile, WirePackage, WirePointer, WireRange,
    WireRelationship, WireSnippet, WireVerificationCode,
};

use crate::error::Result;
use crate::model::SpdxDocument;
use crate::registry::LicenseRegistry;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use wire::WireEncoder;

/// Encoding of the serialized document
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// SPDX 2.3 JSON
    #[default]
    Json,
    /// SPDX 2.3 YAML (same field names as JSON)
    Yaml,
    /// SPDX tag-value text
    TagValue,
}

impl OutputFormat {
    /// Conventional file extension, without the leading dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "spdx.json",
            Self::Yaml => "spdx.yaml",
            Self::TagValue => "spdx",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::TagValue => write!(f, "tag-value"),
        }
    }
}

/// Serializer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerOptions {
    pub format: OutputFormat,
    /// Indent JSON output; ignored by the other encoders
    pub pretty: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// Writes [`SpdxDocument`]s in their wire formats.
#[derive(Default)]
pub struct SpdxSerializer<'r> {
    options: SerializerOptions,
    registry: Option<&'r dyn LicenseRegistry>,
}

impl<'r> SpdxSerializer<'r> {
    #[must_use]
    pub const fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            registry: None,
        }
    }

    /// Use `registry` to fill `licenseListVersion` and to report unknown
    /// license identifiers.
    #[must_use]
    pub fn with_registry(mut self, registry: &'r dyn LicenseRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub const fn options(&self) -> SerializerOptions {
        self.options
    }

    /// Convert the document into its checked wire tree
    pub fn to_wire(&self, doc: &SpdxDocument) -> Result<WireDocument> {
        if let Some(registry) = self.registry {
            warn_unknown_licenses(doc, registry);
        }
        let version = self.registry.and_then(|r| r.license_list_version());
        WireEncoder::new(doc).encode(version)
    }

    /// Render the document in the configured format
    pub fn render(&self, doc: &SpdxDocument) -> Result<String> {
        let wire = self.to_wire(doc)?;
        let rendered = match self.options.format {
            OutputFormat::Json if self.options.pretty => serde_json::to_string_pretty(&wire)?,
            OutputFormat::Json => serde_json::to_string(&wire)?,
            OutputFormat::Yaml => serde_yaml_ng::to_string(&wire)?,
            OutputFormat::TagValue => tag_value::render(&wire)?,
        };

        tracing::debug!(
            format = %self.options.format,
            bytes = rendered.len(),
            packages = wire.packages.len(),
            files = wire.files.len(),
            snippets = wire.snippets.len(),
            "Rendered document {}",
            doc.name
        );
        Ok(rendered)
    }

    /// Render the document and write it to `writer`.
    ///
    /// Nothing is written unless rendering succeeds.
    pub fn write_to<W: Write>(&self, doc: &SpdxDocument, mut writer: W) -> Result<()> {
        let rendered = self.render(doc)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render the document and write it atomically to `path`
    pub fn write_to_path(&self, doc: &SpdxDocument, path: &Path) -> Result<()> {
        let rendered = self.render(doc)?;
        write_atomic(path, rendered.as_bytes())
    }
}

fn warn_unknown_licenses(doc: &SpdxDocument, registry: &dyn LicenseRegistry) {
    for (element, license) in doc.license_trees() {
        for id in license.license_ids() {
            if !registry.is_known_license_id(id) {
                tracing::warn!("{}: unknown license identifier {}", element, id);
            }
        }
        for id in license.exception_ids() {
            if !registry.is_known_exception_id(id) {
                tracing::warn!("{}: unknown license exception {}", element, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnyLicenseInfo, CreationInfo, Creator, SpdxPackage};
    use crate::registry::BuiltinLicenseRegistry;

    fn document() -> SpdxDocument {
        let mut info = CreationInfo::now();
        info.add_creator(Creator::tool("spdx-writer"));
        let mut doc = SpdxDocument::new("demo", "https://example.com/spdx/demo", info);
        let pkg = doc.add_package(SpdxPackage::new("SPDXRef-Package", "demo")).unwrap();
        pkg.license_declared = Some(AnyLicenseInfo::license("MIT"));
        doc.add_document_describes("SPDXRef-Package");
        doc
    }

    #[test]
    fn test_registry_stamps_license_list_version() {
        let registry = BuiltinLicenseRegistry::new(Some("3.23".to_string()));
        let wire = SpdxSerializer::default()
            .with_registry(&registry)
            .to_wire(&document())
            .unwrap();
        assert_eq!(wire.creation_info.license_list_version.as_deref(), Some("3.23"));

        let wire = SpdxSerializer::default().to_wire(&document()).unwrap();
        assert!(wire.creation_info.license_list_version.is_none());
    }

    #[test]
    fn test_compact_json() {
        let serializer = SpdxSerializer::new(SerializerOptions {
            format: OutputFormat::Json,
            pretty: false,
        });
        let rendered = serializer.render(&document()).unwrap();
        assert!(!rendered.contains('\n'));
        assert!(rendered.starts_with("{\"SPDXID\":\"SPDXRef-DOCUMENT\""));
    }

    #[test]
    fn test_yaml_uses_wire_names() {
        let serializer = SpdxSerializer::new(SerializerOptions {
            format: OutputFormat::Yaml,
            pretty: true,
        });
        let rendered = serializer.render(&document()).unwrap();
        assert!(rendered.contains("SPDXID: SPDXRef-DOCUMENT"));
        assert!(rendered.contains("licenseDeclared: MIT"));
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buf = Vec::new();
        SpdxSerializer::default().write_to(&document(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["packages"][0]["SPDXID"], "SPDXRef-Package");
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::TagValue.to_string(), "tag-value");
        assert_eq!(
            OutputFormat::from_str("tag-value", true).unwrap(),
            OutputFormat::TagValue
        );
        assert_eq!(OutputFormat::Yaml.extension(), "spdx.yaml");
    }
}
