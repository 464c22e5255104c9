//! Unified error types for spdx-writer.
//!
//! Errors fall into three groups: construction errors raised while a
//! document is being built, serialization errors raised while it is being
//! rendered, and registry errors raised while loading license lists.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for spdx-writer operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SpdxError {
    /// Errors while building the document model
    #[error("Invalid document construction: {context}")]
    Construction {
        context: String,
        #[source]
        source: ConstructionErrorKind,
    },

    /// Errors while rendering a document to its wire format
    #[error("Serialization failed: {context}")]
    Serialize {
        context: String,
        #[source]
        source: SerializeErrorKind,
    },

    /// Errors while loading the known license registry
    #[error("License registry unavailable: {context}")]
    Registry {
        context: String,
        #[source]
        source: RegistryErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific construction error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConstructionErrorKind {
    #[error("{kind} license set requires at least one member")]
    EmptyLicenseSet { kind: &'static str },

    #[error("package verification code requires filesAnalyzed = true")]
    VerificationCodeWithoutAnalysis,

    #[error("identifier {0} is already used in this document")]
    DuplicateIdentifier(String),
}

/// Specific serialization error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SerializeErrorKind {
    #[error("pointer in field '{field}' has no reference")]
    UnsetPointerReference { field: String },

    #[error("range in field '{field}' has no {side} pointer")]
    UnsetRangeEnd { field: String, side: &'static str },

    #[error("reference {reference} in field '{field}' does not resolve within the document")]
    UnresolvedReference { field: String, reference: String },

    #[error("license in field '{field}' has no identifier")]
    UnsetLicense { field: String },

    #[error("value of tag '{field}' contains </text> and cannot be wrapped")]
    UnencodableText { field: String },

    #[error("JSON encoding failed: {0}")]
    Json(String),

    #[error("YAML encoding failed: {0}")]
    Yaml(String),
}

/// Specific registry error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RegistryErrorKind {
    #[error("license list file not found: {0}")]
    NotFound(PathBuf),

    #[error("malformed license list: {0}")]
    Malformed(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for spdx-writer operations
pub type Result<T> = std::result::Result<T, SpdxError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SpdxError {
    /// Create a construction error with context
    pub fn construction(context: impl Into<String>, source: ConstructionErrorKind) -> Self {
        Self::Construction {
            context: context.into(),
            source,
        }
    }

    /// Create a construction error for an empty AND/OR set
    pub fn empty_license_set(kind: &'static str) -> Self {
        Self::construction(
            "building license expression",
            ConstructionErrorKind::EmptyLicenseSet { kind },
        )
    }

    /// Create a serialization error with context
    pub fn serialize(context: impl Into<String>, source: SerializeErrorKind) -> Self {
        Self::Serialize {
            context: context.into(),
            source,
        }
    }

    /// Create a serialization error for a reference that does not resolve
    pub fn unresolved(
        element: impl Into<String>,
        field: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::serialize(
            format!("element {}", element.into()),
            SerializeErrorKind::UnresolvedReference {
                field: field.into(),
                reference: reference.into(),
            },
        )
    }

    /// Create a registry error with context
    pub fn registry(context: impl Into<String>, source: RegistryErrorKind) -> Self {
        Self::Registry {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SpdxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SpdxError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialize("JSON encoding", SerializeErrorKind::Json(err.to_string()))
    }
}

impl From<serde_yaml_ng::Error> for SpdxError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::serialize("YAML encoding", SerializeErrorKind::Yaml(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to the error's existing context, so a chain
/// of calls produces `"outer: middle: inner"`.
///
/// ```ignore
/// use spdx_writer::error::ErrorContext;
///
/// let wire = serializer
///     .to_wire(&document)
///     .with_context(|| format!("rendering {}", document.name))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SpdxError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SpdxError, new_ctx: &str) -> SpdxError {
    match err {
        SpdxError::Construction {
            context: existing,
            source,
        } => SpdxError::Construction {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SpdxError::Serialize {
            context: existing,
            source,
        } => SpdxError::Serialize {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SpdxError::Registry {
            context: existing,
            source,
        } => SpdxError::Registry {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SpdxError::Io {
            path,
            message,
            source,
        } => SpdxError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SpdxError::Config(msg) => SpdxError::Config(chain_context(new_ctx, &msg)),
        SpdxError::Validation(msg) => SpdxError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SpdxError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SpdxError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpdxError::empty_license_set("conjunctive");
        let display = err.to_string();
        assert!(
            display.contains("construction"),
            "Error message should mention construction: {}",
            display
        );

        let err = SpdxError::unresolved("SPDXRef-Snippet", "ranges[0].startPointer", "SPDXRef-Gone");
        let display = err.to_string();
        assert!(display.contains("SPDXRef-Snippet"), "{}", display);
    }

    #[test]
    fn test_source_carries_details() {
        let err = SpdxError::unresolved("SPDXRef-A", "relatedSpdxElement", "SPDXRef-B");
        let source = std::error::Error::source(&err).expect("source should be set");
        let text = source.to_string();
        assert!(text.contains("SPDXRef-B"));
        assert!(text.contains("relatedSpdxElement"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SpdxError::io("/path/to/doc.spdx.json", io_err);

        assert!(err.to_string().contains("/path/to/doc.spdx.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(SpdxError::serialize(
                "base",
                SerializeErrorKind::UnsetLicense {
                    field: "licenseConcluded".to_string(),
                },
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(SpdxError::Serialize { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Serialize error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(SpdxError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let some_value: Option<i32> = Some(42);
        assert_eq!(some_value.context_none("missing value").unwrap(), 42);

        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(SpdxError::Validation(msg)) => assert_eq!(msg, "missing value"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
