//! License expression algebra.
//!
//! An [`AnyLicenseInfo`] is a tree built programmatically from leaf licenses,
//! the two sentinels (`NONE`, `NOASSERTION`) and the `AND`/`OR`/`+`/`WITH`
//! combinators. Trees are rendered two ways:
//!
//! - [`fmt::Display`] gives the diagnostic rendering, where a leaf shows its
//!   human-readable name and comment when it has them.
//! - [`AnyLicenseInfo::to_expression`] gives the SPDX license expression used
//!   on the wire, where a leaf is always its bare identifier.
//!
//! Member order of `AND`/`OR` sets is kept exactly as built; nothing here
//! sorts or deduplicates.

use crate::error::{Result, SerializeErrorKind, SpdxError};
use std::fmt;

/// Prefix of user-defined license identifiers.
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";

const NONE_TOKEN: &str = "NONE";
const NOASSERTION_TOKEN: &str = "NOASSERTION";
const NULL_LICENSE_TOKEN: &str = "NULL LICENSE";

/// Any node of a license expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyLicenseInfo {
    /// A listed license or a `LicenseRef-*`
    Simple(SimpleLicensingInfo),
    /// All members apply (`AND`)
    Conjunctive(ConjunctiveLicenseSet),
    /// One of the members applies (`OR`)
    Disjunctive(DisjunctiveLicenseSet),
    /// The license or any later version (`+`)
    OrLater(OrLaterOperator),
    /// A license modified by an exception (`WITH`)
    WithException(WithExceptionOperator),
    /// `NONE`
    None,
    /// `NOASSERTION`
    NoAssertion,
}

impl AnyLicenseInfo {
    /// Leaf license with the given identifier
    pub fn license(id: impl Into<String>) -> Self {
        Self::Simple(SimpleLicensingInfo::new(id))
    }

    /// `(m1 AND m2 AND ...)`; fails on an empty member list
    pub fn and(members: Vec<AnyLicenseInfo>) -> Result<Self> {
        ConjunctiveLicenseSet::new(members).map(Self::Conjunctive)
    }

    /// `(m1 OR m2 OR ...)`; fails on an empty member list
    pub fn or(members: Vec<AnyLicenseInfo>) -> Result<Self> {
        DisjunctiveLicenseSet::new(members).map(Self::Disjunctive)
    }

    /// `id+`
    pub fn or_later(id: impl Into<String>) -> Self {
        Self::OrLater(OrLaterOperator::new(SimpleLicensingInfo::new(id)))
    }

    /// `license WITH exception`
    pub fn with_exception(license: AnyLicenseInfo, exception_id: impl Into<String>) -> Self {
        Self::WithException(WithExceptionOperator::new(license, exception_id))
    }

    /// Whether this node is one of the two sentinels
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::None | Self::NoAssertion)
    }

    /// Render as an SPDX license expression.
    ///
    /// Leaves render as their identifier only. A leaf without an identifier
    /// has no expression form and yields an error.
    pub fn to_expression(&self) -> Result<String> {
        let mut out = String::new();
        self.write_expression(&mut out)?;
        Ok(out)
    }

    fn write_expression(&self, out: &mut String) -> Result<()> {
        match self {
            Self::None => out.push_str(NONE_TOKEN),
            Self::NoAssertion => out.push_str(NOASSERTION_TOKEN),
            Self::Simple(leaf) => out.push_str(leaf.require_id()?),
            Self::OrLater(op) => {
                out.push_str(op.license.require_id()?);
                out.push('+');
            }
            Self::Conjunctive(set) => write_set_expression(&set.members, " AND ", out)?,
            Self::Disjunctive(set) => write_set_expression(&set.members, " OR ", out)?,
            Self::WithException(op) => {
                op.license.write_expression(out)?;
                out.push_str(" WITH ");
                out.push_str(&op.exception_id);
            }
        }
        Ok(())
    }

    /// Every license identifier in the tree, in rendering order.
    ///
    /// Unset leaves are skipped.
    #[must_use]
    pub fn license_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids, &mut Vec::new());
        ids
    }

    /// Every exception identifier in the tree, in rendering order
    #[must_use]
    pub fn exception_ids(&self) -> Vec<&str> {
        let mut exceptions = Vec::new();
        self.collect_ids(&mut Vec::new(), &mut exceptions);
        exceptions
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>, exceptions: &mut Vec<&'a str>) {
        match self {
            Self::None | Self::NoAssertion => {}
            Self::Simple(leaf) => ids.extend(leaf.identifier()),
            Self::OrLater(op) => ids.extend(op.license.identifier()),
            Self::Conjunctive(ConjunctiveLicenseSet { members })
            | Self::Disjunctive(DisjunctiveLicenseSet { members }) => {
                for member in members {
                    member.collect_ids(ids, exceptions);
                }
            }
            Self::WithException(op) => {
                op.license.collect_ids(ids, exceptions);
                exceptions.push(&op.exception_id);
            }
        }
    }
}

fn write_set_expression(members: &[AnyLicenseInfo], separator: &str, out: &mut String) -> Result<()> {
    out.push('(');
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        member.write_expression(out)?;
    }
    out.push(')');
    Ok(())
}

fn fmt_set(members: &[AnyLicenseInfo], separator: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("(")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{member}")?;
    }
    f.write_str(")")
}

impl fmt::Display for AnyLicenseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE_TOKEN),
            Self::NoAssertion => f.write_str(NOASSERTION_TOKEN),
            Self::Simple(leaf) => write!(f, "{leaf}"),
            Self::OrLater(op) => write!(f, "{op}"),
            Self::Conjunctive(set) => write!(f, "{set}"),
            Self::Disjunctive(set) => write!(f, "{set}"),
            Self::WithException(op) => write!(f, "{op}"),
        }
    }
}

impl From<SimpleLicensingInfo> for AnyLicenseInfo {
    fn from(leaf: SimpleLicensingInfo) -> Self {
        Self::Simple(leaf)
    }
}

impl From<ConjunctiveLicenseSet> for AnyLicenseInfo {
    fn from(set: ConjunctiveLicenseSet) -> Self {
        Self::Conjunctive(set)
    }
}

impl From<DisjunctiveLicenseSet> for AnyLicenseInfo {
    fn from(set: DisjunctiveLicenseSet) -> Self {
        Self::Disjunctive(set)
    }
}

impl From<OrLaterOperator> for AnyLicenseInfo {
    fn from(op: OrLaterOperator) -> Self {
        Self::OrLater(op)
    }
}

impl From<WithExceptionOperator> for AnyLicenseInfo {
    fn from(op: WithExceptionOperator) -> Self {
        Self::WithException(op)
    }
}

/// Leaf license reference: a listed license or a user-defined `LicenseRef-*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SimpleLicensingInfo {
    /// License identifier
    pub id: Option<String>,
    /// Human-readable name
    pub name: Option<String>,
    /// Free-text comment
    pub comment: Option<String>,
}

impl SimpleLicensingInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            comment: None,
        }
    }

    /// A leaf with nothing set; renders as `NULL LICENSE`
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whether the identifier is a user-defined `LicenseRef-*`
    #[must_use]
    pub fn is_license_ref(&self) -> bool {
        self.identifier()
            .is_some_and(|id| id.starts_with(LICENSE_REF_PREFIX))
    }

    /// The identifier, treating a blank one as unset
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    fn require_id(&self) -> Result<&str> {
        self.identifier().ok_or_else(|| {
            SpdxError::serialize(
                "rendering license expression",
                SerializeErrorKind::UnsetLicense {
                    field: self
                        .name
                        .as_ref()
                        .map_or_else(|| "unnamed leaf".to_string(), |name| format!("leaf '{name}'")),
                },
            )
        })
    }
}

impl fmt::Display for SimpleLicensingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.identifier(), &self.name, &self.comment) {
            (Some(id), Some(name), Some(comment)) => write!(f, "{name} ({id}), {comment}"),
            (Some(id), Some(name), None) => write!(f, "{name} ({id})"),
            (None, Some(name), Some(comment)) => write!(f, "{name}, {comment}"),
            (None, Some(name), None) => f.write_str(name),
            (Some(id), None, _) => f.write_str(id),
            (None, None, _) => f.write_str(NULL_LICENSE_TOKEN),
        }
    }
}

/// All members apply (`AND`). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConjunctiveLicenseSet {
    members: Vec<AnyLicenseInfo>,
}

impl ConjunctiveLicenseSet {
    pub fn new(members: Vec<AnyLicenseInfo>) -> Result<Self> {
        if members.is_empty() {
            return Err(SpdxError::empty_license_set("conjunctive"));
        }
        Ok(Self { members })
    }

    pub fn add_member(&mut self, member: AnyLicenseInfo) {
        self.members.push(member);
    }

    /// Replace all members; an empty list is rejected and leaves the set unchanged
    pub fn set_members(&mut self, members: Vec<AnyLicenseInfo>) -> Result<()> {
        if members.is_empty() {
            return Err(SpdxError::empty_license_set("conjunctive"));
        }
        self.members = members;
        Ok(())
    }

    #[must_use]
    pub fn members(&self) -> &[AnyLicenseInfo] {
        &self.members
    }
}

impl fmt::Display for ConjunctiveLicenseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_set(&self.members, " AND ", f)
    }
}

/// One of the members applies (`OR`). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisjunctiveLicenseSet {
    members: Vec<AnyLicenseInfo>,
}

impl DisjunctiveLicenseSet {
    pub fn new(members: Vec<AnyLicenseInfo>) -> Result<Self> {
        if members.is_empty() {
            return Err(SpdxError::empty_license_set("disjunctive"));
        }
        Ok(Self { members })
    }

    pub fn add_member(&mut self, member: AnyLicenseInfo) {
        self.members.push(member);
    }

    /// Replace all members; an empty list is rejected and leaves the set unchanged
    pub fn set_members(&mut self, members: Vec<AnyLicenseInfo>) -> Result<()> {
        if members.is_empty() {
            return Err(SpdxError::empty_license_set("disjunctive"));
        }
        self.members = members;
        Ok(())
    }

    #[must_use]
    pub fn members(&self) -> &[AnyLicenseInfo] {
        &self.members
    }
}

impl fmt::Display for DisjunctiveLicenseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_set(&self.members, " OR ", f)
    }
}

/// "This license or any later version"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrLaterOperator {
    pub license: SimpleLicensingInfo,
}

impl OrLaterOperator {
    pub const fn new(license: SimpleLicensingInfo) -> Self {
        Self { license }
    }
}

impl fmt::Display for OrLaterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.license.identifier() {
            Some(id) => write!(f, "{id}+"),
            None => write!(f, "{NULL_LICENSE_TOKEN}+"),
        }
    }
}

/// A license modified by a named exception
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WithExceptionOperator {
    pub license: Box<AnyLicenseInfo>,
    pub exception_id: String,
}

impl WithExceptionOperator {
    pub fn new(license: AnyLicenseInfo, exception_id: impl Into<String>) -> Self {
        Self {
            license: Box::new(license),
            exception_id: exception_id.into(),
        }
    }
}

impl fmt::Display for WithExceptionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} WITH {}", self.license, self.exception_id)
    }
}

/// Definition of a `LicenseRef-*` that is not on the SPDX license list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLicensingInfo {
    pub license_id: String,
    /// Verbatim license text found in the source
    pub extracted_text: String,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub see_alsos: Vec<String>,
}

impl ExtractedLicensingInfo {
    pub fn new(license_id: impl Into<String>, extracted_text: impl Into<String>) -> Self {
        Self {
            license_id: license_id.into(),
            extracted_text: extracted_text.into(),
            name: None,
            comment: None,
            see_alsos: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
