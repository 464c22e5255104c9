//! Integration tests for the license expression algebra
//!
//! Covers the diagnostic rendering (`Display`) and the wire rendering
//! (`to_expression`) of every node kind, plus set mutation rules.

use spdx_writer::error::{ConstructionErrorKind, SpdxError};
use spdx_writer::model::{
    AnyLicenseInfo, ConjunctiveLicenseSet, DisjunctiveLicenseSet, OrLaterOperator,
    SimpleLicensingInfo, SinglePointer, StartEndPointer,
};

fn lic(id: &str) -> AnyLicenseInfo {
    AnyLicenseInfo::license(id)
}

// ============================================================================
// Leaf Rendering
// ============================================================================

mod leaf_tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(AnyLicenseInfo::None.to_string(), "NONE");
        assert_eq!(AnyLicenseInfo::NoAssertion.to_string(), "NOASSERTION");
        assert_eq!(AnyLicenseInfo::None.to_expression().unwrap(), "NONE");
        assert_eq!(AnyLicenseInfo::NoAssertion.to_expression().unwrap(), "NOASSERTION");
        assert!(AnyLicenseInfo::None.is_sentinel());
        assert!(!lic("MIT").is_sentinel());
    }

    #[test]
    fn test_name_and_comment_take_precedence() {
        let leaf = SimpleLicensingInfo::new("LicenseRef-XXX")
            .with_name("Some name")
            .with_comment("Just a test");
        let license = AnyLicenseInfo::from(leaf);

        assert_eq!(license.to_string(), "Some name (LicenseRef-XXX), Just a test");
        assert_eq!(license.to_expression().unwrap(), "LicenseRef-XXX");
    }

    #[test]
    fn test_name_without_comment() {
        let leaf = SimpleLicensingInfo::new("LicenseRef-XXX").with_name("Some name");
        assert_eq!(leaf.to_string(), "Some name (LicenseRef-XXX)");
    }

    #[test]
    fn test_bare_identifier() {
        assert_eq!(lic("CPL-1.0").to_string(), "CPL-1.0");
        assert_eq!(lic("CPL-1.0").to_expression().unwrap(), "CPL-1.0");
    }

    #[test]
    fn test_empty_leaf() {
        let license = AnyLicenseInfo::from(SimpleLicensingInfo::unset());
        assert_eq!(license.to_string(), "NULL LICENSE");
        assert!(license.to_expression().is_err());
    }

    #[test]
    fn test_license_ref_detection() {
        assert!(SimpleLicensingInfo::new("LicenseRef-1").is_license_ref());
        assert!(!SimpleLicensingInfo::new("MIT").is_license_ref());
        assert!(!SimpleLicensingInfo::unset().is_license_ref());
    }
}

// ============================================================================
// Operators
// ============================================================================

mod operator_tests {
    use super::*;

    #[test]
    fn test_or_later() {
        let license = AnyLicenseInfo::or_later("GPL-2.0");
        assert_eq!(license.to_string(), "GPL-2.0+");
        assert_eq!(license.to_expression().unwrap(), "GPL-2.0+");
    }

    #[test]
    fn test_or_later_unset_leaf() {
        let license = AnyLicenseInfo::from(OrLaterOperator::new(SimpleLicensingInfo::unset()));
        assert!(license.to_expression().is_err());
    }

    #[test]
    fn test_with_exception() {
        let license = AnyLicenseInfo::with_exception(
            AnyLicenseInfo::or_later("GPL-2.0"),
            "Classpath-exception-2.0",
        );
        assert_eq!(license.to_string(), "GPL-2.0+ WITH Classpath-exception-2.0");
        assert_eq!(
            license.to_expression().unwrap(),
            "GPL-2.0+ WITH Classpath-exception-2.0"
        );
        assert_eq!(license.license_ids(), vec!["GPL-2.0"]);
        assert_eq!(license.exception_ids(), vec!["Classpath-exception-2.0"]);
    }

    #[test]
    fn test_nested_sets() {
        let license = AnyLicenseInfo::or(vec![
            lic("LGPL-2.0-only"),
            AnyLicenseInfo::and(vec![lic("MIT"), lic("LicenseRef-1")]).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            license.to_expression().unwrap(),
            "(LGPL-2.0-only OR (MIT AND LicenseRef-1))"
        );
        assert_eq!(license.license_ids(), vec!["LGPL-2.0-only", "MIT", "LicenseRef-1"]);
    }

    #[test]
    fn test_unset_leaf_inside_set_fails() {
        let license = AnyLicenseInfo::and(vec![
            lic("MIT"),
            AnyLicenseInfo::from(SimpleLicensingInfo::unset()),
        ])
        .unwrap();
        assert_eq!(license.to_string(), "(MIT AND NULL LICENSE)");
        assert!(license.to_expression().is_err());
    }
}

// ============================================================================
// Sets
// ============================================================================

mod set_tests {
    use super::*;

    #[test]
    fn test_conjunctive_append() {
        let mut set = ConjunctiveLicenseSet::new(vec![lic("MIT"), lic("ISC")]).unwrap();
        assert_eq!(set.to_string(), "(MIT AND ISC)");

        set.add_member(lic("CPL-1.0"));
        assert_eq!(set.to_string(), "(MIT AND ISC AND CPL-1.0)");
        assert_eq!(
            AnyLicenseInfo::from(set).to_expression().unwrap(),
            "(MIT AND ISC AND CPL-1.0)"
        );
    }

    #[test]
    fn test_disjunctive_set_members() {
        let mut set = DisjunctiveLicenseSet::new(vec![lic("Apache-2.0")]).unwrap();
        set.set_members(vec![lic("MIT"), lic("ISC")]).unwrap();
        assert_eq!(set.to_string(), "(MIT OR ISC)");
        assert_eq!(set.members().len(), 2);
    }

    #[test]
    fn test_single_member_set_keeps_parentheses() {
        let license = AnyLicenseInfo::and(vec![lic("MIT")]).unwrap();
        assert_eq!(license.to_expression().unwrap(), "(MIT)");
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let license = AnyLicenseInfo::or(vec![lic("MIT"), lic("ISC"), lic("MIT")]).unwrap();
        assert_eq!(license.to_expression().unwrap(), "(MIT OR ISC OR MIT)");
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = AnyLicenseInfo::and(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            SpdxError::Construction {
                source: ConstructionErrorKind::EmptyLicenseSet { kind: "conjunctive" },
                ..
            }
        ));
        assert!(AnyLicenseInfo::or(Vec::new()).is_err());
    }

    #[test]
    fn test_set_members_empty_leaves_set_unchanged() {
        let mut set = DisjunctiveLicenseSet::new(vec![lic("MIT"), lic("ISC")]).unwrap();
        assert!(set.set_members(Vec::new()).is_err());
        assert_eq!(set.to_string(), "(MIT OR ISC)");
    }

    #[test]
    fn test_structural_equality_is_order_sensitive() {
        let a = AnyLicenseInfo::and(vec![lic("MIT"), lic("ISC")]).unwrap();
        let b = AnyLicenseInfo::and(vec![lic("ISC"), lic("MIT")]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}

// ============================================================================
// Pointers
// ============================================================================

mod pointer_tests {
    use super::*;

    #[test]
    fn test_single_pointer_rendering() {
        assert_eq!(SinglePointer::byte_offset(310).to_string(), "Byte offset 310");
        assert_eq!(SinglePointer::line_number(5).to_string(), "Line number 5");
    }

    #[test]
    fn test_range_rendering() {
        let range = StartEndPointer::between(
            SinglePointer::byte_offset(310),
            SinglePointer::byte_offset(420),
        );
        assert_eq!(range.to_string(), "From: Byte offset 310 To: Byte offset 420");
        assert!(range.is_complete());
    }

    #[test]
    fn test_partial_range_rendering() {
        let mut range = StartEndPointer::new();
        assert_eq!(range.to_string(), "From: [UNKNOWN] To: [UNKNOWN]");

        range.set_start(SinglePointer::line_number(5));
        assert_eq!(range.to_string(), "From: Line number 5 To: [UNKNOWN]");
        assert!(!range.is_complete());
    }

    #[test]
    fn test_range_kind() {
        let bytes = StartEndPointer::bytes("SPDXRef-File", 1, 2);
        assert!(bytes.is_byte_range());
        assert!(!bytes.is_line_range());

        let lines = StartEndPointer::lines("SPDXRef-File", 1, 2);
        assert!(lines.is_line_range());
    }
}
