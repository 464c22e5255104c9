//! Pointers locating snippets inside files.
//!
//! A pointer names a position (byte offset or line number) and the element
//! it points into, by identifier. Ranges may be assembled piecemeal, so both
//! the reference and either end of a range are optional here; the serializer
//! rejects anything still unset.

use super::SpdxId;
use std::fmt;

const UNKNOWN_TOKEN: &str = "[UNKNOWN]";

/// Byte offset into the referenced element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteOffsetPointer {
    pub offset: i64,
    pub reference: Option<SpdxId>,
}

/// Line number in the referenced element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineCharPointer {
    pub line_number: i64,
    pub reference: Option<SpdxId>,
}

/// A single position in a referenced element.
///
/// Offsets and line numbers are not range-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SinglePointer {
    ByteOffset(ByteOffsetPointer),
    LineChar(LineCharPointer),
}

impl SinglePointer {
    /// Byte offset pointer without a reference
    #[must_use]
    pub const fn byte_offset(offset: i64) -> Self {
        Self::ByteOffset(ByteOffsetPointer {
            offset,
            reference: None,
        })
    }

    /// Line number pointer without a reference
    #[must_use]
    pub const fn line_number(line_number: i64) -> Self {
        Self::LineChar(LineCharPointer {
            line_number,
            reference: None,
        })
    }

    /// Set the referenced element
    #[must_use]
    pub fn in_element(mut self, reference: impl Into<SpdxId>) -> Self {
        self.set_reference(reference);
        self
    }

    pub fn set_reference(&mut self, reference: impl Into<SpdxId>) {
        let reference = Some(reference.into());
        match self {
            Self::ByteOffset(p) => p.reference = reference,
            Self::LineChar(p) => p.reference = reference,
        }
    }

    #[must_use]
    pub fn reference(&self) -> Option<&SpdxId> {
        match self {
            Self::ByteOffset(p) => p.reference.as_ref(),
            Self::LineChar(p) => p.reference.as_ref(),
        }
    }

    #[must_use]
    pub const fn is_byte_offset(&self) -> bool {
        matches!(self, Self::ByteOffset(_))
    }

    #[must_use]
    pub const fn is_line_number(&self) -> bool {
        matches!(self, Self::LineChar(_))
    }
}

impl fmt::Display for SinglePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteOffset(p) => write!(f, "Byte offset {}", p.offset),
            Self::LineChar(p) => write!(f, "Line number {}", p.line_number),
        }
    }
}

/// A range between two pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StartEndPointer {
    pub start: Option<SinglePointer>,
    pub end: Option<SinglePointer>,
}

impl StartEndPointer {
    /// Empty range; both ends unknown
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete range
    #[must_use]
    pub const fn between(start: SinglePointer, end: SinglePointer) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Byte range `start..=end` inside `file`
    pub fn bytes(file: impl Into<SpdxId>, start: i64, end: i64) -> Self {
        let file = file.into();
        Self::between(
            SinglePointer::byte_offset(start).in_element(file.clone()),
            SinglePointer::byte_offset(end).in_element(file),
        )
    }

    /// Line range `start..=end` inside `file`
    pub fn lines(file: impl Into<SpdxId>, start: i64, end: i64) -> Self {
        let file = file.into();
        Self::between(
            SinglePointer::line_number(start).in_element(file.clone()),
            SinglePointer::line_number(end).in_element(file),
        )
    }

    pub fn set_start(&mut self, start: SinglePointer) {
        self.start = Some(start);
    }

    pub fn set_end(&mut self, end: SinglePointer) {
        self.end = Some(end);
    }

    /// Both ends are set
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both ends are set and are byte offsets
    #[must_use]
    pub fn is_byte_range(&self) -> bool {
        self.both(SinglePointer::is_byte_offset)
    }

    /// Both ends are set and are line numbers
    #[must_use]
    pub fn is_line_range(&self) -> bool {
        self.both(SinglePointer::is_line_number)
    }

    fn both(&self, pred: impl Fn(&SinglePointer) -> bool) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => pred(start) && pred(end),
            _ => false,
        }
    }
}

impl fmt::Display for StartEndPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("From: ")?;
        match &self.start {
            Some(start) => write!(f, "{start}")?,
            None => f.write_str(UNKNOWN_TOKEN)?,
        }
        f.write_str(" To: ")?;
        match &self.end {
            Some(end) => write!(f, "{end}"),
            None => f.write_str(UNKNOWN_TOKEN),
        }
    }
}
