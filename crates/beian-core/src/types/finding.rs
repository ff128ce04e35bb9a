//! Compliance findings and source spans.
//!
//! A [`Finding`] marks one occurrence of a non-compliant identifier in a
//! document. Findings are produced fresh on every scan pass and never
//! mutated; the full set for a document replaces the previous set
//! atomically.

use serde::{Deserialize, Serialize};

/// A half-open byte range within a document's text.
///
/// # Field Conventions
///
/// - `start` is the byte offset of the first character of the identifier
/// - `end` is one past the last byte of the identifier
///
/// # Examples
///
/// ```
/// use beian_core::SourceSpan;
///
/// let span = SourceSpan::new(6, 17);
/// assert_eq!(span.len(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the span start (inclusive).
    pub start: usize,

    /// Byte offset of the span end (exclusive).
    pub end: usize,
}

impl SourceSpan {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the span length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Classification of a compliance finding.
///
/// # Examples
///
/// ```
/// use beian_core::FindingKind;
///
/// assert_eq!(FindingKind::Unregistered.code(), "not-registered");
/// assert_eq!(FindingKind::Tampered.code(), "tampered");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FindingKind {
    /// No registry entry exists for the identifier's spelling.
    Unregistered,

    /// An entry exists, but its stored hash no longer matches the
    /// fingerprint of the spelling.
    Tampered,
}

impl FindingKind {
    /// Returns the machine-readable classification code for this kind.
    ///
    /// These codes separate the two outcomes for downstream filtering and
    /// are stable across releases.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unregistered => "not-registered",
            Self::Tampered => "tampered",
        }
    }

    /// Returns a human-readable label for this kind.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unregistered => "Unregistered",
            Self::Tampered => "Tampered",
        }
    }
}

/// One occurrence of a non-compliant identifier.
///
/// # Examples
///
/// ```
/// use beian_core::{Finding, FindingKind, SourceSpan};
///
/// let finding = Finding {
///     identifier: "UserAccount".to_owned(),
///     span: SourceSpan::new(6, 17),
///     kind: FindingKind::Unregistered,
///     message: "Type 'UserAccount' is not registered".to_owned(),
///     source: "beian".to_owned(),
/// };
/// assert_eq!(finding.code(), "not-registered");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The identifier spelling at the flagged location.
    pub identifier: String,

    /// Byte span of the occurrence in the document text.
    pub span: SourceSpan,

    /// Classification of the finding.
    pub kind: FindingKind,

    /// Rendered user-facing message (template with `{typeName}` applied).
    pub message: String,

    /// Label identifying the producer of this finding.
    ///
    /// Downstream consumers filter on this to decide which findings the
    /// registration action applies to.
    pub source: String,
}

impl Finding {
    /// Returns the machine-readable classification code.
    #[inline]
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = SourceSpan::new(6, 17);
        assert_eq!(span.len(), 11);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_empty() {
        assert!(SourceSpan::new(4, 4).is_empty());
        assert_eq!(SourceSpan::default().len(), 0);
    }

    #[test]
    fn test_kind_codes_are_distinct() {
        assert_ne!(FindingKind::Unregistered.code(), FindingKind::Tampered.code());
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&FindingKind::Unregistered).unwrap(),
            r#""unregistered""#
        );
        assert_eq!(
            serde_json::to_string(&FindingKind::Tampered).unwrap(),
            r#""tampered""#
        );
    }

    #[test]
    fn test_finding_serialization_round_trip() {
        let finding = Finding {
            identifier: "Array".to_owned(),
            span: SourceSpan::new(0, 5),
            kind: FindingKind::Tampered,
            message: "Type 'Array' registration hash mismatch".to_owned(),
            source: "beian".to_owned(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        let parsed: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(finding, parsed);
    }
}
