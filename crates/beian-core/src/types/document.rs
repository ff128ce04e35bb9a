//! Document identity and scan targets.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Identity of a document under scan.
///
/// Only file-backed documents are scanned; untitled buffers are skipped
/// entirely by the scan engine.
///
/// # Examples
///
/// ```
/// use beian_core::DocumentId;
/// use camino::Utf8PathBuf;
///
/// let file = DocumentId::File(Utf8PathBuf::from("src/user.ts"));
/// assert!(file.is_file());
///
/// let scratch = DocumentId::Untitled("untitled-1".to_owned());
/// assert!(!scratch.is_file());
/// assert!(scratch.path().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentId {
    /// A document backed by a real file on disk.
    File(Utf8PathBuf),

    /// An in-memory document with no backing file.
    Untitled(String),
}

impl DocumentId {
    /// Returns `true` if the document is backed by a real file.
    #[inline]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the backing file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Untitled(_) => None,
        }
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{path}"),
            Self::Untitled(name) => write!(f, "untitled:{name}"),
        }
    }
}

impl From<Utf8PathBuf> for DocumentId {
    fn from(path: Utf8PathBuf) -> Self {
        Self::File(path)
    }
}

/// Everything one scan invocation needs, bundled.
///
/// Ephemeral: constructed per scan, never persisted. The registry path is
/// resolved ahead of time so the engine can apply self-reference exclusion
/// without touching the locator.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    /// Identity of the document being scanned.
    pub id: DocumentId,

    /// Full document text at scan time.
    pub text: String,

    /// Absolute path of the registry that governs this document.
    pub registry_path: Utf8PathBuf,
}

impl ScanTarget {
    /// Creates a scan target for a file-backed document.
    #[must_use]
    pub fn new(
        id: impl Into<DocumentId>,
        text: impl Into<String>,
        registry_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            registry_path: registry_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_file() {
        let id = DocumentId::File(Utf8PathBuf::from("src/app.ts"));
        assert!(id.is_file());
        assert_eq!(id.path().map(Utf8Path::as_str), Some("src/app.ts"));
        assert_eq!(id.to_string(), "src/app.ts");
    }

    #[test]
    fn test_document_id_untitled() {
        let id = DocumentId::Untitled("untitled-1".to_owned());
        assert!(!id.is_file());
        assert!(id.path().is_none());
        assert_eq!(id.to_string(), "untitled:untitled-1");
    }

    #[test]
    fn test_scan_target_new() {
        let target = ScanTarget::new(
            Utf8PathBuf::from("src/app.ts"),
            "class Foo {}",
            Utf8PathBuf::from("/ws/.vscode/beian.json"),
        );
        assert!(target.id.is_file());
        assert_eq!(target.text, "class Foo {}");
        assert_eq!(target.registry_path, "/ws/.vscode/beian.json");
    }
}
