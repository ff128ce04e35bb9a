//! Event types flowing through the coordinator.
//!
//! Three layers of events exist:
//!
//! - [`FileEvent`]: a raw debounced filesystem change from the watcher
//! - [`GuardEvent`]: a host-level event on one of the named channels
//!   (document-changed, document-saved, document-opened,
//!   document-activated, config-changed, action-intercepted)
//! - [`ScanRequest`]: what the coordinator emits for the scan loop to
//!   execute
//!
//! The core logic never depends on the host's event-delivery mechanism;
//! anything that can produce [`GuardEvent`]s can drive the coordinator.

use std::time::Instant;

use camino::Utf8PathBuf;

use beian_core::DocumentId;

/// A debounced file change with a UTF-8 path guarantee.
///
/// Create, modify, and delete are deliberately not distinguished; any of
/// them invalidates the current findings for the affected document.
///
/// # Examples
///
/// ```
/// use beian_watcher::FileEvent;
/// use camino::Utf8PathBuf;
///
/// let event = FileEvent::new(Utf8PathBuf::from("src/user.ts"));
/// assert_eq!(event.path.extension(), Some("ts"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Absolute path of the file that changed.
    pub path: Utf8PathBuf,

    /// Monotonic timestamp of event receipt.
    pub timestamp: Instant,
}

impl FileEvent {
    /// Creates a new file event stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf) -> Self {
        Self {
            path,
            timestamp: Instant::now(),
        }
    }
}

/// A host-level event on one of the named guard channels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GuardEvent {
    /// The document's text changed; re-scan after the debounce window.
    DocumentChanged(DocumentId),

    /// The document was saved; re-scan immediately.
    DocumentSaved(DocumentId),

    /// The document was opened; scan immediately.
    DocumentOpened(DocumentId),

    /// The document became the active one; scan immediately.
    DocumentActivated(DocumentId),

    /// Settings or the registry changed; everything must be re-scanned
    /// immediately so no scan runs on stale settings.
    ConfigChanged,

    /// A host action was intercepted; all documents must be verified
    /// before the gate can answer. Carries the action's display name.
    ActionIntercepted(String),
}

/// A scan the coordinator has decided should happen.
///
/// Requests are consumed sequentially by a single scan loop, which is what
/// guarantees per-document scan exclusivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    /// Scan one document.
    Document(DocumentId),

    /// Re-scan every known document (config/registry change, gate check).
    AllDocuments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_event_new() {
        let event = FileEvent::new(Utf8PathBuf::from("src/a.ts"));
        assert_eq!(event.path.as_str(), "src/a.ts");
    }

    #[test]
    fn test_scan_request_equality() {
        let id = DocumentId::File(Utf8PathBuf::from("a.ts"));
        assert_eq!(ScanRequest::Document(id.clone()), ScanRequest::Document(id));
        assert_ne!(
            ScanRequest::AllDocuments,
            ScanRequest::Document(DocumentId::Untitled("x".to_owned()))
        );
    }
}
