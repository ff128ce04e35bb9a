//! Registry path resolution.
//!
//! Given a document's location and the configured relative registry path,
//! [`RegistryLocator`] decides which registry file governs the document.
//!
//! # Resolution Rule
//!
//! - Document inside a known workspace root: `root + configured_relative`.
//! - No enclosing workspace ("single-file mode"): the basename of the
//!   configured path, placed beside the document.
//!
//! The asymmetry is intentional. A configured path like
//! `.config/beian.json` should not force creation of a nested `.config`
//! directory next to an arbitrary loose file; the sibling fallback keeps
//! only the leaf name.

use camino::{Utf8Path, Utf8PathBuf};

/// Leaf name used when the configured relative path has no file name.
const DEFAULT_REGISTRY_FILE_NAME: &str = "beian.json";

/// Resolves the registry file that governs a document.
///
/// Resolution is pure path arithmetic: it always produces a path and never
/// checks the filesystem.
///
/// # Examples
///
/// ```
/// use beian_registry::RegistryLocator;
/// use camino::Utf8Path;
///
/// // Inside a workspace: full relative path under the root.
/// let path = RegistryLocator::resolve(
///     Utf8Path::new("/ws/src/user.ts"),
///     Some(Utf8Path::new("/ws")),
///     Utf8Path::new(".vscode/beian.json"),
/// );
/// assert_eq!(path, "/ws/.vscode/beian.json");
///
/// // Loose file: only the basename, beside the document.
/// let path = RegistryLocator::resolve(
///     Utf8Path::new("/tmp/scratch.ts"),
///     None,
///     Utf8Path::new(".vscode/beian.json"),
/// );
/// assert_eq!(path, "/tmp/beian.json");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegistryLocator;

impl RegistryLocator {
    /// Returns the absolute path of the registry for the given document.
    ///
    /// # Arguments
    ///
    /// * `document_path` - Location of the document being scanned
    /// * `workspace_root` - Enclosing workspace root, if the document
    ///   belongs to one
    /// * `configured_relative` - The configured relative registry path
    #[must_use]
    pub fn resolve(
        document_path: &Utf8Path,
        workspace_root: Option<&Utf8Path>,
        configured_relative: &Utf8Path,
    ) -> Utf8PathBuf {
        if let Some(root) = workspace_root {
            return root.join(configured_relative);
        }

        let file_name = configured_relative
            .file_name()
            .unwrap_or(DEFAULT_REGISTRY_FILE_NAME);
        document_path
            .parent()
            .unwrap_or_else(|| Utf8Path::new(""))
            .join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_under_workspace_root() {
        let path = RegistryLocator::resolve(
            Utf8Path::new("/ws/src/deep/nested/user.ts"),
            Some(Utf8Path::new("/ws")),
            Utf8Path::new(".vscode/beian.json"),
        );
        assert_eq!(path, "/ws/.vscode/beian.json");
    }

    #[test]
    fn test_resolve_single_file_mode_keeps_basename_only() {
        let path = RegistryLocator::resolve(
            Utf8Path::new("/tmp/loose/scratch.ts"),
            None,
            Utf8Path::new(".config/beian.json"),
        );
        assert_eq!(path, "/tmp/loose/beian.json");
    }

    #[test]
    fn test_resolve_single_file_mode_flat_relative_path() {
        let path = RegistryLocator::resolve(
            Utf8Path::new("/tmp/scratch.ts"),
            None,
            Utf8Path::new("beian.json"),
        );
        assert_eq!(path, "/tmp/beian.json");
    }

    #[test]
    fn test_resolve_empty_relative_falls_back_to_default_name() {
        let path = RegistryLocator::resolve(
            Utf8Path::new("/tmp/scratch.ts"),
            None,
            Utf8Path::new(""),
        );
        assert_eq!(path, "/tmp/beian.json");
    }

    #[test]
    fn test_resolve_never_checks_existence() {
        // A nonsense root still resolves; existence is not this layer's job.
        let path = RegistryLocator::resolve(
            Utf8Path::new("/does/not/exist.ts"),
            Some(Utf8Path::new("/no/such/root")),
            Utf8Path::new("beian.json"),
        );
        assert_eq!(path, "/no/such/root/beian.json");
    }
}
