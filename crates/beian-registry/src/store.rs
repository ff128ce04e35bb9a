//! Tolerant registry loading and read-modify-write registration.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use beian_core::{DocumentId, GuardConfig, Registry, RegistryEntry};

use crate::error::RegistryError;
use crate::locator::RegistryLocator;

/// Stateless access to on-disk registry files.
///
/// The store owns the registry file exclusively only for the duration of a
/// single [`upsert`](Self::upsert) cycle; between operations no lock is
/// held and content is re-read from disk on every use.
#[derive(Debug, Clone, Copy)]
pub struct RegistryStore;

impl RegistryStore {
    /// Loads the registry at `path`, degrading to empty on any read or
    /// parse problem.
    ///
    /// A missing file, an empty file, malformed JSON, and JSON lacking the
    /// expected `registeredTypes` list all yield an empty registry. The
    /// failure is logged at debug level and never propagated: a corrupt
    /// registry must not block scanning, it simply fails open to
    /// "everything unregistered".
    ///
    /// # Examples
    ///
    /// ```
    /// use beian_registry::RegistryStore;
    /// use camino::Utf8Path;
    ///
    /// let registry = RegistryStore::load(Utf8Path::new("/no/such/file.json"));
    /// assert!(registry.is_empty());
    /// ```
    #[must_use]
    pub fn load(path: &Utf8Path) -> Registry {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                debug!(%path, %error, "registry not readable, using empty registry");
                return Registry::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(registry) => registry,
            Err(error) => {
                debug!(%path, %error, "registry unparseable, using empty registry");
                Registry::default()
            }
        }
    }

    /// Registers an identifier spelling in the registry at `path`.
    ///
    /// Performs one read-modify-write cycle: ensure the parent directory
    /// exists, load the current registry (with the same degrade-to-empty
    /// rule as [`load`](Self::load)), replace any entry with the same name,
    /// append the fresh entry, and write the registry back with stable
    /// pretty formatting.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if directory creation, serialization, or
    /// the file write fails. Unlike loads, these failures are surfaced:
    /// registration is user-initiated and must be visible when it fails. No
    /// partial state is left behind on error.
    pub fn upsert(path: &Utf8Path, name: &str) -> Result<RegistryEntry, RegistryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| RegistryError::create_dir(parent, source))?;
            }
        }

        let mut registry = Self::load(path);
        let entry = RegistryEntry::approved(name);
        registry.upsert(entry.clone());

        let json = serde_json::to_string_pretty(&registry)
            .map_err(|source| RegistryError::serialize(path, source))?;
        std::fs::write(path, json).map_err(|source| RegistryError::write(path, source))?;

        debug!(%path, name, "registered identifier");
        Ok(entry)
    }

    /// Registers an identifier on behalf of a document.
    ///
    /// Resolves the governing registry via [`RegistryLocator`], then
    /// performs [`upsert`](Self::upsert). Returns the written entry together
    /// with the resolved registry path so callers can trigger re-scans.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInvocation`] if the document is not
    /// file-backed (nothing is mutated), or any error from
    /// [`upsert`](Self::upsert).
    pub fn register_for_document(
        document: &DocumentId,
        workspace_root: Option<&Utf8Path>,
        config: &GuardConfig,
        name: &str,
    ) -> Result<(RegistryEntry, Utf8PathBuf), RegistryError> {
        let Some(document_path) = document.path() else {
            return Err(RegistryError::invalid_invocation(format!(
                "cannot register '{name}' from {document}"
            )));
        };

        let registry_path =
            RegistryLocator::resolve(document_path, workspace_root, &config.config_file_path);
        let entry = Self::upsert(&registry_path, name)?;
        Ok((entry, registry_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beian_core::fingerprint;
    use camino::Utf8PathBuf;

    fn temp_registry_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let registry = RegistryStore::load(Utf8Path::new("/no/such/registry.json"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        std::fs::write(&path, "").unwrap();
        assert!(RegistryStore::load(&path).is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        std::fs::write(&path, "{ not json !!!").unwrap();
        assert!(RegistryStore::load(&path).is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        std::fs::write(&path, r#"{ "somethingElse": 42 }"#).unwrap();
        assert!(RegistryStore::load(&path).is_empty());
    }

    #[test]
    fn test_upsert_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "nested/.vscode/beian.json");
        let entry = RegistryStore::upsert(&path, "UserAccount").unwrap();

        assert_eq!(entry.name, "UserAccount");
        assert_eq!(entry.hash, Some(fingerprint("UserAccount")));

        let reloaded = RegistryStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.find("UserAccount").is_some());
    }

    #[test]
    fn test_upsert_is_idempotent_per_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        RegistryStore::upsert(&path, "Array").unwrap();
        RegistryStore::upsert(&path, "Array").unwrap();

        let reloaded = RegistryStore::load(&path);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_upsert_repairs_tampered_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        std::fs::write(
            &path,
            r#"{ "registeredTypes": [ { "name": "Array", "hash": "wrong" } ] }"#,
        )
        .unwrap();

        RegistryStore::upsert(&path, "Array").unwrap();
        let reloaded = RegistryStore::load(&path);
        let entry = reloaded.find("Array").unwrap();
        assert!(entry.is_intact());
    }

    #[test]
    fn test_upsert_preserves_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        RegistryStore::upsert(&path, "First").unwrap();
        RegistryStore::upsert(&path, "Second").unwrap();

        let reloaded = RegistryStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.find("First").is_some());
        assert!(reloaded.find("Second").is_some());
    }

    #[test]
    fn test_upsert_recovers_corrupt_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_registry_path(&dir, "beian.json");
        std::fs::write(&path, "garbage").unwrap();

        RegistryStore::upsert(&path, "Fresh").unwrap();
        let reloaded = RegistryStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.find("Fresh").is_some());
    }

    #[test]
    fn test_register_for_document_untitled_is_invalid() {
        let document = DocumentId::Untitled("untitled-1".to_owned());
        let err = RegistryStore::register_for_document(
            &document,
            None,
            &GuardConfig::default(),
            "UserAccount",
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInvocation(_)));
    }

    #[test]
    fn test_register_for_document_single_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = temp_registry_path(&dir, "scratch.ts");
        std::fs::write(&doc_path, "class UserAccount {}").unwrap();

        let document = DocumentId::File(doc_path);
        let (entry, registry_path) = RegistryStore::register_for_document(
            &document,
            None,
            &GuardConfig::default(),
            "UserAccount",
        )
        .unwrap();

        assert_eq!(entry.name, "UserAccount");
        // Sibling fallback: basename only, no nested .vscode directory.
        assert_eq!(registry_path.file_name(), Some("beian.json"));
        assert_eq!(
            registry_path.parent().unwrap().as_str(),
            dir.path().to_str().unwrap()
        );
        assert!(registry_path.exists());
    }

    #[test]
    fn test_register_for_document_workspace_mode() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let doc_path = root.join("src/user.ts");

        let document = DocumentId::File(doc_path);
        let (_, registry_path) = RegistryStore::register_for_document(
            &document,
            Some(&root),
            &GuardConfig::default(),
            "UserAccount",
        )
        .unwrap();

        assert_eq!(registry_path, root.join(".vscode/beian.json"));
        assert!(registry_path.exists());
    }
}
