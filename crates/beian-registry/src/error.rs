//! Error types for the beian-registry crate.
//!
//! This module provides the [`RegistryError`] type for failures that are
//! surfaced to the user. Registry corruption is not in this taxonomy: it is
//! recovered locally by degrading to an empty registry inside
//! [`RegistryStore::load`](crate::RegistryStore::load).

use camino::Utf8PathBuf;

/// Errors surfaced by registration operations.
///
/// # Error Recovery Strategy
///
/// - **Directory creation / write failures**: surfaced as blocking errors.
///   Registration is user-initiated; its failure must be visible and leaves
///   no partial state behind.
/// - **Invalid invocation**: the registration command was invoked without a
///   resolvable document location. Surfaced, nothing mutated.
///
/// # Examples
///
/// ```
/// use beian_registry::RegistryError;
///
/// let err = RegistryError::invalid_invocation("no active document");
/// assert!(err.to_string().contains("no active document"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to create the registry file's parent directory.
    #[error("failed to create registry directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the registry file.
    #[error("failed to write registry {path}: {source}")]
    Write {
        /// The registry file that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize registry state before writing.
    #[error("failed to serialize registry {path}: {source}")]
    Serialize {
        /// The registry file being written.
        path: Utf8PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The registration command was invoked without a resolvable document.
    #[error("registration requires a file-backed document: {0}")]
    InvalidInvocation(String),
}

impl RegistryError {
    /// Creates a new [`RegistryError::CreateDir`] error.
    #[inline]
    pub fn create_dir(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`RegistryError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`RegistryError::Serialize`] error.
    #[inline]
    pub fn serialize(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`RegistryError::InvalidInvocation`] error.
    #[inline]
    pub fn invalid_invocation(reason: impl Into<String>) -> Self {
        Self::InvalidInvocation(reason.into())
    }

    /// Returns `true` if this is a write-side failure (as opposed to a bad
    /// invocation).
    #[inline]
    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Self::CreateDir { .. } | Self::Write { .. } | Self::Serialize { .. }
        )
    }

    /// Returns the registry path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } | Self::Serialize { path, .. } => {
                Some(path)
            }
            Self::InvalidInvocation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_write_error() {
        let err = RegistryError::write(
            "/ws/.vscode/beian.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        );
        assert!(err.is_write_failure());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/ws/.vscode/beian.json"));
        assert!(err.to_string().contains("beian.json"));
    }

    #[test]
    fn test_create_dir_error() {
        let err = RegistryError::create_dir(
            "/ws/.vscode",
            io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        );
        assert!(err.is_write_failure());
        assert!(err.to_string().contains("/ws/.vscode"));
    }

    #[test]
    fn test_invalid_invocation() {
        let err = RegistryError::invalid_invocation("no active document");
        assert!(!err.is_write_failure());
        assert!(err.path().is_none());
        assert!(err.to_string().contains("file-backed document"));
    }
}
