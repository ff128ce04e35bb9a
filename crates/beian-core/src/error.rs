//! Error types for the beian-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related
//! errors that can occur across the workspace. Registry corruption is
//! deliberately NOT represented here: a corrupt registry degrades to an
//! empty one inside the store and never surfaces as an error.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use beian_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingFile(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("missing configuration file: {0}")]
    MissingFile(Utf8PathBuf),

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_display() {
        let error = ConfigError::MissingFile(Utf8PathBuf::from("/missing/beian-guard.json"));
        assert!(error.to_string().contains("/missing/beian-guard.json"));
    }

    #[test]
    fn test_load_missing_file_variant() {
        let err = crate::Config::load(camino::Utf8Path::new("/no/such/beian-guard.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_parse_error_from_serde() {
        let parse_err = serde_json::from_str::<crate::Config>("not json").unwrap_err();
        let error = ConfigError::from(parse_err);
        assert!(error.to_string().contains("parse"));
    }
}
