//! Configuration structures for the beian-guard tool.
//!
//! This module provides configuration types for all components of the
//! application:
//!
//! - [`GuardConfig`] - Compliance settings (registry path, message templates,
//!   ignore list, identifier pattern)
//! - [`ScanConfig`] - Directory walking settings (root, extensions, skips)
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with sensible values and
//! deserialize field-wise with `#[serde(default)]`, so a partial config file
//! never fails to load. Algorithmic code never reads settings ambiently; a
//! configuration value is always passed in explicitly.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which identifier spellings the scanner considers candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IdentifierPattern {
    /// Only capitalized barewords: `[A-Z][a-zA-Z0-9_]*`.
    ///
    /// The default; matches the convention that registered entries are
    /// type names.
    #[default]
    CapitalizedOnly,

    /// Any bareword: `[a-zA-Z_][a-zA-Z0-9_]*`.
    AnyBareword,
}

/// Compliance-gating settings.
///
/// # Examples
///
/// ```
/// use beian_core::GuardConfig;
///
/// let config = GuardConfig::default();
/// assert_eq!(config.config_file_path, ".vscode/beian.json");
/// assert_eq!(config.diagnostic_source, "beian");
/// assert_eq!(config.not_registered_message("Foo"), "Type 'Foo' is not registered");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardConfig {
    /// Relative path of the registry file, resolved against the workspace
    /// root (or, in single-file mode, its basename beside the document).
    pub config_file_path: Utf8PathBuf,

    /// Message template for unregistered identifiers.
    ///
    /// `{typeName}` is replaced with the identifier spelling.
    pub error_not_registered: String,

    /// Message template for tampered registry entries.
    ///
    /// `{typeName}` is replaced with the identifier spelling.
    pub error_tampered: String,

    /// Identifier spellings exempt from checking.
    pub ignore_keywords: Vec<String>,

    /// Label attached to findings produced by this tool.
    pub diagnostic_source: String,

    /// Message template shown when a blocked action is stopped.
    ///
    /// `{actionName}` is replaced with the name of the intercepted action.
    pub stop_task_message: String,

    /// Which identifier spellings are scanned.
    pub identifier_pattern: IdentifierPattern,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            config_file_path: Utf8PathBuf::from(".vscode/beian.json"),
            error_not_registered: "Type '{typeName}' is not registered".to_owned(),
            error_tampered: "Type '{typeName}' registration hash mismatch".to_owned(),
            ignore_keywords: Vec::new(),
            diagnostic_source: "beian".to_owned(),
            stop_task_message: "{actionName} blocked: unregistered or tampered types present"
                .to_owned(),
            identifier_pattern: IdentifierPattern::CapitalizedOnly,
        }
    }
}

impl GuardConfig {
    /// Renders the unregistered-identifier message for the given spelling.
    #[must_use]
    pub fn not_registered_message(&self, type_name: &str) -> String {
        self.error_not_registered.replace("{typeName}", type_name)
    }

    /// Renders the tampered-entry message for the given spelling.
    #[must_use]
    pub fn tampered_message(&self, type_name: &str) -> String {
        self.error_tampered.replace("{typeName}", type_name)
    }

    /// Renders the blocked-action message for the given action name.
    #[must_use]
    pub fn stop_message(&self, action_name: &str) -> String {
        self.stop_task_message.replace("{actionName}", action_name)
    }

    /// Returns `true` if the given spelling is exempt from checking.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_keywords.iter().any(|k| k == name)
    }
}

/// Configuration for the directory walker.
///
/// Controls which files the CLI treats as the set of documents to verify.
///
/// # Examples
///
/// ```
/// use beian_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.file_extensions.contains(&".ts".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root_path: Utf8PathBuf,

    /// File extensions to scan (e.g., `.ts`, `.tsx`).
    pub file_extensions: Vec<String>,

    /// Directory names to skip during scanning.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: Utf8PathBuf::new(),
            file_extensions: vec![".ts".to_owned(), ".tsx".to_owned()],
            skip_dirs: vec![
                "node_modules".to_owned(),
                "dist".to_owned(),
                "build".to_owned(),
                "coverage".to_owned(),
            ],
            follow_links: false,
        }
    }
}

/// Configuration for the change coordinator and file watcher.
///
/// # Examples
///
/// ```
/// use beian_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 300);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    ///
    /// A new edit within this window supersedes the pending re-scan.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            recursive: true,
        }
    }
}

/// Root configuration for the beian-guard tool.
///
/// # Examples
///
/// ```
/// use beian_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("configFilePath"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compliance-gating settings.
    pub guard: GuardConfig,

    /// Directory walker settings.
    pub scan: ScanConfig,

    /// Watcher and coordinator settings.
    pub watch: WatchConfig,
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// Missing fields fall back to defaults field-wise; a missing file is
    /// an error here (callers that want optional config check existence
    /// first).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Parse`]
    /// if it is not valid JSON.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
