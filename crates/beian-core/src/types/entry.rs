//! Registry entries and the on-disk registry collection.
//!
//! The registry is a single JSON document with a top-level `registeredTypes`
//! list. Two entry forms are accepted on disk:
//!
//! - The full form: `{ "name": "UserAccount", "date": "...", "hash": "..." }`
//! - The legacy form: a plain name string, with no date or hash
//!
//! Legacy entries carry no fingerprint, so tamper detection degrades to
//! existence-only checking for them.

use serde::{Deserialize, Serialize};

use crate::fingerprint::fingerprint;

/// A single approved identifier in the registry.
///
/// The `hash` field holds the fingerprint of `name` itself, computed at
/// registration time. Identifiers are registered by their literal spelling,
/// not by external content.
///
/// # Examples
///
/// ```
/// use beian_core::{RegistryEntry, fingerprint};
///
/// let entry = RegistryEntry::approved("UserAccount");
/// assert_eq!(entry.name, "UserAccount");
/// assert_eq!(entry.hash.as_deref(), Some(fingerprint("UserAccount").as_str()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// The identifier spelling this entry approves.
    pub name: String,

    /// Human-readable registration timestamp.
    ///
    /// `None` for legacy name-only entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Hex fingerprint of `name` at registration time.
    ///
    /// `None` for legacy name-only entries, which disables tamper detection
    /// for this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl<'de> Deserialize<'de> for RegistryEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Full {
                name: String,
                #[serde(default)]
                date: Option<String>,
                #[serde(default)]
                hash: Option<String>,
            },
            // Legacy registries store entries as bare name strings.
            Name(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Full { name, date, hash } => Self { name, date, hash },
            Repr::Name(name) => Self {
                name,
                date: None,
                hash: None,
            },
        })
    }
}

impl RegistryEntry {
    /// Creates a freshly approved entry for the given identifier spelling.
    ///
    /// The timestamp is the local time of the call; the hash is the
    /// fingerprint of the spelling itself.
    #[must_use]
    pub fn approved(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = fingerprint(&name);
        Self {
            name,
            date: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            hash: Some(hash),
        }
    }

    /// Returns `true` if the stored hash still matches the fingerprint of
    /// the entry's name.
    ///
    /// Legacy entries with no stored hash are always considered intact
    /// (existence-only checking).
    ///
    /// # Examples
    ///
    /// ```
    /// use beian_core::RegistryEntry;
    ///
    /// let mut entry = RegistryEntry::approved("Array");
    /// assert!(entry.is_intact());
    ///
    /// entry.hash = Some("0000".to_owned());
    /// assert!(!entry.is_intact());
    /// ```
    #[must_use]
    pub fn is_intact(&self) -> bool {
        match &self.hash {
            Some(stored) => *stored == fingerprint(&self.name),
            None => true,
        }
    }
}

/// The collection of approved identifiers backing one registry file.
///
/// Lookups are linear scans: registries hold tens to low hundreds of
/// entries, so an index buys nothing over re-reading from disk each scan.
///
/// # Examples
///
/// ```
/// use beian_core::{Registry, RegistryEntry};
///
/// let mut registry = Registry::default();
/// registry.upsert(RegistryEntry::approved("UserAccount"));
/// registry.upsert(RegistryEntry::approved("UserAccount"));
/// assert_eq!(registry.len(), 1);
/// assert!(registry.find("UserAccount").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// The approved entries, in registration order.
    #[serde(rename = "registeredTypes", default)]
    pub registered_types: Vec<RegistryEntry>,
}

impl Registry {
    /// Looks up an entry by exact name match.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RegistryEntry> {
        self.registered_types.iter().find(|e| e.name == name)
    }

    /// Inserts an entry, replacing any existing entry with the same name.
    ///
    /// Names are unique within a registry; re-registration replaces, never
    /// duplicates.
    pub fn upsert(&mut self, entry: RegistryEntry) {
        self.registered_types.retain(|e| e.name != entry.name);
        self.registered_types.push(entry);
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered_types.len()
    }

    /// Returns `true` if the registry has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approved_entry_has_fingerprint_of_name() {
        let entry = RegistryEntry::approved("UserAccount");
        assert_eq!(entry.hash, Some(fingerprint("UserAccount")));
        assert!(entry.date.is_some());
        assert!(entry.is_intact());
    }

    #[test]
    fn test_tampered_hash_is_not_intact() {
        let mut entry = RegistryEntry::approved("Array");
        entry.hash = Some("deadbeef".to_owned());
        assert!(!entry.is_intact());
    }

    #[test]
    fn test_legacy_entry_is_always_intact() {
        let entry = RegistryEntry {
            name: "Array".to_owned(),
            date: None,
            hash: None,
        };
        assert!(entry.is_intact());
    }

    #[test]
    fn test_upsert_replaces_never_duplicates() {
        let mut registry = Registry::default();
        registry.upsert(RegistryEntry::approved("Array"));
        let replacement = RegistryEntry::approved("Array");
        registry.upsert(replacement.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("Array"), Some(&replacement));
    }

    #[test]
    fn test_deserialize_full_form() {
        let json = r#"{
            "registeredTypes": [
                { "name": "UserAccount", "date": "2025-01-01 10:00:00", "hash": "abc123" }
            ]
        }"#;
        let registry: Registry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.len(), 1);
        let entry = registry.find("UserAccount").unwrap();
        assert_eq!(entry.hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_deserialize_legacy_name_only_form() {
        let json = r#"{ "registeredTypes": ["UserAccount", "Array"] }"#;
        let registry: Registry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.len(), 2);
        let entry = registry.find("Array").unwrap();
        assert!(entry.hash.is_none());
        assert!(entry.is_intact());
    }

    #[test]
    fn test_deserialize_mixed_forms() {
        let json = r#"{
            "registeredTypes": [
                "Legacy",
                { "name": "Modern", "hash": "ff00" }
            ]
        }"#;
        let registry: Registry = serde_json::from_str(json).unwrap();
        assert!(registry.find("Legacy").unwrap().hash.is_none());
        assert_eq!(registry.find("Modern").unwrap().hash.as_deref(), Some("ff00"));
    }

    #[test]
    fn test_deserialize_missing_list_field_defaults_empty() {
        let registry: Registry = serde_json::from_str("{}").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut registry = Registry::default();
        registry.upsert(RegistryEntry::approved("UserAccount"));
        let json = serde_json::to_string_pretty(&registry).unwrap();
        assert!(json.contains("registeredTypes"));
        let parsed: Registry = serde_json::from_str(&json).unwrap();
        assert_eq!(registry, parsed);
    }

    #[test]
    fn test_legacy_entry_serializes_without_null_fields() {
        let registry: Registry = serde_json::from_str(r#"{ "registeredTypes": ["X"] }"#).unwrap();
        let json = serde_json::to_string(&registry).unwrap();
        assert!(!json.contains("null"));
    }
}
