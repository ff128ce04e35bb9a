//! Content fingerprinting for tamper detection.
//!
//! This module provides the [`fingerprint`] function that produces a
//! deterministic SHA-256 digest of a string, hex-encoded. Registered
//! identifiers store the fingerprint of their own spelling; a registry
//! entry whose stored hash no longer matches the freshly computed
//! fingerprint is classified as tampered.
//!
//! # Stability
//!
//! The output must be identical across runs and across platforms for the
//! same input. SHA-256 guarantees this; the hex encoding is always
//! lowercase without a prefix.

use sha2::{Digest, Sha256};

/// Computes the hex-encoded SHA-256 fingerprint of a string.
///
/// Deterministic, collision-resistant, and platform-stable. This is a pure
/// function with no failure modes for well-formed string input.
///
/// # Examples
///
/// ```
/// use beian_core::fingerprint;
///
/// let a = fingerprint("UserAccount");
/// let b = fingerprint("UserAccount");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// assert_ne!(fingerprint("UserAccount"), fingerprint("useraccount"));
/// ```
#[must_use]
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("UserAccount"), fingerprint("UserAccount"));
    }

    #[test]
    fn test_fingerprint_distinguishes_inputs() {
        assert_ne!(fingerprint("UserAccount"), fingerprint("UserAccounts"));
        assert_ne!(fingerprint("Array"), fingerprint("array"));
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex() {
        let digest = fingerprint("Array");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!digest.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_known_vector() {
        // SHA-256 of the empty string is a well-known constant.
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
