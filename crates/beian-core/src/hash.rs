//! Fast hash map and hash set type aliases.
//!
//! This module provides type aliases for [`FxHashMap`] and [`FxHashSet`] from
//! the `rustc-hash` crate. The Fx hash algorithm is roughly 2x faster than the
//! standard library's default hasher for string keys, which is what this
//! codebase mostly keys on (identifier spellings, document paths).
//!
//! Denial-of-service resistance is not required here: all keys originate from
//! local files, never from untrusted network input.

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, i32> = FxHashMap::default();
        map.insert("UserAccount", 1);
        map.insert("Array", 2);
        assert_eq!(map.get("UserAccount"), Some(&1));
        assert_eq!(map.get("Missing"), None);
    }

    #[test]
    fn test_fx_hash_set_operations() {
        let mut set: FxHashSet<&str> = FxHashSet::default();
        set.insert("Array");
        assert!(set.contains("Array"));
        assert!(!set.contains("Vector"));
    }
}
