//! Hashable ordered mapping
//!
//! [`HashableMap`] is an insertion-ordered map whose identity is its content
//! fingerprint. Equality compares fingerprints, not entries.
//!
//! # Equality Is Fingerprint Equality
//!
//! - Two maps with the same entries in the same order are equal.
//! - The same entries inserted in a different order are *not* guaranteed to
//!   be equal; the fingerprint is order-sensitive.
//! - Different contents may collide. Use `==` for cache bucketing, never
//!   for correctness-critical comparisons.
//!
//! The fingerprint is recomputed on every request and never stored, so a
//! mutated map never reports a stale value. To use a map as a lookup key,
//! snapshot [`HashableMap::fingerprint`] and key on the [`Fingerprint`].

use compact_str::CompactString;

use crate::error::{FingerprintError, FingerprintResult};
use crate::fields::{Fields, FieldsExt};
use crate::hash::{Combinator, Fingerprint};
use crate::value::Value;

// =============================================================================
// HashableMap
// =============================================================================

/// Borrowing iterator over a [`HashableMap`]'s entries
pub type Iter<'a> = std::iter::Map<
    std::slice::Iter<'a, (CompactString, Value)>,
    fn(&'a (CompactString, Value)) -> (&'a str, &'a Value),
>;

fn entry_ref((k, v): &(CompactString, Value)) -> (&str, &Value) {
    (k.as_str(), v)
}

/// Insertion-ordered mapping hashed by content
#[derive(Debug, Clone, Default)]
pub struct HashableMap {
    fields: Fields,
}

impl HashableMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get_entry(key)
    }

    /// Get a mutable value by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_entry_mut(key)
    }

    /// Insert a value. An existing key is overwritten in place.
    pub fn insert(
        &mut self,
        key: impl Into<CompactString>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.fields.set_entry(key, value.into())
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove_entry(key)
    }

    /// Check if the key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.has_entry(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter<'a>(&'a self) -> Iter<'a> {
        let entry: fn(&'a (CompactString, Value)) -> (&'a str, &'a Value) = entry_ref;
        self.fields.iter().map(entry)
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    // -------------------------------------------------------------------------
    // Named field access
    // -------------------------------------------------------------------------

    /// Get a field by name.
    ///
    /// Same lookup as [`get`](Self::get), but absence is an error.
    pub fn field(&self, name: &str) -> FingerprintResult<&Value> {
        self.get(name)
            .ok_or_else(|| FingerprintError::field_not_found(name))
    }

    /// Get a field by name mutably
    pub fn field_mut(&mut self, name: &str) -> FingerprintResult<&mut Value> {
        self.get_mut(name)
            .ok_or_else(|| FingerprintError::field_not_found(name))
    }

    /// Set a field by name
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.insert(name, value);
    }

    /// Remove a field by name, failing if it is absent
    pub fn remove_field(&mut self, name: &str) -> FingerprintResult<Value> {
        self.remove(name)
            .ok_or_else(|| FingerprintError::field_not_found(name))
    }

    // -------------------------------------------------------------------------
    // Fingerprint
    // -------------------------------------------------------------------------

    /// Content fingerprint: all keys in order, then all values in order.
    pub fn fingerprint(&self) -> FingerprintResult<Fingerprint> {
        fingerprint_fields(&self.fields)
    }
}

/// Keys first, then values, each in insertion order.
fn fingerprint_fields(fields: &Fields) -> FingerprintResult<Fingerprint> {
    let keys = fields
        .iter()
        .fold(Combinator::new(), |acc, (k, _)| acc.update_str(k));
    keys.update_all(fields.iter().map(|(_, v)| v))
        .map(Combinator::finish)
}

impl PartialEq for HashableMap {
    fn eq(&self, other: &Self) -> bool {
        match (self.fingerprint(), other.fingerprint()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashableMap
where
    K: Into<CompactString>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<'a> IntoIterator for &'a HashableMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for HashableMap {
    type Item = (CompactString, Value);
    type IntoIter = std::vec::IntoIter<(CompactString, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::combine;

    fn sample() -> HashableMap {
        [("title", Value::from("Hello")), ("lang", Value::from("en"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut map = sample();
        map.insert("title", "Bye");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["title", "lang"]);
        assert_eq!(map.get("title"), Some(&Value::from("Bye")));
    }

    #[test]
    fn test_borrowed_for_loop_in_insertion_order() {
        let map = sample();
        let mut seen = Vec::new();
        for (key, value) in &map {
            seen.push((key, value.as_str()));
        }
        assert_eq!(seen, vec![("title", Some("Hello")), ("lang", Some("en"))]);
    }

    #[test]
    fn test_missing_field_same_error_by_name_and_remove() {
        let mut map = sample();
        let err = FingerprintError::field_not_found("date");
        assert_eq!(map.field("date"), Err(err.clone()));
        assert_eq!(map.remove_field("date"), Err(err));
        assert!(map.get("date").is_none());
    }

    #[test]
    fn test_fingerprint_is_keys_then_values() {
        let map = sample();
        let expected = combine(&[
            Value::from("title"),
            Value::from("lang"),
            Value::from("Hello"),
            Value::from("en"),
        ])
        .unwrap();
        assert_eq!(map.fingerprint().unwrap(), expected);
    }

    #[test]
    fn test_equal_when_built_in_same_order() {
        assert_eq!(sample(), sample());
    }

    #[test]
    fn test_reordered_insertion_not_guaranteed_equal() {
        let reordered: HashableMap = [
            ("lang", Value::from("en")),
            ("title", Value::from("Hello")),
        ]
        .into_iter()
        .collect();
        // Order is part of the content; these fingerprints differ.
        assert_ne!(sample(), reordered);
    }

    #[test]
    fn test_nested_leaf_change_propagates() {
        let mut inner = HashableMap::new();
        inner.insert("leaf", 1);
        let mut outer = HashableMap::new();
        outer.insert("inner", inner);

        let before = outer.fingerprint().unwrap();
        if let Some(Value::Map(inner)) = outer.get_mut("inner") {
            inner.insert("leaf", 2);
        }
        let after = outer.fingerprint().unwrap();
        assert_ne!(before, after);

        if let Some(Value::Map(inner)) = outer.get_mut("inner") {
            inner.insert("leaf", 1);
        }
        assert_eq!(outer.fingerprint().unwrap(), before);
    }

    #[test]
    fn test_unfingerprintable_map_is_never_equal() {
        let mut map = HashableMap::new();
        map.insert("tags", Value::list(["a"]));
        assert!(map.fingerprint().is_err());
        assert_ne!(map, map.clone());
    }
}
