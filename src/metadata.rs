//! Nested metadata mapping for document front-matter
//!
//! [`Metadata`] is a [`HashableMap`] where assignment understands dotted
//! paths:
//!
//! ```
//! use tola_fingerprint::{Metadata, Value};
//!
//! let mut meta = Metadata::new();
//! meta.set("author.name", "Ada").unwrap();
//!
//! let author = meta.get("author").and_then(Value::as_meta).unwrap();
//! assert_eq!(author.get("name"), Some(&Value::from("Ada")));
//! ```
//!
//! Only assignment is dotted. `get("author.name")` is a literal lookup and
//! finds nothing; use [`Metadata::lookup_path`] for read-through.

use compact_str::CompactString;
use tracing::trace;

use crate::error::{FingerprintError, FingerprintResult};
use crate::hash::Fingerprint;
use crate::map::HashableMap;
use crate::value::Value;

// =============================================================================
// Metadata
// =============================================================================

/// Hierarchical key/value data with dotted-path assignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    map: HashableMap,
}

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata by [`set`](Self::set)ting every pair in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> FingerprintResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut meta = Self::new();
        meta.update(pairs)?;
        Ok(meta)
    }

    /// Assign `value` at a dotted `path`.
    ///
    /// `"a.b.c"` gets or creates nested metadata at `a`, then at `b`, and
    /// stores under `c`. When a segment already holds a plain
    /// [`HashableMap`], the rest of the path is stored there as a literal
    /// key. Any other value in the way is a [`FingerprintError::PathConflict`].
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> FingerprintResult<()> {
        self.set_value(path, value.into())
    }

    fn set_value(&mut self, path: &str, value: Value) -> FingerprintResult<()> {
        let Some((head, rest)) = path.split_once('.') else {
            self.map.insert(path, value);
            return Ok(());
        };

        if !self.map.contains_key(head) {
            self.map.insert(head, Metadata::new());
        }
        match self.map.get_mut(head) {
            Some(Value::Meta(nested)) => nested.set_value(rest, value),
            Some(Value::Map(plain)) => {
                plain.insert(rest, value);
                Ok(())
            }
            _ => Err(FingerprintError::path_conflict(path, head)),
        }
    }

    /// [`set`](Self::set) every pair in iteration order; later pairs win.
    pub fn update<I, K, V>(&mut self, pairs: I) -> FingerprintResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.set_value(key.as_ref(), value.into())?;
        }
        Ok(())
    }

    /// Move the value at literal key `old` to the (dotted) path `new`.
    ///
    /// The new key is appended at the end unless it already exists, in
    /// which case it is overwritten in place. Renaming a key to itself
    /// leaves it untouched. Moving a key below itself (`a` to `a.b`) is a
    /// [`FingerprintError::PathConflict`].
    pub fn redirect(&mut self, old: &str, new: &str) -> FingerprintResult<()> {
        let value = self.field(old)?.clone();
        if old == new {
            return Ok(());
        }
        if new.strip_prefix(old).is_some_and(|rest| rest.starts_with('.')) {
            return Err(FingerprintError::path_conflict(new, old));
        }
        self.set_value(new, value)?;
        self.map.remove(old);
        trace!(old, new, "redirected metadata field");
        Ok(())
    }

    /// Read through a dotted path, one mapping level per segment.
    pub fn lookup_path(&self, path: &str) -> FingerprintResult<&Value> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        segments.try_fold(self.field(head)?, |current, segment| {
            current
                .get(segment)
                .ok_or_else(|| FingerprintError::field_not_found(path))
        })
    }

    // -------------------------------------------------------------------------
    // Map delegation
    // -------------------------------------------------------------------------

    /// Get a value by literal key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Get a mutable value by literal key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.map.get_mut(key)
    }

    /// Get a field by literal name, failing if absent
    pub fn field(&self, name: &str) -> FingerprintResult<&Value> {
        self.map.field(name)
    }

    /// Remove a literal key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    /// Remove a literal key, failing if absent
    pub fn remove_field(&mut self, name: &str) -> FingerprintResult<Value> {
        self.map.remove_field(name)
    }

    /// Check if the literal key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over top-level entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter()
    }

    /// Iterate over top-level keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys()
    }

    /// The underlying map
    pub fn as_map(&self) -> &HashableMap {
        &self.map
    }

    /// Content fingerprint, same scheme as [`HashableMap::fingerprint`]
    pub fn fingerprint(&self) -> FingerprintResult<Fingerprint> {
        self.map.fingerprint()
    }
}

impl IntoIterator for Metadata {
    type Item = (CompactString, Value);
    type IntoIter = std::vec::IntoIter<(CompactString, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

// =============================================================================
// Batch fingerprinting
// =============================================================================

/// Fingerprint many documents' metadata on the rayon pool.
///
/// Results are in input order.
#[cfg(feature = "parallel")]
pub fn fingerprint_all(docs: &[Metadata]) -> Vec<FingerprintResult<Fingerprint>> {
    use rayon::prelude::*;

    docs.par_iter().map(Metadata::fingerprint).collect()
}

// =============================================================================
// Tests
// =============================================================================
