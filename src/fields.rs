//! Ordered field storage
//!
//! Both mapping types keep their entries in a plain
//! `Vec<(CompactString, Value)>`. Front-matter rarely has more than a few
//! dozen keys, so a linear scan beats hashing and keeps insertion order for
//! free.

use compact_str::CompactString;

use crate::value::Value;

/// Ordered key/value pairs with unique keys
pub type Fields = Vec<(CompactString, Value)>;

/// Extension trait for entry operations on Fields
pub trait FieldsExt {
    /// Get a value by key
    fn get_entry(&self, key: &str) -> Option<&Value>;

    /// Get a mutable value by key
    fn get_entry_mut(&mut self, key: &str) -> Option<&mut Value>;

    /// Check if a key exists
    fn has_entry(&self, key: &str) -> bool;

    /// Set a value, overwriting in place if the key exists.
    ///
    /// Returns the previous value.
    fn set_entry(&mut self, key: impl Into<CompactString>, value: Value) -> Option<Value>;

    /// Remove an entry by key, shifting later entries down
    fn remove_entry(&mut self, key: &str) -> Option<Value>;
}

impl FieldsExt for Fields {
    fn get_entry(&self, key: &str) -> Option<&Value> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_entry_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn has_entry(&self, key: &str) -> bool {
        self.iter().any(|(k, _)| k == key)
    }

    fn set_entry(&mut self, key: impl Into<CompactString>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(slot) = self.get_entry_mut(&key) {
            Some(std::mem::replace(slot, value))
        } else {
            self.push((key, value));
            None
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<Value> {
        self.iter()
            .position(|(k, _)| k == key)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Tests
// =============================================================================
