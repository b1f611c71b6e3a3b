//! Hashable ordered sequence

use crate::error::FingerprintResult;
use crate::hash::{combine, Fingerprint};
use crate::value::Value;

/// Sequence hashed by content
///
/// Unlike [`Value::Tuple`], which is folded element by element into the
/// enclosing fingerprint, a `HashableList` contributes only its own
/// fingerprint. Equality compares fingerprints.
#[derive(Debug, Clone, Default)]
pub struct HashableList {
    items: Vec<Value>,
}

impl HashableList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Insert a value at `index`, shifting later elements
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        self.items.insert(index, value.into());
    }

    /// Remove the value at `index`
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Get the value at `index` mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over elements
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Elements as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Content fingerprint over the elements in order
    pub fn fingerprint(&self) -> FingerprintResult<Fingerprint> {
        combine(&self.items)
    }
}

impl PartialEq for HashableList {
    fn eq(&self, other: &Self) -> bool {
        match (self.fingerprint(), other.fingerprint()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Vec<Value>> for HashableList {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for HashableList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HashableList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for HashableList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
