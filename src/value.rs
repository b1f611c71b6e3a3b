//! Dynamic value model
//!
//! Front-matter and memoized arguments are heterogeneous, so every
//! component works on [`Value`]. The variant decides how a value takes part
//! in fingerprinting:
//!
//! - **Text** is folded as UTF-8 bytes
//! - **Tuple** is folded as a nested sequence
//! - everything else contributes its *native hash*
//!
//! `List` is the plain mutable sequence and has no native hash. Wrap it in a
//! [`HashableList`] to make it hashable.

use crate::error::{FingerprintError, FingerprintResult};
use crate::list::HashableList;
use crate::map::HashableMap;
use crate::metadata::Metadata;

// =============================================================================
// Value
// =============================================================================

/// A heterogeneous value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`~` / `null` in front-matter)
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Immutable nested sequence, folded through the nested branch
    Tuple(Vec<Value>),
    /// Plain mutable sequence, not hashable
    List(Vec<Value>),
    /// Sequence hashed by content
    Seq(HashableList),
    /// Ordered mapping hashed by content
    Map(HashableMap),
    /// Nested metadata mapping
    Meta(Metadata),
}

/// How a value is folded into a fingerprint.
pub(crate) enum Branch<'a> {
    Text(&'a str),
    Nested(&'a [Value]),
    Native(i64),
}

impl Value {
    /// Build a tuple from anything convertible to values.
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a plain (unhashable) list.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Seq(_) => "hashable list",
            Self::Map(_) => "map",
            Self::Meta(_) => "metadata",
        }
    }

    /// Native hash of the value, if it has one.
    ///
    /// Only reached for values outside the text and tuple branches. Hashable
    /// containers answer with their fingerprint, which is why this is
    /// fallible: a container holding a `List` cannot be fingerprinted.
    pub(crate) fn native_hash(&self) -> FingerprintResult<i64> {
        match self {
            Self::Null => Ok(0),
            Self::Bool(b) => Ok(i64::from(*b)),
            Self::Int(i) => Ok(*i),
            Self::Float(f) => Ok(float_hash(*f)),
            Self::Seq(seq) => seq.fingerprint().map(|fp| i64::from(fp.as_raw())),
            Self::Map(map) => map.fingerprint().map(|fp| i64::from(fp.as_raw())),
            Self::Meta(meta) => meta.fingerprint().map(|fp| i64::from(fp.as_raw())),
            Self::Text(_) | Self::Tuple(_) | Self::List(_) => {
                Err(FingerprintError::UnsupportedValue { kind: self.kind() })
            }
        }
    }

    pub(crate) fn branch(&self) -> FingerprintResult<Branch<'_>> {
        match self {
            Self::Text(s) => Ok(Branch::Text(s)),
            Self::Tuple(items) => Ok(Branch::Nested(items)),
            other => other.native_hash().map(Branch::Native),
        }
    }

    /// Check if this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the text content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Elements of any sequence-like variant
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) | Self::List(items) => Some(items),
            Self::Seq(seq) => Some(seq.as_slice()),
            _ => None,
        }
    }

    /// Get the hashable map
    pub fn as_map(&self) -> Option<&HashableMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the metadata mapping
    pub fn as_meta(&self) -> Option<&Metadata> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// Get the metadata mapping mutably
    pub fn as_meta_mut(&mut self) -> Option<&mut Metadata> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// Look up a key in either mapping variant
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(map) => map.get(key),
            Self::Meta(meta) => meta.get(key),
            _ => None,
        }
    }
}

/// Integral floats hash like the matching integer; anything else by bit
/// pattern.
fn float_hash(f: f64) -> i64 {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        f as i64
    } else {
        f.to_bits() as i64
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<HashableList> for Value {
    fn from(seq: HashableList) -> Self {
        Self::Seq(seq)
    }
}

impl From<HashableMap> for Value {
    fn from(map: HashableMap) -> Self {
        Self::Map(map)
    }
}

impl From<Metadata> for Value {
    fn from(meta: Metadata) -> Self {
        Self::Meta(meta)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// Tests
// =============================================================================
