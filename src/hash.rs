//! Deterministic content fingerprints
//!
//! Folds a sequence of [`Value`]s into a 32-bit [`Fingerprint`] with CRC-32.
//!
//! # Folding rules
//!
//! The accumulator starts at the seed (0 by default). For each value:
//!
//! - **Text**: its UTF-8 bytes are folded directly
//! - **Tuple**: its elements are combined with the current accumulator as
//!   seed, then the *decimal text* of that inner fingerprint is folded
//! - **Anything else**: the decimal text of its native hash is folded
//!
//! Nested structures and native hashes always pass through their text form,
//! so `5` and a tuple whose inner fingerprint happens to be `5` consume
//! different byte sequences at different chain positions.
//!
//! The result is stable within and across processes, but it is a change
//! detector only. It makes no collision-resistance promises.
//!
//! # Usage
//!
//! ```
//! use tola_fingerprint::{combine, Combinator, Value};
//!
//! let a = combine(&[Value::from("foo"), Value::from("bar")]).unwrap();
//! let b = Combinator::new().update_str("foo").update_str("bar").finish();
//! assert_eq!(a, b);
//! ```

use std::fmt;

use crate::error::FingerprintResult;
use crate::value::{Branch, Value};

// =============================================================================
// Fingerprint
// =============================================================================

/// A 32-bit content fingerprint
///
/// Only equality is meaningful. `Display` renders the unsigned decimal form,
/// which is also the form folded into enclosing fingerprints.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[must_use]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Create a Fingerprint from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 representation
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Lowercase, zero-padded hex form (8 chars) for file names and logs
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:08x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Fingerprint> for u32 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

// =============================================================================
// Combinator - Builder Pattern
// =============================================================================

/// Incremental fingerprint builder
///
/// Each `update*` call continues the CRC-32 chain, so feeding `"foo"` then
/// `"bar"` yields the same result as feeding `"foobar"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combinator {
    crc: u32,
}

impl Combinator {
    /// Create a Combinator starting from 0
    #[inline]
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a Combinator continuing from `seed`
    #[inline]
    pub fn with_seed(seed: u32) -> Self {
        Self { crc: seed }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        let mut hasher = crc32fast::Hasher::new_with_initial(self.crc);
        hasher.update(data);
        self.crc = hasher.finalize();
        self
    }

    /// Update with a string
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update(s.as_bytes())
    }

    /// Fold one value according to its branch.
    pub fn update_value(self, value: &Value) -> FingerprintResult<Self> {
        match value.branch()? {
            Branch::Text(s) => Ok(self.update_str(s)),
            Branch::Nested(items) => {
                let inner = Self::with_seed(self.crc).update_all(items)?.finish();
                Ok(self.update_str(&inner.to_string()))
            }
            Branch::Native(hash) => Ok(self.update_str(&hash.to_string())),
        }
    }

    /// Fold every value in order, stopping at the first unsupported one.
    pub fn update_all<'a, I>(self, values: I) -> FingerprintResult<Self>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        values
            .into_iter()
            .try_fold(self, |acc, value| acc.update_value(value))
    }

    /// Finish and return the fingerprint
    #[inline]
    pub fn finish(self) -> Fingerprint {
        Fingerprint(self.crc)
    }
}

// =============================================================================
// Convenience functions
// =============================================================================

/// Combine values into a fingerprint, starting from 0.
#[inline]
pub fn combine(values: &[Value]) -> FingerprintResult<Fingerprint> {
    combine_seeded(values, 0)
}

/// Combine values into a fingerprint, continuing from `seed`.
///
/// For text values, `combine_seeded(b, combine(a))` equals `combine(a ++ b)`.
pub fn combine_seeded(values: &[Value], seed: u32) -> FingerprintResult<Fingerprint> {
    Combinator::with_seed(seed)
        .update_all(values)
        .map(Combinator::finish)
}

// =============================================================================
// Tests
// =============================================================================
