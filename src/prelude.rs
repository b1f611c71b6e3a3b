//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_fingerprint::prelude::*;
//! ```

// Values
pub use crate::value::Value;

// Fingerprints
pub use crate::hash::{combine, combine_seeded, Combinator, Fingerprint};

// Containers
pub use crate::front_matter::FrontMatter;
pub use crate::list::HashableList;
pub use crate::map::HashableMap;
pub use crate::metadata::Metadata;

// Memoization
pub use crate::cache::{Bound, MemoCall, MemoStats, Memoized};
pub use crate::key::{MemoKey, Unkeyable};

#[cfg(feature = "shared")]
pub use crate::cache::SharedMemoized;

#[cfg(feature = "parallel")]
pub use crate::metadata::fingerprint_all;

// Error
pub use crate::error::{FingerprintError, FingerprintResult};
