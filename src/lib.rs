//! tola-fingerprint - Content Fingerprints and Memoization for Incremental Builds
//!
//! ## Core Concepts
//!
//! **Fingerprints**: a CRC-32 fold over heterogeneous [`Value`]s. Text is
//! folded as bytes, tuples as nested sequences, everything else through the
//! decimal text of its native hash. Order-sensitive and seedable.
//!
//! **Hashable containers**: [`HashableMap`], [`HashableList`] and
//! [`Metadata`] are identified by their fingerprint. Equality compares
//! fingerprints, so use it for bucketing, not for exact comparison.
//!
//! **Memoization**: [`Memoized`] caches a pure function by its argument
//! sequence and quietly runs uncached when the arguments cannot be a key.
//!
//! ## Modules
//! - `value`: The dynamic [`Value`] model
//! - `hash`: [`Combinator`], [`combine`], [`Fingerprint`]
//! - `map` / `list`: Hashable ordered containers
//! - `metadata`: Dotted-path nested metadata
//! - `front_matter`: Typed view over entry metadata
//! - `key` / `cache`: Memo keys and caches
//!
//! ## Usage
//!
//! ```
//! use tola_fingerprint::{Memoized, Metadata, Value};
//!
//! let mut defaults = Metadata::new();
//! defaults.set("lang", "en").unwrap();
//!
//! let front_matter = Metadata::from_pairs([("lang", "de"), ("author.name", "Ada")]).unwrap();
//! defaults.update(front_matter).unwrap();
//!
//! let render = Memoized::new(|args: &[Value]| format!("{:?}", args[0].get("lang")));
//! let page = Value::Meta(defaults);
//! assert_eq!(render.call(&[page.clone()]), render.call(&[page]));
//! assert_eq!(render.stats().hits, 1);
//! ```

#[macro_use]
mod macros;

/// Error types
pub mod error;

/// Dynamic value model
pub mod value;

/// Fingerprint combinator
pub mod hash;

/// Ordered field storage
pub mod fields;

/// Hashable ordered mapping
pub mod map;

/// Hashable ordered sequence
pub mod list;

/// Nested metadata mapping
pub mod metadata;

/// Typed front-matter view
pub mod front_matter;

/// Memoization keys
pub mod key;

/// Memoizing call caches
pub mod cache;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{FingerprintError, FingerprintResult};
pub use value::Value;
pub use hash::{combine, combine_seeded, Combinator, Fingerprint};
pub use map::HashableMap;
pub use list::HashableList;
pub use metadata::Metadata;
pub use front_matter::FrontMatter;
pub use key::{MemoKey, Unkeyable};
pub use cache::{Bound, MemoCache, MemoCall, MemoStats, Memoized};

#[cfg(feature = "shared")]
pub use cache::SharedMemoized;

#[cfg(feature = "parallel")]
pub use metadata::fingerprint_all;
