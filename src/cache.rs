//! Memoizing call caches.
//!
//! [`Memoized`] wraps a pure function of `&[Value]` and caches its results
//! by [`MemoKey`]. There is no eviction and no staleness check: the caller
//! guarantees the function is pure for the lifetime of the cache.
//!
//! When the arguments cannot be a key the call runs uncached. A memoization
//! failure never becomes a call failure.
//!
//! [`SharedMemoized`] (feature `shared`) is the lock-protected variant for
//! hosts that build documents in parallel. A miss computes without holding
//! the lock, so two racing callers may both compute; the last insert wins
//! and no other entry is disturbed.

use std::cell::{Cell, RefCell};
use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::key::MemoKey;
use crate::value::Value;

// =============================================================================
// Shared pieces
// =============================================================================

/// Result map owned by a memo cache.
pub type MemoCache<R> = FxHashMap<MemoKey, R>;

/// Hit/miss counters for a memo cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls that computed and stored a result
    pub misses: u64,
    /// Calls that ran uncached because the arguments were unkeyable
    pub uncached: u64,
}

/// A memoized function that can be called with an argument slice.
pub trait MemoCall {
    /// Result of the wrapped function
    type Output;

    /// Call through the cache.
    fn call(&self, args: &[Value]) -> Self::Output;

    /// Bind `owner` as the implicit first argument.
    fn bind(&self, owner: impl Into<Value>) -> Bound<'_, Self>
    where
        Self: Sized,
    {
        Bound {
            memo: self,
            owner: owner.into(),
        }
    }
}

/// A memo cache with its first argument fixed to an owner value.
///
/// All bound views share the underlying cache; `bound.call(&[x])` is
/// `memo.call(&[owner, x])`.
pub struct Bound<'a, M: MemoCall> {
    memo: &'a M,
    owner: Value,
}

impl<M: MemoCall> Bound<'_, M> {
    /// Call with `owner` prepended to `rest`.
    pub fn call(&self, rest: &[Value]) -> M::Output {
        let mut args: SmallVec<[Value; 4]> = SmallVec::with_capacity(rest.len() + 1);
        args.push(self.owner.clone());
        args.extend(rest.iter().cloned());
        self.memo.call(&args)
    }

    /// The bound owner
    pub fn owner(&self) -> &Value {
        &self.owner
    }
}

// =============================================================================
// Memoized
// =============================================================================

/// Single-threaded memo cache.
pub struct Memoized<F, R> {
    func: F,
    cache: RefCell<MemoCache<R>>,
    stats: Cell<MemoStats>,
}

impl<F, R> Memoized<F, R>
where
    F: Fn(&[Value]) -> R,
    R: Clone,
{
    /// Wrap a function.
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: RefCell::new(FxHashMap::default()),
            stats: Cell::new(MemoStats::default()),
        }
    }

    /// Call through the cache.
    ///
    /// No borrow of the cache is held while the function runs.
    pub fn call(&self, args: &[Value]) -> R {
        let key = match MemoKey::new(args) {
            Ok(key) => key,
            Err(reason) => {
                debug!(%reason, "arguments not keyable, calling uncached");
                self.record(|s| s.uncached += 1);
                return (self.func)(args);
            }
        };

        let cached = self.cache.borrow().get(&key).cloned();
        if let Some(value) = cached {
            trace!(arity = key.arity(), "memo hit");
            self.record(|s| s.hits += 1);
            return value;
        }

        trace!(arity = key.arity(), "memo miss");
        self.record(|s| s.misses += 1);
        let value = (self.func)(args);
        self.cache.borrow_mut().insert(key, value.clone());
        value
    }

    /// Check if a result is cached for `args`
    pub fn contains(&self, args: &[Value]) -> bool {
        MemoKey::new(args).is_ok_and(|key| self.cache.borrow().contains_key(&key))
    }

    /// Counters since creation (or the last [`clear`](Self::clear)).
    pub fn stats(&self) -> MemoStats {
        self.stats.get()
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached results and reset the counters
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        self.stats.set(MemoStats::default());
    }

    fn record(&self, f: impl FnOnce(&mut MemoStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl<F, R> MemoCall for Memoized<F, R>
where
    F: Fn(&[Value]) -> R,
    R: Clone,
{
    type Output = R;

    fn call(&self, args: &[Value]) -> R {
        Memoized::call(self, args)
    }
}

impl<F, R> fmt::Debug for Memoized<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("entries", &self.cache.borrow().len())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// SharedMemoized
// =============================================================================

#[cfg(feature = "shared")]
pub use shared::SharedMemoized;

#[cfg(feature = "shared")]
mod shared {
    use std::fmt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use parking_lot::RwLock;
    use rustc_hash::FxHashMap;
    use tracing::{debug, trace};

    use super::{MemoCache, MemoCall, MemoStats};
    use crate::key::MemoKey;
    use crate::value::Value;

    #[derive(Debug, Default)]
    struct Counters {
        hits: AtomicU64,
        misses: AtomicU64,
        uncached: AtomicU64,
    }

    /// Thread-safe shared memo cache.
    ///
    /// Uses `parking_lot::RwLock` for better performance under contention.
    /// Cloning shares the function, the cache and the counters.
    pub struct SharedMemoized<F, R> {
        func: Arc<F>,
        inner: Arc<RwLock<MemoCache<R>>>,
        counters: Arc<Counters>,
    }

    impl<F, R> Clone for SharedMemoized<F, R> {
        fn clone(&self) -> Self {
            Self {
                func: Arc::clone(&self.func),
                inner: Arc::clone(&self.inner),
                counters: Arc::clone(&self.counters),
            }
        }
    }

    impl<F, R> SharedMemoized<F, R>
    where
        F: Fn(&[Value]) -> R + Send + Sync,
        R: Clone + Send + Sync,
    {
        /// Wrap a function.
        pub fn new(func: F) -> Self {
            Self {
                func: Arc::new(func),
                inner: Arc::new(RwLock::new(FxHashMap::default())),
                counters: Arc::default(),
            }
        }

        /// Execute a closure with read access to the cache.
        fn with_read<T>(&self, f: impl FnOnce(&MemoCache<R>) -> T) -> T {
            let guard = self.inner.read();
            f(&guard)
        }

        /// Execute a closure with write access to the cache.
        fn with_write<T>(&self, f: impl FnOnce(&mut MemoCache<R>) -> T) -> T {
            let mut guard = self.inner.write();
            f(&mut guard)
        }

        /// Call through the cache.
        ///
        /// The function runs with no lock held.
        pub fn call(&self, args: &[Value]) -> R {
            let key = match MemoKey::new(args) {
                Ok(key) => key,
                Err(reason) => {
                    debug!(%reason, "arguments not keyable, calling uncached");
                    self.counters.uncached.fetch_add(1, Ordering::Relaxed);
                    return (self.func)(args);
                }
            };

            if let Some(value) = self.with_read(|c| c.get(&key).cloned()) {
                trace!(arity = key.arity(), "shared memo hit");
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return value;
            }

            trace!(arity = key.arity(), "shared memo miss");
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            let value = (self.func)(args);
            self.with_write(|c| {
                c.insert(key, value.clone());
            });
            value
        }

        /// Check if a result is cached for `args`
        pub fn contains(&self, args: &[Value]) -> bool {
            MemoKey::new(args).is_ok_and(|key| self.with_read(|c| c.contains_key(&key)))
        }

        /// Counters since creation (or the last [`clear`](Self::clear)).
        pub fn stats(&self) -> MemoStats {
            MemoStats {
                hits: self.counters.hits.load(Ordering::Relaxed),
                misses: self.counters.misses.load(Ordering::Relaxed),
                uncached: self.counters.uncached.load(Ordering::Relaxed),
            }
        }

        /// Number of cached results
        pub fn len(&self) -> usize {
            self.with_read(|c| c.len())
        }

        /// Check if nothing is cached
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Drop all cached results and reset the counters
        pub fn clear(&self) {
            self.with_write(|c| c.clear());
            self.counters.hits.store(0, Ordering::Relaxed);
            self.counters.misses.store(0, Ordering::Relaxed);
            self.counters.uncached.store(0, Ordering::Relaxed);
        }
    }

    impl<F, R> MemoCall for SharedMemoized<F, R>
    where
        F: Fn(&[Value]) -> R + Send + Sync,
        R: Clone + Send + Sync,
    {
        type Output = R;

        fn call(&self, args: &[Value]) -> R {
            SharedMemoized::call(self, args)
        }
    }

    impl<F, R> fmt::Debug for SharedMemoized<F, R> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("SharedMemoized")
                .field("entries", &self.inner.read().len())
                .finish_non_exhaustive()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::list::HashableList;
    use crate::map::HashableMap;

    fn counting() -> (Rc<Cell<u32>>, Memoized<impl Fn(&[Value]) -> i64, i64>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let memo = Memoized::new(move |args: &[Value]| {
            counter.set(counter.get() + 1);
            args.iter().filter_map(Value::as_int).sum::<i64>() * 2
        });
        (calls, memo)
    }

    #[test]
    fn test_memo_hit() {
        let (calls, memo) = counting();
        assert_eq!(memo.call(&[Value::Int(3)]), 6);
        assert_eq!(memo.call(&[Value::Int(3)]), 6);
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.stats(), MemoStats { hits: 1, misses: 1, uncached: 0 });
        assert!(memo.contains(&[Value::Int(3)]));
    }

    #[test]
    fn test_distinct_args_distinct_entries() {
        let (calls, memo) = counting();
        memo.call(&[Value::Int(1), Value::Int(2)]);
        memo.call(&[Value::Int(2), Value::Int(1)]);
        memo.call(&[]);
        assert_eq!(calls.get(), 3);
        assert_eq!(memo.len(), 3);
    }

    #[test]
    fn test_unkeyable_degrades_to_uncached() {
        let (calls, memo) = counting();
        let args = [Value::list([Value::Int(1)]), Value::Int(4)];

        assert_eq!(memo.call(&args), 8);
        assert_eq!(memo.call(&args), 8);
        assert_eq!(calls.get(), 2);
        assert!(memo.is_empty());
        assert_eq!(memo.stats().uncached, 2);
        assert!(!memo.contains(&args));
    }

    #[test]
    fn test_hashable_map_args_hit_by_content() {
        let (calls, memo) = counting();
        let meta = |v: i64| -> Value {
            let map: HashableMap = [("n", v)].into_iter().collect();
            Value::Map(map)
        };

        memo.call(&[meta(1)]);
        memo.call(&[meta(1)]);
        assert_eq!(calls.get(), 1);

        memo.call(&[meta(2)]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_empty_containers_of_different_kinds_miss() {
        let memo = Memoized::new(|args: &[Value]| args[0].kind());
        assert_eq!(memo.call(&[Value::Seq(HashableList::new())]), "hashable list");
        assert_eq!(memo.call(&[Value::Map(HashableMap::new())]), "map");
        assert_eq!(memo.stats().misses, 2);
    }

    #[test]
    fn test_bound_prepends_owner_and_shares_cache() {
        let (calls, memo) = counting();
        let bound = memo.bind(10);
        assert_eq!(bound.owner(), &Value::Int(10));

        assert_eq!(bound.call(&[Value::Int(1)]), 22);
        assert_eq!(memo.call(&[Value::Int(10), Value::Int(1)]), 22);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear_resets() {
        let (calls, memo) = counting();
        memo.call(&[Value::Int(1)]);
        memo.clear();
        assert!(memo.is_empty());
        assert_eq!(memo.stats(), MemoStats::default());

        memo.call(&[Value::Int(1)]);
        assert_eq!(calls.get(), 2);
    }

    #[cfg(feature = "shared")]
    mod shared_tests {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        use static_assertions::{assert_impl_all, assert_not_impl_any};

        use super::*;

        type Func = fn(&[Value]) -> u32;

        assert_impl_all!(SharedMemoized<Func, u32>: Send, Sync, Clone);
        assert_not_impl_any!(Memoized<Func, u32>: Sync);

        #[test]
        fn test_shared_cache_across_threads() {
            let calls = Arc::new(AtomicU32::new(0));
            let counter = Arc::clone(&calls);
            let memo = SharedMemoized::new(move |args: &[Value]| {
                counter.fetch_add(1, Ordering::SeqCst);
                args.len()
            });

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let memo = memo.clone();
                    std::thread::spawn(move || memo.call(&[Value::Int(i), Value::from("doc")]))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 2);
            }

            assert_eq!(memo.len(), 4);
            assert_eq!(calls.load(Ordering::SeqCst), 4);

            memo.call(&[Value::Int(0), Value::from("doc")]);
            assert_eq!(calls.load(Ordering::SeqCst), 4);
            assert_eq!(memo.stats().hits, 1);
        }

        #[test]
        fn test_shared_unkeyable_and_bound() {
            let memo = SharedMemoized::new(|args: &[Value]| args.len());
            assert_eq!(memo.call(&[Value::list([1])]), 1);
            assert_eq!(memo.stats().uncached, 1);

            let bound = memo.bind("owner");
            assert_eq!(bound.call(&[Value::Int(1)]), 2);
            assert!(memo.contains(&[Value::from("owner"), Value::Int(1)]));

            memo.clear();
            assert!(memo.is_empty());
        }
    }
}
