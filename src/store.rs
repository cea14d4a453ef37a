use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::keys::CacheKey;

/// Key-value storage consulted by a memoized wrapper.
///
/// The wrapper calls `get` only after a successful `has`, so a conforming
/// store never observes a `get` for an absent key. A store whose `get`
/// contradicts its `has` is treated as non-conforming: the wrapper falls
/// back to recomputation instead of panicking.
///
/// Values are returned by value; implementations typically require
/// `V: Clone` and hand out clones of the stored result.
pub trait CacheStore<V> {
    /// Existence check. No side effects.
    fn has(&self, key: &CacheKey) -> bool;

    /// Retrieval. Only called after `has` returned `true`.
    fn get(&self, key: &CacheKey) -> Option<V>;

    /// Inserts or overwrites the mapping for `key`.
    fn set(&mut self, key: CacheKey, value: V);
}

/// Creates one fresh cache instance per wrapped function.
///
/// The factory is consumed into the wrapper at build time; `create` runs
/// exactly once per `memoize` call. A factory may deliberately hand out
/// handles to shared state instead of fresh storage, see [`SharedStore`].
pub trait CacheFactory<V> {
    type Store: CacheStore<V>;

    fn create(&self) -> Self::Store;
}

/// Default store: an unbounded map from [`CacheKey`] to cached value.
///
/// Entries are never evicted or expired. Long-running processes that need
/// bounded memory either clear the store by hand through
/// [`Memoized::cache_mut`](crate::Memoized::cache_mut) or configure a
/// bounding store implementation of their own.
///
/// Keys are the opaque [`CacheKey`] enum, so arbitrary string keys are
/// stored and distinguished correctly, including names like
/// `"constructor"` that collide with reserved identifiers in weaker key
/// schemes.
///
/// # Examples
///
/// ```
/// use memofn::{CacheKey, CacheStore, UnboundedStore};
///
/// let mut store = UnboundedStore::new();
/// let key = CacheKey::Str("constructor".to_string());
///
/// assert!(!store.has(&key));
/// store.set(key.clone(), 99);
/// assert!(store.has(&key));
/// assert_eq!(store.get(&key), Some(99));
/// ```
#[derive(Clone, Debug)]
pub struct UnboundedStore<V> {
    entries: HashMap<CacheKey, V>,
}

impl<V> UnboundedStore<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached entry. The next call for any key recomputes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for UnboundedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> CacheStore<V> for UnboundedStore<V> {
    fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: CacheKey, value: V) {
        self.entries.insert(key, value);
    }
}

/// Factory for the default [`UnboundedStore`].
///
/// This is what [`memoize`](crate::memoize) uses when no cache is
/// configured; each wrapper gets its own independent map.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnboundedCache;

impl<V: Clone> CacheFactory<V> for UnboundedCache {
    type Store = UnboundedStore<V>;

    fn create(&self) -> Self::Store {
        UnboundedStore::new()
    }
}

/// A store handle that shares one underlying map between wrappers.
///
/// `SharedStore` is its own factory: `create` returns another handle to the
/// same map, so passing a clone of the same `SharedStore` to several
/// `memoize` calls makes them read and write one cache. This is the
/// deliberate opt-out from the default one-cache-per-wrapper ownership.
/// Sharing only makes sense between wrappers whose key spaces are meant to
/// coincide.
///
/// The handle is an `Rc` over a `RefCell`; like the wrappers themselves it
/// does not cross threads.
///
/// # Examples
///
/// ```
/// use memofn::{MemoizeBuilder, SharedStore};
///
/// let shared = SharedStore::new();
///
/// let double = MemoizeBuilder::new()
///     .cache(shared.clone())
///     .build(|x: i32| x * 2);
///
/// double.call((21,));
/// assert_eq!(shared.len(), 1);
/// ```
#[derive(Debug)]
pub struct SharedStore<V> {
    inner: Rc<RefCell<UnboundedStore<V>>>,
}

impl<V> SharedStore<V> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(UnboundedStore::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl<V> Default for SharedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: cloning the handle must not require V: Clone.
impl<V> Clone for SharedStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Clone> CacheStore<V> for SharedStore<V> {
    fn has(&self, key: &CacheKey) -> bool {
        self.inner.borrow().has(key)
    }

    fn get(&self, key: &CacheKey) -> Option<V> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: CacheKey, value: V) {
        self.inner.borrow_mut().set(key, value);
    }
}

impl<V: Clone> CacheFactory<V> for SharedStore<V> {
    type Store = SharedStore<V>;

    fn create(&self) -> Self::Store {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_name_string_keys() {
        // Keys matching prototype names in weaker schemes behave normally.
        for name in ["constructor", "toString", "__proto__", "hasOwnProperty"] {
            let mut store = UnboundedStore::new();
            let key = CacheKey::Str(name.to_string());

            assert!(!store.has(&key));
            assert_eq!(store.get(&key), None);

            store.set(key.clone(), 99);
            assert!(store.has(&key));
            assert_eq!(store.get(&key), Some(99));
        }
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = UnboundedStore::new();
        let key = CacheKey::Int(1);

        store.set(key.clone(), "a");
        store.set(key.clone(), "b");
        assert_eq!(store.get(&key), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = UnboundedStore::new();
        store.set(CacheKey::Int(1), 1);
        store.set(CacheKey::Int(2), 2);
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert!(!store.has(&CacheKey::Int(1)));
    }

    #[test]
    fn test_factory_creates_independent_stores() {
        let factory = UnboundedCache;
        let mut a: UnboundedStore<i32> = factory.create();
        let b: UnboundedStore<i32> = factory.create();

        a.set(CacheKey::Int(1), 10);
        assert!(!b.has(&CacheKey::Int(1)));
    }

    #[test]
    fn test_shared_store_handles_share_entries() {
        let shared: SharedStore<i32> = SharedStore::new();
        let mut a = CacheFactory::<i32>::create(&shared);
        let b = CacheFactory::<i32>::create(&shared);

        a.set(CacheKey::Int(1), 10);
        assert!(b.has(&CacheKey::Int(1)));
        assert_eq!(b.get(&CacheKey::Int(1)), Some(10));
        assert_eq!(shared.len(), 1);
    }
}
