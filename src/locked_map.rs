use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;

use parking_lot::Mutex;

/// A hash map behind a single mutex, with no ordering index.
///
/// This is the baseline [`ConcurrentOrderedMap`](crate::ConcurrentOrderedMap) is measured
/// against: the same locking discipline, without the cost of keeping keys sorted.
///
/// # Examples
///
/// ```
/// use rb_index::LockedMap;
///
/// let map = LockedMap::new();
/// assert_eq!(map.set("a", 1), None);
/// assert_eq!(map.set("a", 2), Some(1));
/// assert_eq!(map.get("a"), Some(2));
/// assert_eq!(map.remove("a"), Some(2));
/// assert!(map.is_empty());
/// ```
pub struct LockedMap<K, V, S = RandomState> {
    table: Mutex<HashMap<K, V, S>>,
}

impl<K, V> LockedMap<K, V, RandomState> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl<K, V, S> LockedMap<K, V, S> {
    /// Creates an empty map that hashes keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: Mutex::new(HashMap::with_hasher(hasher)),
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Removes every entry from the map.
    pub fn clear(&self) {
        self.table.lock().clear();
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> LockedMap<K, V, S> {
    /// Returns a clone of the value stored under `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.table.lock().get(key).cloned()
    }

    /// Returns `true` if the map holds a value for `key`.
    ///
    /// ```
    /// use rb_index::LockedMap;
    ///
    /// let map = LockedMap::new();
    /// map.set(String::from("k"), 1);
    /// assert!(map.contains_key("k"));
    /// assert_eq!(map.len(), 1);
    /// map.clear();
    /// assert!(!map.contains_key("k"));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.lock().contains_key(key)
    }

    /// Stores `value` under `key` and returns the value it replaced, if any.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.table.lock().insert(key, value)
    }

    /// Removes `key` and returns its value, if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.lock().remove(key)
    }
}

impl<K, V, S: Default> Default for LockedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LockedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.lock().iter()).finish()
    }
}
