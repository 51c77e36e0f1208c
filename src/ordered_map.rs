use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;
use std::collections::hash_map::{Entry, RandomState};

use log::{error, trace};
use parking_lot::Mutex;

use crate::{Direction, RBTree, TreeError};

/// A thread-safe key-value map that can also list its values in key order.
///
/// Values live in a hash table for O(1) lookups, and every key is mirrored in an [`RBTree`]
/// index so the `n` lowest or highest keyed values can be listed without sorting. Each
/// operation runs under a single exclusive lock for its whole duration, so operations are
/// linearizable and the table and index never disagree between operations.
///
/// # Examples
///
/// ```
/// use rb_index::ConcurrentOrderedMap;
///
/// let map = ConcurrentOrderedMap::new();
/// map.set(3, "c");
/// map.set(1, "a");
/// map.set(2, "b");
///
/// assert_eq!(map.get(&2), Some("b"));
/// assert_eq!(map.ascending(2), ["a", "b"]);
/// assert_eq!(map.descending(5), ["c", "b", "a"]);
///
/// assert_eq!(map.remove(&3), Some("c"));
/// assert_eq!(map.len(), 2);
/// ```
pub struct ConcurrentOrderedMap<K, V, S = RandomState> {
    inner: Mutex<Inner<K, V, S>>,
}

struct Inner<K, V, S> {
    table: HashMap<K, V, S>,
    // Holds exactly the keys of `table`.
    index: RBTree<K>,
}

impl<K, V> ConcurrentOrderedMap<K, V, RandomState> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::ConcurrentOrderedMap;
    ///
    /// let map: ConcurrentOrderedMap<u64, String> = ConcurrentOrderedMap::with_capacity(128);
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ConcurrentOrderedMap<K, V, S> {
    /// Creates an empty map that hashes keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: HashMap::with_hasher(hasher),
                index: RBTree::new(),
            }),
        }
    }

    /// Creates an empty map with room for at least `capacity` entries that hashes keys with
    /// `hasher`.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: HashMap::with_capacity_and_hasher(capacity, hasher),
                index: RBTree::with_capacity(capacity),
            }),
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().table.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().table.is_empty()
    }

    /// Removes every entry from the map.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.table.clear();
        inner.index.clear();
    }

    /// Returns the number of levels in the key index.
    ///
    /// Useful for checking that the index stays balanced under a real workload.
    #[must_use]
    pub fn height(&self) -> usize {
        self.inner.lock().index.height()
    }
}

impl<K, V, S> ConcurrentOrderedMap<K, V, S>
where
    K: Eq + Hash + Ord + Clone,
    S: BuildHasher,
{
    /// Returns a clone of the value stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(1) on average.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().table.get(key).cloned()
    }

    /// Returns `true` if the map holds a value for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().table.contains_key(key)
    }

    /// Stores `value` under `key` and returns the value it replaced, if any.
    ///
    /// Overwriting an existing key leaves the index untouched.
    ///
    /// # Complexity
    ///
    /// O(1) on average to overwrite, O(log n) for a new key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::ConcurrentOrderedMap;
    ///
    /// let map = ConcurrentOrderedMap::new();
    /// assert_eq!(map.set("k", 1), None);
    /// assert_eq!(map.set("k", 2), Some(1));
    /// assert_eq!(map.get("k"), Some(2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut guard = self.inner.lock();
        let Inner { table, index } = &mut *guard;

        match table.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                match index.insert(entry.key().clone()) {
                    Ok(()) => trace!("indexed new key ({} keys)", index.len()),
                    Err(error) => report_divergence("set", error),
                }
                entry.insert(value);
                None
            }
        }
    }

    /// Removes `key` from the map and returns its value, if it was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + Ord,
    {
        let mut guard = self.inner.lock();
        let Inner { table, index } = &mut *guard;

        let value = table.remove(key)?;
        match index.remove(key) {
            Ok(_) => trace!("unindexed key ({} keys)", index.len()),
            Err(error) => report_divergence("remove", error),
        }
        Some(value)
    }

    /// Returns clones of the values under the `count` lowest keys, lowest key first.
    ///
    /// Returns every value when `count` exceeds the number of entries.
    ///
    /// # Complexity
    ///
    /// O(count + log n)
    pub fn ascending(&self, count: usize) -> Vec<V>
    where
        V: Clone,
    {
        self.ranked("ascending", Direction::Ascending, count)
    }

    /// Returns clones of the values under the `count` highest keys, highest key first.
    ///
    /// Returns every value when `count` exceeds the number of entries.
    ///
    /// # Complexity
    ///
    /// O(count + log n)
    pub fn descending(&self, count: usize) -> Vec<V>
    where
        V: Clone,
    {
        self.ranked("descending", Direction::Descending, count)
    }

    /// Returns a clone of the lowest key.
    #[must_use]
    pub fn first_key(&self) -> Option<K> {
        self.inner.lock().index.first().cloned()
    }

    /// Returns a clone of the highest key.
    #[must_use]
    pub fn last_key(&self) -> Option<K> {
        self.inner.lock().index.last().cloned()
    }

    fn ranked(&self, operation: &str, direction: Direction, count: usize) -> Vec<V>
    where
        V: Clone,
    {
        let inner = self.inner.lock();
        let count = count.min(inner.table.len());

        let mut values = Vec::with_capacity(count);
        for key in inner.index.sorted(direction).take(count) {
            match inner.table.get(key) {
                Some(value) => values.push(value.clone()),
                None => report_divergence(operation, TreeError::NotFound),
            }
        }
        values
    }
}

/// Logs a table/index mismatch. Debug builds treat it as a bug and panic.
fn report_divergence(operation: &str, error: TreeError) {
    error!("`ConcurrentOrderedMap::{operation}()` - table and index diverged: {error}");
    debug_assert!(false, "`ConcurrentOrderedMap::{operation}()` - table and index diverged: {error}!");
}

impl<K, V, S: Default> Default for ConcurrentOrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for ConcurrentOrderedMap<K, V, S>
where
    K: Eq + Hash + Ord + Clone,
    S: BuildHasher + Default,
{
    /// Builds a map from `(key, value)` pairs; a later pair overwrites an earlier one with the
    /// same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::default();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

/// Formats the entries in key order.
impl<K, V, S> fmt::Debug for ConcurrentOrderedMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_map()
            .entries(inner.index.iter().filter_map(|key| inner.table.get_key_value(key)))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;
    use std::hash::BuildHasherDefault;
    use std::hash::DefaultHasher;

    assert_impl_all!(ConcurrentOrderedMap<String, Vec<u8>>: Send, Sync, Default);

    #[test]
    fn table_and_index_track_the_same_keys() {
        let map = ConcurrentOrderedMap::new();
        for key in [5, 3, 8, 1] {
            assert_eq!(map.set(key, key * 10), None);
        }
        assert_eq!(map.set(3, 33), Some(30));

        let inner = map.inner.lock();
        assert_eq!(inner.table.len(), 4);
        assert_eq!(inner.index.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 8]);
    }

    #[test]
    fn remove_of_missing_key_changes_nothing() {
        let map: ConcurrentOrderedMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        assert_eq!(map.remove(&7), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.inner.lock().index.len(), 2);
    }

    #[test]
    fn ranked_lists_clamp_to_size() {
        let map: ConcurrentOrderedMap<u8, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
        assert_eq!(map.ascending(usize::MAX), ['a', 'b', 'c']);
        assert_eq!(map.descending(1), ['c']);
        assert!(map.ascending(0).is_empty());
    }

    #[test]
    fn keys_and_clear() {
        let map = ConcurrentOrderedMap::with_capacity(4);
        assert_eq!(map.first_key(), None::<String>);
        map.set(String::from("m"), 1);
        map.set(String::from("a"), 2);
        map.set(String::from("z"), 3);

        assert_eq!(map.first_key().as_deref(), Some("a"));
        assert_eq!(map.last_key().as_deref(), Some("z"));
        assert!(map.contains_key("m"));
        assert_eq!(map.height(), 2);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.height(), 0);
        assert!(!map.contains_key("m"));
    }

    #[test]
    fn custom_hasher() {
        let map: ConcurrentOrderedMap<u32, u32, BuildHasherDefault<DefaultHasher>> = ConcurrentOrderedMap::default();
        map.set(1, 2);
        assert_eq!(map.get(&1), Some(2));
        assert_eq!(format!("{map:?}"), "{1: 2}");
    }

    #[test]
    #[should_panic(expected = "`ConcurrentOrderedMap::remove()` - table and index diverged")]
    #[cfg(debug_assertions)]
    fn divergence_panics_in_debug_builds() {
        let map = ConcurrentOrderedMap::new();
        map.set(1, ());
        map.inner.lock().index.clear();
        map.remove(&1);
    }

    #[test]
    #[should_panic(expected = "`ConcurrentOrderedMap::descending()` - table and index diverged")]
    #[cfg(debug_assertions)]
    fn divergence_names_the_ranked_walk() {
        let map: ConcurrentOrderedMap<u8, u8> = [(1, 1), (2, 2)].into_iter().collect();
        map.inner.lock().table.remove(&2);
        let _ = map.descending(2);
    }
}
