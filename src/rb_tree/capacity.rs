use super::RBTree;
use crate::raw::RawRBTree;

impl<T> RBTree<T> {
    /// Creates an empty tree with node storage for at least `capacity` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree: RBTree<i32> = RBTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTree {
            raw: RawRBTree::with_capacity(capacity),
        }
    }

    /// Returns the number of node slots the tree can hold without reallocating.
    ///
    /// Slots freed by removals count towards the capacity and are reused first.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let mut tree = RBTree::from([1]);
    /// tree.reserve(10);
    /// assert!(tree.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Releases as much unused node storage as possible.
    ///
    /// Freed slots sitting between live nodes stay allocated and are reused by later
    /// insertions.
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
