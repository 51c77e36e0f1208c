use core::iter::Take;

use super::{Iter, RBTree};
use crate::{Direction, TreeError};

impl<T> RBTree<T> {
    /// Returns the smallest value in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree holds no values.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::{RBTree, TreeError};
    ///
    /// let mut tree = RBTree::new();
    /// assert_eq!(tree.min(), Err(TreeError::EmptyTree));
    ///
    /// tree.insert_all([5, 3, 8])?;
    /// assert_eq!(tree.min(), Ok(&3));
    /// # Ok::<(), TreeError>(())
    /// ```
    pub fn min(&self) -> Result<&T, TreeError> {
        self.raw.first().ok_or(TreeError::EmptyTree)
    }

    /// Returns the largest value in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree holds no values.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn max(&self) -> Result<&T, TreeError> {
        self.raw.last().ok_or(TreeError::EmptyTree)
    }

    /// Returns the smallest value, or `None` if the tree is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns the largest value, or `None` if the tree is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Iterates over every value in the given direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::{Direction, RBTree};
    ///
    /// let tree = RBTree::from([2, 9, 4]);
    /// let values: Vec<_> = tree.sorted(Direction::Descending).copied().collect();
    /// assert_eq!(values, [9, 4, 2]);
    /// ```
    pub fn sorted(&self, direction: Direction) -> Iter<'_, T> {
        Iter::new(&self.raw, direction)
    }

    /// Iterates over the `count` smallest values, smallest first.
    ///
    /// Yields every value when `count` exceeds the length of the tree.
    ///
    /// # Complexity
    ///
    /// O(count + log n) to drain.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([40, 10, 30, 20]);
    /// assert_eq!(tree.ascending(2).copied().collect::<Vec<_>>(), [10, 20]);
    /// assert_eq!(tree.ascending(9).count(), 4);
    /// ```
    pub fn ascending(&self, count: usize) -> Take<Iter<'_, T>> {
        self.sorted(Direction::Ascending).take(count)
    }

    /// Iterates over the `count` largest values, largest first.
    ///
    /// Yields every value when `count` exceeds the length of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([40, 10, 30, 20]);
    /// assert_eq!(tree.descending(3).copied().collect::<Vec<_>>(), [40, 30, 20]);
    /// assert_eq!(tree.descending(0).next(), None);
    /// ```
    pub fn descending(&self, count: usize) -> Take<Iter<'_, T>> {
        self.sorted(Direction::Descending).take(count)
    }

    /// Returns the number of levels in the tree, or 0 if it is empty.
    ///
    /// A tree holding `n` values is never taller than `2 * log2(n + 1)`.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree: RBTree<u32> = (1..=15).collect();
    /// assert!(tree.height() <= 8);
    /// assert_eq!(RBTree::<u32>::new().height(), 0);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of black nodes on any path from the root down to a leaf, counting
    /// the root.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn black_height(&self) -> usize {
        self.raw.black_height()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn extremes_on_empty_tree() {
        let tree: RBTree<u8> = RBTree::new();
        assert_eq!(tree.min(), Err(TreeError::EmptyTree));
        assert_eq!(tree.max(), Err(TreeError::EmptyTree));
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.black_height(), 0);
        assert_eq!(tree.ascending(3).count(), 0);
    }

    #[test]
    fn extremes_follow_removals() {
        let mut tree = RBTree::from([50, 20, 80, 10, 90]);
        assert_eq!((tree.min(), tree.max()), (Ok(&10), Ok(&90)));

        tree.remove(&10).unwrap();
        tree.remove(&90).unwrap();
        assert_eq!((tree.min(), tree.max()), (Ok(&20), Ok(&80)));
    }

    #[test]
    fn ranked_walks_are_mirror_images() {
        let tree: RBTree<i32> = (0..50).map(|i| (i * 37) % 50).collect();
        let low: Vec<_> = tree.ascending(50).copied().collect();
        let mut high: Vec<_> = tree.descending(50).copied().collect();
        high.reverse();

        assert_eq!(low, (0..50).collect::<Vec<_>>());
        assert_eq!(low, high);
        assert_eq!(tree.ascending(3).len(), 3);
    }

    #[test]
    fn black_height_of_small_trees() {
        assert_eq!(RBTree::from([1]).black_height(), 1);
        assert_eq!(RBTree::from([2, 1, 3]).black_height(), 1);
        assert_eq!(RBTree::from([2, 1, 3, 4]).black_height(), 2);
    }
}
