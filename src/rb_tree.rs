use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Color, RawRBTree, Side, Stack};
use crate::{Direction, TreeError};

mod capacity;
mod ordered_index;

/// An ordered set of unique values based on a red-black tree.
///
/// Every insertion and removal restores the red-black invariants, so the height of a tree
/// holding `n` values never exceeds `2 * log2(n + 1)` and lookups, insertions and removals
/// take O(log n). Unlike [`BTreeSet`], inserting a value that is already present is an error
/// rather than a no-op, and the tree exposes its shape through [`height`] and
/// [`black_height`].
///
/// Nodes are kept in a slot arena and linked by integer handles, so a removal frees its slot
/// for the next insertion instead of returning memory to the allocator.
///
/// It is a logic error for a value to be modified in such a way that its ordering relative to
/// any other value, as determined by the [`Ord`] trait, changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use rb_index::{RBTree, TreeError};
///
/// let mut tree = RBTree::new();
/// tree.insert_all([31, 10, 54])?;
///
/// assert_eq!(tree.insert(10), Err(TreeError::DuplicateElement));
/// assert_eq!(tree.min(), Ok(&10));
/// assert_eq!(tree.ascending(2).copied().collect::<Vec<_>>(), [10, 31]);
///
/// tree.remove(&31)?;
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 54]);
/// # Ok::<(), TreeError>(())
/// ```
///
/// [`BTreeSet`]: std::collections::BTreeSet
/// [`height`]: RBTree::height
/// [`black_height`]: RBTree::black_height
pub struct RBTree<T> {
    raw: RawRBTree<T>,
}

/// An iterator over the values of an `RBTree` in ascending or descending order.
///
/// This `struct` is created by the [`iter`], [`sorted`], [`ascending`] and [`descending`]
/// methods on [`RBTree`]. It walks the tree lazily with an explicit stack, so taking only the
/// first `k` values costs O(k + log n).
///
/// [`iter`]: RBTree::iter
/// [`sorted`]: RBTree::sorted
/// [`ascending`]: RBTree::ascending
/// [`descending`]: RBTree::descending
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawRBTree<T>,
    stack: Stack,
    // The side walked first: `Left` for ascending, `Right` for descending.
    side: Side,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(tree: &'a RawRBTree<T>, direction: Direction) -> Self {
        let side = match direction {
            Direction::Ascending => Side::Left,
            Direction::Descending => Side::Right,
        };
        let mut stack = Stack::new();
        tree.push_spine(tree.root(), side, &mut stack);

        Iter {
            tree,
            stack,
            side,
            remaining: tree.len(),
        }
    }
}

impl<T> RBTree<T> {
    /// Makes a new, empty `RBTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let mut tree: RBTree<i32> = RBTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> RBTree<T> {
        RBTree { raw: RawRBTree::new() }
    }

    /// Removes all values from the tree.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([1, 2, 3]);
    /// assert_eq!(tree.len(), 3);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes and returns the smallest value, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let mut tree = RBTree::from([2, 1]);
    /// assert_eq!(tree.pop_first(), Some(1));
    /// assert_eq!(tree.pop_first(), Some(2));
    /// assert_eq!(tree.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes and returns the largest value, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.len(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw, Direction::Ascending)
    }
}

impl<T: Ord> RBTree<T> {
    /// Adds a value to the tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateElement`] if an equal value is already present; the tree
    /// is left unchanged.
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
    /// assert_eq!(tree.insert(2), Ok(()));
    /// assert_eq!(tree.insert(2), Err(TreeError::DuplicateElement));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<(), TreeError> {
        self.raw.insert(value)
    }

    /// Adds every value in `values`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first value that is already present and returns
    /// [`TreeError::DuplicateElement`]. Values inserted before it stay in the tree; values
    /// after it are not consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::{RBTree, TreeError};
    ///
    /// let mut tree = RBTree::new();
    /// assert_eq!(tree.insert_all([1, 2, 2, 3]), Err(TreeError::DuplicateElement));
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2]);
    /// ```
    pub fn insert_all<I>(&mut self, values: I) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().try_for_each(|value| self.raw.insert(value))
    }

    /// Removes a value from the tree and returns it.
    ///
    /// The value may be any borrowed form of the tree's value type, but the ordering on the
    /// borrowed form *must* match the ordering on the value type.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if no equal value is present, including when the tree
    /// is empty; the tree is left unchanged.
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
    /// let mut tree = RBTree::from([String::from("a"), String::from("b")]);
    /// assert_eq!(tree.remove("a").as_deref(), Ok("a"));
    /// assert_eq!(tree.remove("a"), Err(TreeError::NotFound));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> Result<T, TreeError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Returns `true` if the tree contains a value equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([10, 20]);
    /// assert_eq!(tree.find(&20), Some(&20));
    /// assert_eq!(tree.find(&15), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(value)
    }
}

impl<T: Clone> Clone for RBTree<T> {
    fn clone(&self) -> Self {
        RBTree { raw: self.raw.clone() }
    }
}

impl<T> Default for RBTree<T> {
    fn default() -> Self {
        RBTree::new()
    }
}

impl<T: PartialEq> PartialEq for RBTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RBTree<T> {}

impl<T: fmt::Debug> fmt::Debug for RBTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders the tree one level per line, root first, each node as `B(value)` or `R(value)`.
///
/// # Examples
///
/// ```
/// use rb_index::RBTree;
///
/// let tree = RBTree::from([1, 2, 3, 4]);
/// assert_eq!(tree.to_string(), "B(2)\nB(1) B(3)\nR(4)");
/// ```
impl<T: fmt::Display> fmt::Display for RBTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.raw.levels().enumerate() {
            if depth > 0 {
                f.write_str("\n")?;
            }
            for (position, &handle) in level.iter().enumerate() {
                if position > 0 {
                    f.write_str(" ")?;
                }
                let node = self.raw.node(handle);
                let mark = match node.color() {
                    Color::Red => 'R',
                    Color::Black => 'B',
                };
                write!(f, "{mark}({})", node.value())?;
            }
        }
        Ok(())
    }
}

impl<T: Ord> FromIterator<T> for RBTree<T> {
    /// Builds a tree from `iter`, keeping the first of any duplicate values.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RBTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for RBTree<T> {
    /// Inserts every value from `iter`; values already present are skipped.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            // A duplicate leaves the tree unchanged.
            let _ = self.raw.insert(value);
        }
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for RBTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTree<T> {
    /// Converts a `[T; N]` into an `RBTree<T>`, dropping duplicates.
    ///
    /// ```
    /// use rb_index::RBTree;
    ///
    /// let tree = RBTree::from([3, 1, 3]);
    /// assert_eq!(tree.len(), 2);
    /// ```
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a RBTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.stack.pop()?;
        let next_subtree = self.tree.node(handle).child(self.side.opposite());
        self.tree.push_spine(next_subtree, self.side, &mut self.stack);
        self.remaining -= 1;
        Some(self.tree.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            side: self.side,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn display_of_empty_tree_is_empty() {
        let tree: RBTree<u8> = RBTree::new();
        assert_eq!(tree.to_string(), "");
    }

    #[test]
    fn display_shows_levels_and_colors() {
        let tree = RBTree::from([3, 2, 1]);
        assert_eq!(tree.to_string(), "B(2)\nR(1) R(3)");
    }

    #[test]
    fn iter_is_fused_and_exact() {
        let tree = RBTree::from([5, 1, 9]);
        let mut iter = tree.sorted(Direction::Descending);
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn iter_debug_lists_remaining_values() {
        let tree = RBTree::from([2, 1, 3]);
        let mut iter = tree.iter();
        iter.next();
        assert_eq!(format!("{iter:?}"), "[2, 3]");
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
    }

    #[test]
    fn equality_ignores_shape() {
        let ascending: RBTree<i32> = (0..32).collect();
        let descending: RBTree<i32> = (0..32).rev().collect();
        assert_eq!(ascending, descending);
        assert_ne!(ascending, RBTree::from([1]));
    }

    #[test]
    fn extend_by_reference_skips_duplicates() {
        let mut tree = RBTree::from([1, 2]);
        tree.extend(&[2, 3, 3]);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }
}
