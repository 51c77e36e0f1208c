/// The order in which values of an [`RBTree`](crate::RBTree) are visited.
///
/// # Examples
///
/// ```
/// use rb_index::{Direction, RBTree};
///
/// let tree = RBTree::from([2, 3, 1]);
/// let descending: Vec<_> = tree.sorted(Direction::Descending).copied().collect();
/// assert_eq!(descending, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}
