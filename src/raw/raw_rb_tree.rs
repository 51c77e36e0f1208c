use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{ChildrenShape, Color, Node, Side};
use crate::TreeError;

/// Explicit traversal stack. A red-black tree of `n` nodes is at most `2 * log2(n + 1)` deep,
/// so this only spills for very large trees.
pub(crate) type Stack = SmallVec<[Handle; 32]>;

/// The red-black tree backing `RBTree`.
///
/// Nodes live in an arena and refer to each other by [`Handle`]. Parent links are plain handles,
/// so there is no ownership cycle, and a `None` link is the black sentinel.
#[derive(Clone)]
pub(crate) struct RawRBTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Link,
    /// Number of values in the tree.
    len: usize,
}

impl<T> RawRBTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` values.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Link {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.nodes.get(handle).value()
    }

    /// Sentinels report black.
    #[inline]
    fn color_of(&self, link: Link) -> Color {
        link.map_or(Color::Black, |handle| self.nodes.get(handle).color())
    }

    #[inline]
    fn is_red(&self, link: Link) -> bool {
        self.color_of(link) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).set_color(color);
    }

    #[inline]
    fn parent_of(&self, handle: Handle) -> Link {
        self.nodes.get(handle).parent()
    }

    #[inline]
    fn child_of(&self, handle: Handle, side: Side) -> Link {
        self.nodes.get(handle).child(side)
    }

    /// Points `parent`'s `side` slot at `child` and `child`'s back-reference at `parent`.
    fn set_link(&mut self, parent: Handle, side: Side, child: Link) {
        self.nodes.get_mut(parent).set_child(side, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(parent));
        }
    }

    fn side_in_parent(&self, parent: Handle, child: Handle) -> Side {
        self.nodes
            .get(parent)
            .side_of(Some(child))
            .expect("`RawRBTree::side_in_parent()` - `child` is not a child of `parent`!")
    }

    /// Returns the other child of `parent`, which may be the sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    pub(crate) fn sibling_of(&self, parent: Handle, child: Handle) -> Link {
        let node = self.nodes.get(parent);
        let side = node
            .side_of(Some(child))
            .expect("`RawRBTree::sibling_of()` - `child` is not a child of `parent`!");
        node.child(side.opposite())
    }

    /// Replaces the link from `parent` to `child` with the sentinel and clears `child`'s
    /// back-reference.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    pub(crate) fn detach_child(&mut self, parent: Handle, child: Handle) {
        let side = self
            .nodes
            .get(parent)
            .side_of(Some(child))
            .expect("`RawRBTree::detach_child()` - `child` is not a child of `parent`!");
        self.nodes.get_mut(parent).set_child(side, None);
        self.nodes.get_mut(child).set_parent(None);
    }

    /// Puts `new` where `old` hangs: under `old`'s parent, or at the root.
    /// `old`'s own parent link is left for the caller to rewrite.
    fn replace_in_parent(&mut self, old: Handle, new: Link) {
        if let Some(parent) = self.parent_of(old) {
            let side = self.side_in_parent(parent, old);
            self.set_link(parent, side, new);
        } else {
            self.root = new;
            if let Some(new) = new {
                self.nodes.get_mut(new).set_parent(None);
            }
        }
    }

    /// Rotates `node` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, node: Handle, side: Side) {
        let riser = self
            .child_of(node, side.opposite())
            .expect("`RawRBTree::rotate()` - no child on the rising side!");
        let inner = self.child_of(riser, side);

        self.replace_in_parent(node, Some(riser));
        self.set_link(node, side.opposite(), inner);
        self.set_link(riser, side, Some(node));
    }

    /// Follows `side` links from `from` to the last real node.
    /// Returns that node and the number of links followed.
    pub(crate) fn extreme(&self, from: Handle, side: Side) -> (Handle, usize) {
        let mut current = from;
        let mut depth = 0;
        while let Some(next) = self.child_of(current, side) {
            current = next;
            depth += 1;
        }
        (current, depth)
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.root.map(|root| self.value(self.extreme(root, Side::Left).0))
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.root.map(|root| self.value(self.extreme(root, Side::Right).0))
    }

    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let root = self.root?;
        let (first, _) = self.extreme(root, Side::Left);
        Some(self.remove_at(first))
    }

    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let root = self.root?;
        let (last, _) = self.extreme(root, Side::Right);
        Some(self.remove_at(last))
    }

    /// Pushes `from` and its chain of `side` descendants onto `stack`.
    ///
    /// With `Side::Left` the next in-order node ends up on top; with `Side::Right` the next
    /// reverse-order node does.
    pub(crate) fn push_spine(&self, from: Link, side: Side, stack: &mut Stack) {
        let mut current = from;
        while let Some(handle) = current {
            stack.push(handle);
            current = self.child_of(handle, side);
        }
    }

    /// Returns the nodes of the tree one level at a time, root first.
    pub(crate) fn levels(&self) -> Levels<'_, T> {
        Levels {
            tree: self,
            current: self.root.into_iter().collect(),
        }
    }

    /// Number of levels; 0 for an empty tree.
    pub(crate) fn height(&self) -> usize {
        self.levels().count()
    }

    /// Black nodes on the path from the root to the leftmost sentinel, the root included.
    pub(crate) fn black_height(&self) -> usize {
        let mut count = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            count += usize::from(!node.is_red());
            current = node.left();
        }
        count
    }

    /// Removes the value held by `handle` and returns it.
    ///
    /// While the node holding the value has children, the value is swapped into the extreme
    /// node of a child subtree (the deeper one when both exist, the successor side on a tie), so
    /// the node finally spliced out is always childless.
    pub(crate) fn remove_at(&mut self, handle: Handle) -> T {
        let mut target = handle;
        loop {
            let replacement = match self.nodes.get(target).children_shape() {
                ChildrenShape::NoChildren => break,
                ChildrenShape::LeftOnly(left) => self.extreme(left, Side::Right).0,
                ChildrenShape::RightOnly(right) => self.extreme(right, Side::Left).0,
                ChildrenShape::Twins(left, right) => {
                    let (predecessor, left_depth) = self.extreme(left, Side::Right);
                    let (successor, right_depth) = self.extreme(right, Side::Left);
                    if left_depth > right_depth { predecessor } else { successor }
                }
            };

            let (target_node, replacement_node) = self.nodes.get_pair_mut(target, replacement);
            mem::swap(target_node.value_mut(), replacement_node.value_mut());
            target = replacement;
        }

        self.remove_leaf(target)
    }

    fn remove_leaf(&mut self, leaf: Handle) -> T {
        debug_assert_eq!(
            self.nodes.get(leaf).children_shape(),
            ChildrenShape::NoChildren,
            "`RawRBTree::remove_leaf()` - node has children!"
        );

        if let Some(parent) = self.parent_of(leaf) {
            let side = self.side_in_parent(parent, leaf);
            self.detach_child(parent, leaf);
            // Removing a black node shortens every path through `side`.
            if !self.nodes.get(leaf).is_red() {
                self.resolve_double_black(parent, side);
            }
        } else {
            self.root = None;
        }

        self.len -= 1;
        let node = self.nodes.take(leaf);
        debug_assert_eq!(self.nodes.len(), self.len, "`RawRBTree::remove_leaf()` - arena and len disagree!");
        node.into_value()
    }

    /// Restores equal black-heights after the subtree at `parent.side` lost one black node.
    fn resolve_double_black(&mut self, mut parent: Handle, mut side: Side) {
        loop {
            let sibling = self
                .child_of(parent, side.opposite())
                .expect("`RawRBTree::resolve_double_black()` - short side has no real sibling!");

            if self.is_red(Some(sibling)) {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                continue;
            }

            let near = self.child_of(sibling, side);
            let far = self.child_of(sibling, side.opposite());

            if let Some(far) = far.filter(|&far| self.is_red(Some(far))) {
                let parent_color = self.nodes.get(parent).color();
                self.set_color(sibling, parent_color);
                self.set_color(parent, Color::Black);
                self.set_color(far, Color::Black);
                self.rotate(parent, side);
                return;
            }

            if let Some(near) = near.filter(|&near| self.is_red(Some(near))) {
                // Turn the near red nephew into a far one and finish on the next pass.
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                continue;
            }

            self.set_color(sibling, Color::Red);
            if self.is_red(Some(parent)) {
                self.set_color(parent, Color::Black);
                return;
            }
            match self.parent_of(parent) {
                Some(grandparent) => {
                    side = self.side_in_parent(grandparent, parent);
                    parent = grandparent;
                }
                None => return,
            }
        }
    }
}

impl<T: Ord> RawRBTree<T> {
    /// Finds the node holding `value`.
    pub(crate) fn search<Q>(&self, value: &Q) -> Link
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match value.cmp(node.value().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(value).map(|handle| self.value(handle))
    }

    /// Hangs the detached `node` under `parent` on the side its value dictates.
    ///
    /// The slot must hold the sentinel. Equal values are rejected with
    /// [`TreeError::DuplicateElement`] and nothing is linked.
    pub(crate) fn attach_child(&mut self, parent: Handle, node: Handle) -> Result<Side, TreeError> {
        let side = match self.value(node).cmp(self.value(parent)) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Err(TreeError::DuplicateElement),
        };
        debug_assert!(
            self.child_of(parent, side).is_none(),
            "`RawRBTree::attach_child()` - child slot is occupied!"
        );
        self.set_link(parent, side, Some(node));
        Ok(side)
    }

    pub(crate) fn insert(&mut self, value: T) -> Result<(), TreeError> {
        let Some(mut parent) = self.root else {
            let root = self.nodes.alloc(Node::new(value, Color::Black));
            self.root = Some(root);
            self.len = 1;
            return Ok(());
        };

        loop {
            let node = self.nodes.get(parent);
            let next = match value.cmp(node.value()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Err(TreeError::DuplicateElement),
            };
            match next {
                Some(child) => parent = child,
                None => break,
            }
        }

        let handle = self.nodes.alloc(Node::new(value, Color::Red));
        if let Err(error) = self.attach_child(parent, handle) {
            self.nodes.take(handle);
            return Err(error);
        }
        self.len += 1;
        self.resolve_double_red(handle);
        Ok(())
    }

    /// Fixes a red `node` whose parent may also be red.
    fn resolve_double_red(&mut self, mut node: Handle) {
        loop {
            let Some(parent) = self.parent_of(node) else {
                self.set_color(node, Color::Black);
                return;
            };
            if !self.is_red(Some(parent)) {
                return;
            }

            let grandparent = self
                .parent_of(parent)
                .expect("`RawRBTree::resolve_double_red()` - a red node cannot be the root!");

            match self.sibling_of(grandparent, parent) {
                Some(uncle) if self.is_red(Some(uncle)) => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    // The grandparent may now clash with its own parent.
                    node = grandparent;
                }
                _ => {
                    self.restructure(node, parent, grandparent);
                    return;
                }
            }
        }
    }

    /// Trinode restructuring of a red `node` under a red `parent` with a black uncle.
    ///
    /// The three nodes are ordered by value into `low < middle < high`; `middle` takes the
    /// grandparent's place, black, with `low` and `high` as red children. The four subtrees
    /// hanging off the trio keep their in-order position, so children displaced from `middle`
    /// move under `low` and `high`.
    fn restructure(&mut self, node: Handle, parent: Handle, grandparent: Handle) {
        let mut trio = [node, parent, grandparent];
        trio.sort_unstable_by(|&a, &b| self.value(a).cmp(self.value(b)));
        let [low, middle, high] = trio;
        let in_trio = |link: Link| link.is_some_and(|handle| trio.contains(&handle));

        let low_right = self.child_of(low, Side::Right);
        let high_left = self.child_of(high, Side::Left);
        let subtrees = [
            self.child_of(low, Side::Left),
            if in_trio(low_right) { self.child_of(middle, Side::Left) } else { low_right },
            if in_trio(high_left) { self.child_of(middle, Side::Right) } else { high_left },
            self.child_of(high, Side::Right),
        ];

        self.replace_in_parent(grandparent, Some(middle));

        self.set_link(low, Side::Left, subtrees[0]);
        self.set_link(low, Side::Right, subtrees[1]);
        self.set_link(high, Side::Left, subtrees[2]);
        self.set_link(high, Side::Right, subtrees[3]);
        self.set_link(middle, Side::Left, Some(low));
        self.set_link(middle, Side::Right, Some(high));

        self.set_color(middle, Color::Black);
        self.set_color(low, Color::Red);
        self.set_color(high, Color::Red);
    }

    pub(crate) fn remove<Q>(&mut self, value: &Q) -> Result<T, TreeError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(value).ok_or(TreeError::NotFound)?;
        Ok(self.remove_at(handle))
    }
}

/// Level-order walk over the nodes of a [`RawRBTree`].
pub(crate) struct Levels<'a, T> {
    tree: &'a RawRBTree<T>,
    current: Vec<Handle>,
}

impl<T> Iterator for Levels<'_, T> {
    type Item = Vec<Handle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_empty() {
            return None;
        }

        let next = self
            .current
            .iter()
            .flat_map(|&handle| {
                let node = self.tree.node(handle);
                [node.left(), node.right()]
            })
            .flatten()
            .collect();

        Some(mem::replace(&mut self.current, next))
    }
}
