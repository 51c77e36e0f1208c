use super::handle::{Handle, Link, is_sentinel};

/// The color of a red-black tree node. Sentinels are always black.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The real (non-sentinel) children of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ChildrenShape {
    NoChildren,
    LeftOnly(Handle),
    RightOnly(Handle),
    Twins(Handle, Handle),
}

/// A real tree node. Child slots holding `None` are sentinels.
#[derive(Clone)]
pub(crate) struct Node<T> {
    value: T,
    color: Color,
    // Non-owning back-reference; `None` only on the root.
    parent: Link,
    left: Link,
    right: Link,
}

impl<T> Node<T> {
    /// Creates a detached node with sentinel children.
    pub(crate) const fn new(value: T, color: Color) -> Self {
        Self {
            value,
            color,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Link) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs, or `None` if it is not a child of this node.
    ///
    /// A sentinel is never considered a child; every node has two of them.
    pub(crate) fn side_of(&self, child: Link) -> Option<Side> {
        if is_sentinel(child) {
            None
        } else if self.left == child {
            Some(Side::Left)
        } else if self.right == child {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub(crate) fn children_shape(&self) -> ChildrenShape {
        match (self.left, self.right) {
            (None, None) => ChildrenShape::NoChildren,
            (Some(left), None) => ChildrenShape::LeftOnly(left),
            (None, Some(right)) => ChildrenShape::RightOnly(right),
            (Some(left), Some(right)) => ChildrenShape::Twins(left, right),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_detached() {
        let node = Node::new(7, Color::Red);
        assert_eq!(*node.value(), 7);
        assert!(node.is_red());
        assert_eq!(node.parent(), None);
        assert_eq!(node.children_shape(), ChildrenShape::NoChildren);
    }

    #[test]
    fn side_lookup_ignores_sentinels() {
        let (l, r) = (Handle::from_index(1), Handle::from_index(2));
        let (left, right) = (Some(l), Some(r));
        let mut node = Node::new((), Color::Black);

        node.set_child(Side::Left, left);
        assert_eq!(node.children_shape(), ChildrenShape::LeftOnly(l));
        assert_eq!(node.side_of(left), Some(Side::Left));
        assert_eq!(node.side_of(None), None);

        node.set_child(Side::Right, right);
        assert_eq!(node.children_shape(), ChildrenShape::Twins(l, r));
        assert_eq!(node.side_of(right), Some(Side::Right));
        assert_eq!(node.side_of(Some(Handle::from_index(3))), None);

        node.set_child(Side::Left, None);
        assert_eq!(node.children_shape(), ChildrenShape::RightOnly(r));
        assert_eq!(node.child(Side::Right.opposite()), None);
    }
}
