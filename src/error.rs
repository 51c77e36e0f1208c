use thiserror::Error;

/// Recoverable failures reported by [`RBTree`](crate::RBTree) operations.
///
/// The tree is left unchanged whenever one of these is returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeError {
    /// The value is already present; tree values must be unique.
    #[error("value is already present in the tree")]
    DuplicateElement,

    /// The value is not present in the tree.
    #[error("value was not found in the tree")]
    NotFound,

    /// The query needs at least one value but the tree is empty.
    #[error("tree is empty")]
    EmptyTree,
}
