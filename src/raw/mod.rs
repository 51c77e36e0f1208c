mod arena;
mod handle;
mod node;
mod raw_rb_tree;

pub(crate) use node::{Color, Side};
pub(crate) use raw_rb_tree::{RawRBTree, Stack};
