//! A red-black tree ordered index and a thread-safe map built on it.
//!
//! This crate provides two collections:
//!
//! - [`RBTree`] - an ordered set of unique values that keeps itself balanced, with
//!   [`min`](RBTree::min)/[`max`](RBTree::max), lazy [`sorted`](RBTree::sorted) traversal in
//!   either [`Direction`], and bounded [`ascending`](RBTree::ascending) and
//!   [`descending`](RBTree::descending) walks.
//! - [`ConcurrentOrderedMap`] - a hash map shared between threads that mirrors its keys in an
//!   [`RBTree`], so the values under the `n` lowest or highest keys can be listed without
//!   sorting.
//!
//! [`LockedMap`] is the same locked hash map without the ordering index.
//!
//! # Example
//!
//! ```
//! use rb_index::{ConcurrentOrderedMap, RBTree, TreeError};
//!
//! let mut tree = RBTree::new();
//! tree.insert_all([20, 10, 30])?;
//! assert_eq!(tree.insert(10), Err(TreeError::DuplicateElement));
//! assert_eq!(tree.max(), Ok(&30));
//!
//! let prices = ConcurrentOrderedMap::new();
//! prices.set("pear", 3);
//! prices.set("apple", 5);
//! prices.set("fig", 9);
//!
//! // Values of the two alphabetically first keys.
//! assert_eq!(prices.ascending(2), [5, 9]);
//! # Ok::<(), TreeError>(())
//! ```
//!
//! # Implementation
//!
//! Tree nodes live in an arena and link to each other, and back to their parent, through
//! integer handles. Empty child links stand in for the black sentinel leaves of the textbook
//! structure. Rebalancing after an insertion recolors or restructures a trinode; a removal
//! first moves the doomed value down to a childless node and then repairs the black height
//! with rotations and recoloring, so the tree stays within `2 * log2(n + 1)` levels.
//!
//! The logging facade is [`log`]; the crate never installs a logger itself.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod direction;
mod error;
mod locked_map;
mod ordered_map;
mod raw;

pub mod rb_tree;

pub use direction::Direction;
pub use error::TreeError;
pub use locked_map::LockedMap;
pub use ordered_map::ConcurrentOrderedMap;
pub use rb_tree::RBTree;
