//! An ordered key store backed by a plain, unbalanced Binary Search Tree (BST),
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree stores keys in `Node`s. Every `Node` holds one key and
//! may have a left and a right child `Node`. The invariant that makes it a
//! *search* tree is:
//!
//! 1. For every `Node`, all the keys in its left subtree are less than its key.
//! 2. For every `Node`, all the keys in its right subtree are greater than or
//!    equal to its key. Equal keys always go right.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key and finding the minimum take `O(height)`, where `height`
//! is the longest path from the root `Node` to a leaf `Node`. This tree never
//! rebalances, so inserting keys in sorted order gives a height of `N`. Visiting
//! the left subtree, then the subtree root, then the right subtree yields the
//! keys in sorted order, which is how [`Tree::is_valid_bst`] checks the tree.
//!
//! Searching comes in two flavours, [`Tree::search_recursive`] and
//! [`Tree::search_iterative`], which always agree with each other.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod tree;

pub use error::InvariantError;
pub use tree::{Node, Tree};
