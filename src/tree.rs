//! An unbalanced BST of keys. Nodes are heap allocated once by [`Tree::insert`] and are never
//! moved, relinked or removed until the whole tree is dropped, so every [`Node`] handle handed
//! out by a search stays valid for as long as the tree is borrowed.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.get_minimum(), None);
//! assert!(tree.search_iterative(&1).is_none());
//!
//! for key in [10, 5, 15, 3, 7, 12, 18] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.get_minimum(), Some(&3));
//! assert_eq!(tree.search_iterative(&7).map(|n| *n.key()), Some(7));
//! assert!(tree.search_recursive(&99).is_none());
//! assert!(tree.is_valid_bst());
//!
//! // Equal keys are accepted and placed to the right, but the self-check demands strictly
//! // increasing keys.
//! tree.insert(7);
//! assert!(!tree.is_valid_bst());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::error::InvariantError;

/// A Binary Search Tree of keys. Keys smaller than a node go to its left subtree and keys greater
/// than or equal to it go to its right subtree. The tree never rebalances so its height is only
/// as good as the insertion order.
///
/// Mutation requires `&mut Tree`. To share a tree between threads wrap it in a lock of your
/// choosing.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

// SAFETY: A `Tree` uniquely owns every node reachable from its root, just like nested `Box`es
// would. Parent pointers never escape the tree's own nodes.
unsafe impl<K: Send> Send for Tree<K> {}
// SAFETY: Nothing reachable through `&Tree` can mutate a node.
unsafe impl<K: Sync> Sync for Tree<K> {}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        // Sorted input gives a tree as deep as it is long, so free nodes off an explicit stack
        // rather than recursing.
        let mut pending: Vec<NonNull<Node<K>>> = self.root.take().0.into_iter().collect();
        while let Some(ptr) = pending.pop() {
            // SAFETY: Every node was allocated with `Box::new` in `Node::new_boxed` and is
            // reachable from exactly one owning link, which we just took from it. So each node is
            // reconstructed and freed exactly once.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            pending.extend(node.left.0);
            pending.extend(node.right.0);
        }
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.in_order()).finish()
    }
}

impl<K: Ord> Extend<K> for Tree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for Tree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut tree = Self::new();
        tree.extend(keys);
        tree
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link::NONE,
            len: 0,
        }
    }

    /// The number of keys in the tree, counting repeated keys once per insertion.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root of the tree, if any key has been inserted.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.node()
    }

    /// Inserts `key` as a new leaf. The walk from the root goes left when `key` is smaller than
    /// the visited key and right otherwise, so a key equal to an existing one always lands in that
    /// node's right subtree.
    ///
    /// Insertion never fails and never rebalances: inserting sorted keys degrades the tree into a
    /// list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(5);
    /// tree.insert(5);
    ///
    /// let root = tree.root().unwrap();
    /// assert!(root.left().is_none());
    /// assert_eq!(root.right().map(|n| *n.key()), Some(5));
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut parent = Link::NONE;
        let mut current = self.root;
        let mut goes_left = false;
        let mut depth = 0usize;

        while let Some(node) = current.node() {
            goes_left = key < node.key;
            let next = if goes_left { node.left } else { node.right };
            parent = current;
            current = next;
            depth += 1;
        }

        let new_node = Link::from_box(Node::new_boxed(key, parent));
        match parent.node_mut() {
            None => self.root = new_node,
            Some(parent) if goes_left => parent.left = new_node,
            Some(parent) => parent.right = new_node,
        }
        self.len += 1;

        trace!(depth, len = self.len, "inserted key");
    }

    /// Returns the smallest key in the tree, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.get_minimum(), None);
    ///
    /// tree.insert(2);
    /// tree.insert(1);
    /// assert_eq!(tree.get_minimum(), Some(&1));
    /// ```
    pub fn get_minimum(&self) -> Option<&K> {
        let mut current = self.root()?;
        while let Some(left) = current.left() {
            current = left;
        }
        Some(&current.key)
    }

    /// Finds a node holding `key` by recursing from the root. Each level of the tree costs a
    /// stack frame, so a very deep (e.g. sorted-insert) tree can exhaust the stack. Prefer
    /// [`Tree::search_iterative`] for such trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.search_recursive(&3).map(|n| *n.key()), Some(3));
    /// assert!(tree.search_recursive(&42).is_none());
    /// ```
    pub fn search_recursive(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.root().and_then(|root| root.search(key))
    }

    /// Finds a node holding `key` with a loop from the root. Always agrees with
    /// [`Tree::search_recursive`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// let found = tree.search_iterative(&1).unwrap();
    /// assert_eq!(found.parent().map(|n| *n.key()), Some(2));
    /// assert!(tree.search_iterative(&42).is_none());
    /// ```
    pub fn search_iterative(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Whether an in-order walk of the tree yields strictly increasing keys. Empty and single-key
    /// trees are valid.
    ///
    /// Because equal keys are accepted by [`Tree::insert`] but are not strictly increasing, any
    /// tree holding a repeated key is reported invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let distinct: Tree<_> = [3, 1, 2].into_iter().collect();
    /// assert!(distinct.is_valid_bst());
    ///
    /// let repeated: Tree<_> = [5, 5].into_iter().collect();
    /// assert!(!repeated.is_valid_bst());
    /// ```
    pub fn is_valid_bst(&self) -> bool
    where
        K: Ord,
    {
        self.verify().is_ok()
    }

    /// Same check as [`Tree::is_valid_bst`] but reports where the in-order keys first stopped
    /// strictly increasing.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{InvariantError, Tree};
    ///
    /// let tree: Tree<_> = [5, 1, 5].into_iter().collect();
    /// assert_eq!(tree.verify(), Err(InvariantError::Duplicate { position: 2 }));
    /// ```
    pub fn verify(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        let keys: Vec<&K> = self.in_order().collect();

        let failure = keys
            .windows(2)
            .enumerate()
            .find_map(|(i, pair)| match pair[0].cmp(pair[1]) {
                Ordering::Less => None,
                Ordering::Equal => Some(InvariantError::Duplicate { position: i + 1 }),
                Ordering::Greater => Some(InvariantError::OutOfOrder { position: i + 1 }),
            });

        match failure {
            None => Ok(()),
            Some(err) => {
                debug!(%err, len = self.len, "tree failed validation");
                Err(err)
            }
        }
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has a
    /// height of 0.
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node<K>, usize)> = self.root().map(|n| (n, 1)).into_iter().collect();

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.left().map(|n| (n, depth + 1)));
            stack.extend(node.right().map(|n| (n, depth + 1)));
        }

        max_depth
    }

    /// Keys in left, self, right order.
    fn in_order(&self) -> InOrder<'_, K> {
        InOrder {
            stack: Vec::new(),
            descend: self.root(),
        }
    }
}

/// Explicit-stack in-order walk so validating a degenerate tree can't overflow the call stack.
struct InOrder<'a, K> {
    stack: Vec<&'a Node<K>>,
    descend: Option<&'a Node<K>>,
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.descend.take() {
            self.stack.push(node);
            self.descend = node.left();
        }

        let node = self.stack.pop()?;
        self.descend = node.right();
        Some(&node.key)
    }
}

/// A pointer to a node owned by the tree, or to nothing. The same type is used for the owning
/// `left`/`right` links and the observing `parent` link; only the `Tree`'s drop frees nodes, and
/// it follows `left`/`right` exclusively.
struct Link<K>(Option<NonNull<Node<K>>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Link<K> {}

impl<K> Link<K> {
    const NONE: Self = Link(None);

    fn from_box(node: Box<Node<K>>) -> Self {
        Link(Some(NonNull::from(Box::leak(node))))
    }

    fn node(&self) -> Option<&Node<K>> {
        // SAFETY: A non-`None` link always points at a live node: nodes are only freed when the
        // owning `Tree` is dropped, and the returned borrow can't outlive the borrow of the tree
        // (or of the node) that this link was read from. Mutable access only happens in
        // `Tree::insert`, which holds `&mut Tree` and so excludes every shared borrow.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node<K>> {
        // SAFETY: Same liveness argument as `node`. Callers hold `&mut Tree` and keep no other
        // reference into the tree alive while using the result.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

/// A read-only handle to a node in a [`Tree`], as returned by the searches. From here the
/// surrounding structure can be inspected.
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    parent: Link<K>,
}

// SAFETY: Nodes are only ever exposed behind shared references, which can't mutate them.
unsafe impl<K: Sync> Sync for Node<K> {}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("left", &self.left().map(Node::key))
            .field("right", &self.right().map(Node::key))
            .finish()
    }
}

impl<K> Node<K> {
    fn new_boxed(key: K, parent: Link<K>) -> Box<Self> {
        Box::new(Node {
            key,
            left: Link::NONE,
            right: Link::NONE,
            parent,
        })
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The root of the subtree of keys smaller than this one.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of the subtree of keys greater than or equal to this one.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The node this one hangs from. `None` for the root.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    fn search(&self, key: &K) -> Option<&Self>
    where
        K: Ord,
    {
        match key.cmp(&self.key) {
            Ordering::Less => self.left().and_then(|n| n.search(key)),
            Ordering::Equal => Some(self),
            Ordering::Greater => self.right().and_then(|n| n.search(key)),
        }
    }
}
