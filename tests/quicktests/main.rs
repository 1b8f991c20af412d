use ordered_tree::{InvariantError, Node, Tree};
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

fn build(xs: &[i8]) -> Tree<i8> {
    let mut tree = Tree::new();
    for x in xs {
        tree.insert(*x);
    }
    tree
}

/// Every key in `node`'s subtree, in no particular order.
fn subtree_keys(node: Option<&Node<i8>>) -> Vec<i8> {
    let mut keys = Vec::new();
    let mut stack: Vec<&Node<i8>> = node.into_iter().collect();
    while let Some(n) = stack.pop() {
        keys.push(*n.key());
        stack.extend(n.left());
        stack.extend(n.right());
    }
    keys
}

#[quickcheck]
fn insertion_placement(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    let mut stack: Vec<&Node<i8>> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        let left_ok = subtree_keys(node.left()).iter().all(|k| k < node.key());
        let right_ok = subtree_keys(node.right()).iter().all(|k| k >= node.key());
        if !left_ok || !right_ok {
            return false;
        }
        stack.extend(node.left());
        stack.extend(node.right());
    }

    subtree_keys(tree.root()).len() == xs.len() && tree.len() == xs.len()
}

#[quickcheck]
fn minimum(xs: Vec<i8>) -> bool {
    build(&xs).get_minimum() == xs.iter().min()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    xs.iter().all(|x| {
        tree.search_iterative(x).map(Node::key) == Some(x)
            && tree.search_recursive(x).map(Node::key) == Some(x)
    })
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = build(&xs);
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search_iterative(x).is_none() && tree.search_recursive(x).is_none())
}

#[quickcheck]
fn searches_agree(xs: Vec<i8>, queries: Vec<i8>) -> bool {
    let tree = build(&xs);

    queries.iter().chain(&xs).all(|q| {
        match (tree.search_recursive(q), tree.search_iterative(q)) {
            (Some(r), Some(i)) => std::ptr::eq(r, i),
            (None, None) => true,
            _ => false,
        }
    })
}

#[quickcheck]
fn distinct_keys_are_valid(xs: Vec<i8>) -> bool {
    let mut seen = HashSet::new();
    let distinct: Vec<i8> = xs.into_iter().filter(|x| seen.insert(*x)).collect();

    build(&distinct).is_valid_bst()
}

#[quickcheck]
fn repeated_keys_are_invalid(xs: Vec<i8>, repeat: i8) -> bool {
    let mut xs = xs;
    xs.push(repeat);
    xs.insert(0, repeat);

    let tree = build(&xs);
    !tree.is_valid_bst() && matches!(tree.verify(), Err(InvariantError::Duplicate { .. }))
}

#[test]
fn demo_scenario() {
    let tree = build(&[10, 5, 15, 3, 7, 12, 18]);

    assert_eq!(tree.get_minimum(), Some(&3));
    assert_eq!(tree.search_iterative(&7).map(Node::key), Some(&7));
    assert!(tree.search_iterative(&99).is_none());
    assert!(tree.is_valid_bst());
}

#[test]
fn duplicate_scenario() {
    let tree = build(&[5, 5]);

    assert_eq!(tree.len(), 2);
    assert!(!tree.is_valid_bst());
}

#[test]
fn empty_scenario() {
    let tree = build(&[]);

    assert_eq!(tree.get_minimum(), None);
    assert!(tree.is_valid_bst());
}
