//! Common test utilities
#![allow(dead_code)]

use nnitree::model::{Tree, VertexIndex};
use std::collections::BTreeSet;

/// Leaf label set of a tree
pub fn leaf_set(tree: &Tree) -> BTreeSet<String> {
    tree.leaf_labels().into_iter().map(str::to_owned).collect()
}

/// Clusters of a tree, i.e. the leaf label set below each non-leaf vertex.
///
/// Two rooted trees have the same topology iff their clusters agree.
pub fn clusters(tree: &Tree) -> BTreeSet<BTreeSet<String>> {
    tree.pre_order_iter()
        .filter(|v| !v.is_leaf())
        .map(|v| {
            tree.subtree_leaf_labels(v.index())
                .into_iter()
                .map(str::to_owned)
                .collect()
        })
        .collect()
}

/// Index of the non-leaf vertex whose clade is exactly the given labels
pub fn clade_index(tree: &Tree, labels: &[&str]) -> VertexIndex {
    let wanted: BTreeSet<&str> = labels.iter().copied().collect();
    tree.pre_order_iter()
        .find(|v| {
            !v.is_leaf()
                && tree
                    .subtree_leaf_labels(v.index())
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    == wanted
        })
        .map(|v| v.index())
        .expect("Clade not found")
}

/// Index of the leaf with the given label
pub fn leaf_index(tree: &Tree, label: &str) -> VertexIndex {
    tree.leaf_indices()
        .into_iter()
        .find(|&i| tree[i].label() == Some(label))
        .expect("Leaf not found")
}

/// Builds a caterpillar tree `(...((T0:l,T1:l):l,T2:l):l...,Tn-1:l);` with
/// all branch lengths set to `length`
pub fn caterpillar(num_leaves: usize, length: f64) -> String {
    let mut newick = format!("T0:{length}");
    for i in 1..num_leaves {
        newick = format!("({newick},T{i}:{length})");
        if i + 1 < num_leaves {
            newick.push_str(&format!(":{length}"));
        }
    }
    newick.push(';');
    newick
}
