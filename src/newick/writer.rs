//! Newick format writing.

use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use crate::newick::defs::{BUFFER_CHARS, NEWICK_TERMINATOR};

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Leaves are written as `label:length`, internal vertices as
/// `(left,right):length` and the root as `(left,right)`. Unset branch lengths
/// are omitted. Branch lengths use the shortest representation that parses
/// back to the same `f64`, so parsing the output reproduces the tree exactly.
///
/// # Example
/// ```
/// use nnitree::model::Tree;
/// use nnitree::model::vertex::BranchLength;
/// use nnitree::newick::to_newick;
///
/// let mut tree = Tree::new(2);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(2.5)), "B");
/// tree.add_root((a, b));
///
/// assert_eq!(to_newick(&tree), "(A:1,B:2.5);");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree));
    if tree.is_root_set() {
        write_clade(tree, &mut newick, tree.root_index());
    }
    newick.push(NEWICK_TERMINATOR);

    newick
}

/// Pending output while writing a clade.
enum Step {
    Open(VertexIndex),
    Comma,
    Close(VertexIndex),
}

/// Writes the clade below `top` without recursion.
fn write_clade(tree: &Tree, newick: &mut String, top: VertexIndex) {
    let mut steps = vec![Step::Open(top)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Open(index) => {
                let vertex = &tree[index];
                match (vertex.label(), vertex.children()) {
                    (Some(label), _) => {
                        newick.push_str(label);
                        push_branch_length(newick, vertex.branch_length());
                    }
                    (None, Some((left, right))) => {
                        newick.push('(');
                        steps.push(Step::Close(index));
                        steps.push(Step::Open(right));
                        steps.push(Step::Comma);
                        steps.push(Step::Open(left));
                    }
                    (None, None) => {}
                }
            }
            Step::Comma => newick.push(','),
            Step::Close(index) => {
                newick.push(')');
                // Root yields None, so gets no suffix
                push_branch_length(newick, tree[index].branch_length());
            }
        }
    }
}

fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Estimates the length of a Newick string for a given tree.
///
/// Accounts for structure, labels, and branch lengths; the estimate is used
/// to pre-allocate string capacity.
pub(crate) fn estimate_newick_len(tree: &Tree) -> usize {
    // Each internal vertex: "(,)"
    const INTERNAL_NODE_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let num_internal = tree.num_internal() + 1; // +1 for root
    let structure_capacity = num_internal * INTERNAL_NODE_CHARS;

    let label_capacity: usize = tree
        .vertices()
        .filter_map(|v| v.label())
        .map(str::len)
        .sum();

    let branch_capacity = if tree.vertices_have_branch_lengths() {
        tree.num_vertices().saturating_sub(1) * BRANCH_LENGTH_CHARS
    } else {
        0
    };

    structure_capacity + label_capacity + branch_capacity + BUFFER_CHARS
}
