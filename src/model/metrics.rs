//! Branch-length metrics of a [Tree].
//!
//! Additive metrics ([Tree::tree_length], [Tree::subtree_length]) count
//! unset branch lengths as zero. Inverse metrics divide by branch lengths and
//! thus require every non-root branch they touch to be set and strictly
//! positive, failing with [DomainError] otherwise. The root never contributes,
//! it is recognized structurally and not by a zero length.
//!
//! All traversals are stack-based, so deep trees do not recurse.

use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::Vertex;
use std::collections::BTreeMap;
use thiserror::Error;

/// Precondition of an inverse metric violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A non-root branch has length zero, so its inverse is undefined
    #[error("branch above vertex {vertex} has length zero, its inverse is undefined")]
    ZeroBranchLength { vertex: VertexIndex },
    /// A non-root branch has no length set
    #[error("branch above vertex {vertex} has no length")]
    MissingBranchLength { vertex: VertexIndex },
}

impl Tree {
    /// Returns the sum of all branch lengths in the tree.
    ///
    /// Root contributes nothing, unset branch lengths count as zero.
    ///
    /// # Example
    /// ```
    /// use nnitree::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((A:1,B:1):2,(C:1,D:1):2);").unwrap();
    /// assert_eq!(tree.tree_length(), 8.0);
    /// ```
    pub fn tree_length(&self) -> f64 {
        self.subtree_length(self.root_index())
    }

    /// Returns the sum of branch lengths in the subtree of the given vertex,
    /// including the vertex's own incoming branch.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn subtree_length(&self, index: VertexIndex) -> f64 {
        self.pre_order_iter_from(index)
            .map(Vertex::branch_length_or_zero)
            .sum()
    }

    /// Returns the sum of inverse branch lengths `1/bl` over all non-root branches.
    ///
    /// # Errors
    /// [DomainError] if a non-root branch length is zero or unset.
    pub fn inverse_tree_length(&self) -> Result<f64, DomainError> {
        self.inverse_subtree_length(self.root_index())
    }

    /// Returns the sum of inverse branch lengths `1/bl` over the subtree of the
    /// given vertex, including its own incoming branch unless it is the root.
    ///
    /// # Errors
    /// [DomainError] if a non-root branch length in the subtree is zero or unset.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn inverse_subtree_length(&self, index: VertexIndex) -> Result<f64, DomainError> {
        let mut sum = 0.0;
        for vertex in self.pre_order_iter_from(index) {
            if !vertex.is_root() {
                sum += inverse_branch_length(vertex)?;
            }
        }
        Ok(sum)
    }

    /// Returns the sum of inverse branch lengths `1/bl` on the path from the
    /// given vertex up to the root.
    ///
    /// # Errors
    /// [DomainError] if a branch length on the path is zero or unset.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn inverse_path_length(&self, index: VertexIndex) -> Result<f64, DomainError> {
        let mut sum = 0.0;
        let mut current = &self[index];
        while let Some(parent) = current.parent() {
            sum += inverse_branch_length(current)?;
            current = &self[parent];
        }
        Ok(sum)
    }

    /// Returns a map from every vertex (root, internal and leaves) to the
    /// length of its incoming branch; root and unset lengths map to `0.0`.
    pub fn branch_length_map(&self) -> BTreeMap<VertexIndex, f64> {
        self.pre_order_iter()
            .map(|vertex| (vertex.index(), vertex.branch_length_or_zero()))
            .collect()
    }
}

/// Returns `1/bl` for a non-root vertex.
pub(crate) fn inverse_branch_length(vertex: &Vertex) -> Result<f64, DomainError> {
    match vertex.branch_length() {
        None => Err(DomainError::MissingBranchLength {
            vertex: vertex.index(),
        }),
        Some(bl) if !bl.is_positive() => Err(DomainError::ZeroBranchLength {
            vertex: vertex.index(),
        }),
        Some(bl) => Ok(1.0 / *bl),
    }
}
