//! Vertices of a [Tree](crate::model::Tree) and their branch lengths.

use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

/// Parent of a non-root vertex until the vertex above it is added.
const PARENT_PENDING: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// One vertex of a rooted bifurcating tree.
///
/// - **Root**: two children; neither parent nor incoming branch
/// - **Internal**: parent, two children, optional branch length, no label
/// - **Leaf**: parent, label, optional branch length, no children
///
/// # Invariants
/// - `index` is the position of the vertex in the arena of its tree
/// - `parent` equals `PARENT_PENDING` only while the tree is being built,
///   [Vertex::parent] reports that as `None`
/// - Being the root is a matter of the variant, never of a zero branch length
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    Root {
        index: VertexIndex,
        children: (VertexIndex, VertexIndex),
    },
    Internal {
        index: VertexIndex,
        parent: VertexIndex,
        children: (VertexIndex, VertexIndex),
        /// Length of the branch to `parent`
        branch_length: Option<BranchLength>,
    },
    Leaf {
        index: VertexIndex,
        /// Taxon name
        label: String,
        parent: VertexIndex,
        /// Length of the branch to `parent`
        branch_length: Option<BranchLength>,
    },
}

impl Vertex {
    /// Creates the root above `children`.
    pub fn new_root(index: VertexIndex, children: (VertexIndex, VertexIndex)) -> Self {
        Vertex::Root { index, children }
    }

    /// Creates a non-root vertex above `children`, its parent still pending.
    pub fn new_internal(
        index: VertexIndex,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: PARENT_PENDING,
            children,
            branch_length,
        }
    }

    /// Creates a leaf named `label`, its parent still pending.
    pub fn new_leaf(
        index: VertexIndex,
        branch_length: Option<BranchLength>,
        label: impl Into<String>,
    ) -> Self {
        Vertex::Leaf {
            index,
            label: label.into(),
            parent: PARENT_PENDING,
            branch_length,
        }
    }

    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. }
            | Vertex::Internal { index, .. }
            | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns whether the incoming branch has a length.
    ///
    /// Trivially `true` for the root, which has no incoming branch to miss
    /// a length on.
    pub fn has_branch_length(&self) -> bool {
        self.is_root() || self.branch_length().is_some()
    }

    /// Returns the length of the incoming branch; `None` for the root and
    /// for unset lengths.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { .. } => None,
            Vertex::Internal { branch_length, .. } | Vertex::Leaf { branch_length, .. } => {
                *branch_length
            }
        }
    }

    /// Returns the length of the incoming branch, `0.0` for the root and
    /// for unset lengths.
    pub fn branch_length_or_zero(&self) -> f64 {
        self.branch_length().map_or(0.0, |bl| *bl)
    }

    /// Returns the label of a leaf, `None` otherwise.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Leaf { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` for vertices with both a parent and children.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children, `None` for a leaf.
    pub fn children(&self) -> Option<(VertexIndex, VertexIndex)> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(*children),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Replaces the children of a root or internal vertex. The parent links
    /// of the children are left to the caller.
    ///
    /// # Panics
    /// Panics on a leaf.
    pub fn set_children(&mut self, new_children: (VertexIndex, VertexIndex)) {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => {
                *children = new_children
            }
            Vertex::Leaf { index, .. } => panic!("Leaf vertex {index} has no children"),
        }
    }

    /// Points a non-root vertex to its parent.
    ///
    /// # Panics
    /// Panics on the root.
    pub fn set_parent(&mut self, new_parent: VertexIndex) {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => *parent = new_parent,
            Vertex::Root { index, .. } => panic!("Root vertex {index} has no parent"),
        }
    }

    /// Returns the parent, `None` for the root and while still pending.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                Some(*parent).filter(|&p| p != PARENT_PENDING)
            }
            Vertex::Root { .. } => None,
        }
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Length of the branch between a vertex and its parent.
///
/// Always non-negative and finite. Zero is allowed; whether a metric accepts
/// it is up to the metric.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// # Panics
    /// Panics if `length` is negative, NaN or infinite.
    pub fn new(length: f64) -> Self {
        Self::try_new(length).unwrap_or_else(|| {
            panic!("Branch length must be non-negative and finite, got {length}")
        })
    }

    /// Returns `None` if `length` is negative, NaN or infinite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }

    /// Returns `true` if strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl Deref for BranchLength {
    type Target = f64;

    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
