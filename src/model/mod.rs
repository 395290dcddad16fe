//! Data model for rooted bifurcating phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Children are referenced by index from their
//! parent, and each non-root vertex keeps the index of its parent as plain
//! back-reference, so there is no cyclic ownership. The struct is thus
//! restricted to trees with at least two leaves.
//!
//! Leaves own their label as [String]. Internal vertices and the root carry
//! no label.
//!
//! # Metrics
//! Branch-length metrics (tree length, inverse tree length, inverse path
//! length to the root, vertex-to-branch-length map) are implemented on [Tree]
//! in the [metrics] module.

pub mod metrics;
pub mod tree;
pub mod vertex;

pub use metrics::DomainError;
pub use tree::Tree;
pub use tree::VertexIndex;
pub use vertex::BranchLength;
pub use vertex::Vertex;
