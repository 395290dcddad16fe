//! Nnitree is a library to parse rooted bifurcating phylogenetic trees from
//! Newick strings, measure their branch lengths and rearrange them by
//! nearest-neighbor interchange (NNI).
//!
//! Core functionality provided:
//! - Newick: Parse single bifurcating Newick strings and write trees back.
//! - Tree model: [Tree] stores [Vertex]es in an arena, so no direct vertex
//!   references are stored, only vertex indices. See [crate::model].
//! - Metrics: Tree length, inverse tree length, inverse path length to the
//!   root and a map from vertices to branch lengths.
//! - Sampling: Select vertices biased towards short branches, the
//!   least supported parts of a tree.
//! - NNI: Produce an independent copy of a tree with one internal edge
//!   rearranged, as a proposal move for tree search.
//!
//! Limitations:
//! - Only bifurcating trees
//! - Only leaf labels considered
//! - No comments or quoted labels in Newick strings
//!
//! # Usage patterns
//! 1. Quick functions with default settings: [parse_newick_str] and [nni].
//! 2. Configure a [NodeSampler](crate::nni::NodeSampler) and an
//!    [NniEngine](crate::nni::NniEngine) for control over the threshold mean,
//!    retry bound and focal vertex strategy.
//!
//! ## Example Default Configuration
//! ```
//! use nnitree::{nni, parse_newick_str};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let tree = parse_newick_str("((A:0.3,B:0.3):0.02,(C:0.4,D:0.4):0.05);").unwrap();
//! assert_eq!(tree.leaf_labels(), vec!["A", "B", "C", "D"]);
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let rearranged = nni(&tree, &mut rng).unwrap();
//! assert_eq!(rearranged.num_leaves(), 4);
//! ```
//!
//! ## Example Engine Configuration
//! ```
//! use nnitree::nni::{FocalSelection, NniEngine, NodeSampler};
//! use nnitree::parse_newick_str;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let engine = NniEngine::new()
//!     .with_sampler(NodeSampler::new().with_mean(0.5).with_max_attempts(500))
//!     .with_focal_selection(FocalSelection::ShortBranchBiased);
//!
//! let tree = parse_newick_str("((A:1,B:1):0.2,(C:1,D:1):0.3);")?;
//! let mut rng = StdRng::seed_from_u64(5);
//! let rearranged = engine.nni(&tree, &mut rng)?;
//! assert_eq!(rearranged.tree_length(), tree.tree_length());
//! # Ok::<(), nnitree::error::NniError>(())
//! ```

pub mod error;
pub mod model;
pub mod newick;
pub mod nni;
pub mod parser;

pub use crate::error::NniError;
pub use crate::model::{BranchLength, Tree, Vertex, VertexIndex};
pub use crate::parser::ParsingError;

use crate::nni::{NniEngine, RandomSource};

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

// ============================================================================
// Quick NNI API
// ============================================================================
/// Returns a copy of `tree` rearranged by one NNI move, using an
/// [NniEngine] with default settings.
///
/// See [`NniEngine::nni`] for full documentation of this convenience function.
pub fn nni<R: RandomSource + ?Sized>(tree: &Tree, rng: &mut R) -> Result<Tree, NniError> {
    NniEngine::new().nni(tree, rng)
}
