//! Branch-length-biased selection of vertices and nearest-neighbor interchange.
//!
//! # Overview
//! * [NodeSampler] - Selects vertices, by default favoring short branches
//! * [NniEngine] - Returns a rearranged, independent copy of a tree
//! * [RandomSource] - Randomness consumed by both, implemented for every [rand::Rng]
//!
//! All randomness is passed in explicitly; seeding the generator makes
//! selection and rearrangement reproducible.
//!
//! # Example
//! ```
//! use nnitree::nni::{NniEngine, NodeSampler};
//! use nnitree::parse_newick_str;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let tree = parse_newick_str("((A:0.5,B:0.5):0.01,(C:0.5,D:0.5):0.02);").unwrap();
//! let mut rng = StdRng::seed_from_u64(11);
//!
//! let engine = NniEngine::new().with_sampler(NodeSampler::new().with_mean(0.05));
//! let rearranged = engine.nni(&tree, &mut rng).unwrap();
//! assert_eq!(rearranged.tree_length(), tree.tree_length());
//! ```

mod defs;
pub mod engine;
pub mod random;
pub mod sampler;

pub use self::engine::{NniEngine, StructuralError};
pub use self::random::RandomSource;
pub use self::sampler::{FocalSelection, NodeSampler, SamplingError};
