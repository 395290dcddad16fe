//! Selection of the focal vertex of an NNI move.
//!
//! The default selection is biased towards short branches: a threshold is
//! drawn from an exponential distribution and the vertex with the longest
//! branch still below that threshold is taken. Since most mass of the
//! exponential lies near zero, short internal branches, which are the least
//! supported ones, get rearranged most often.

use crate::model::metrics::inverse_branch_length;
use crate::model::{DomainError, Tree, Vertex, VertexIndex};
use crate::nni::defs::{DEFAULT_EXPONENTIAL_MEAN, DEFAULT_MAX_ATTEMPTS};
use crate::nni::random::RandomSource;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Failure to select a vertex.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// No branch length is strictly below the drawn threshold
    #[error("no branch length below threshold {threshold}")]
    NoBranchBelowThreshold { threshold: f64 },
    /// Tree has no internal vertex other than the root, so there is no internal edge
    #[error("tree has no internal vertex besides the root")]
    NoInternalBranch,
    /// Every draw within the attempt budget hit the root or a leaf
    #[error("no internal vertex selected within {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
    /// Inverse branch lengths overflow, so they cannot serve as weights
    #[error("inverse branch length weights are not finite, total {total}")]
    NonFiniteWeights { total: f64 },
    /// Inverse branch lengths needed as weights are undefined
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Strategy to select the focal vertex of an NNI move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocalSelection {
    /// Exponential threshold draw favoring short branches,
    /// see [NodeSampler::pick_focal_vertex]
    #[default]
    ShortBranchBiased,
    /// Uniform over all non-root internal vertices
    Uniform,
    /// Proportional to the inverse branch length of non-root internal vertices
    InverseLength,
}

/// Branch-length-biased sampler of tree vertices.
///
/// # Configuration
/// * `with_mean(mean)` - Mean of the exponential threshold draw (default `0.1`)
/// * `with_max_attempts(n)` - Bound on draws in [NodeSampler::pick_focal_vertex]
///   (default `10_000`)
///
/// # Example
/// ```
/// use nnitree::nni::NodeSampler;
/// use nnitree::parse_newick_str;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let tree = parse_newick_str("((A:0.5,B:0.5):0.01,(C:0.5,D:0.5):0.02);").unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let sampler = NodeSampler::new().with_max_attempts(1_000);
/// let focal = sampler.pick_focal_vertex(&tree, &mut rng).unwrap();
/// assert!(tree[focal].is_internal());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSampler {
    mean: f64,
    max_attempts: usize,
}

impl Default for NodeSampler {
    fn default() -> Self {
        Self {
            mean: DEFAULT_EXPONENTIAL_MEAN,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl NodeSampler {
    /// Creates a new `NodeSampler` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mean of the exponential threshold draw.
    ///
    /// # Panics
    /// Panics if `mean` is not positive and finite.
    pub fn with_mean(mut self, mean: f64) -> Self {
        assert!(
            mean > 0.0 && mean.is_finite(),
            "Mean must be positive and finite, got {}",
            mean
        );
        self.mean = mean;
        self
    }

    /// Sets the bound on draws when looking for a non-root internal vertex.
    ///
    /// # Panics
    /// Panics if `max_attempts` is zero.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        assert!(max_attempts > 0, "Need at least one attempt");
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the mean of the exponential threshold draw.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the bound on draws.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Picks a vertex by branch length, possibly root or leaf.
    ///
    /// Draws `goal` from an exponential distribution, finds the largest
    /// branch length strictly below `goal` in [Tree::branch_length_map] and
    /// returns a vertex with that branch length. Ties are broken uniformly at
    /// random. The root counts with length zero.
    ///
    /// # Errors
    /// [SamplingError::NoBranchBelowThreshold] if no branch length is below `goal`.
    pub fn pick_start_vertex<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        self.draw_start_vertex(&tree.branch_length_map(), rng)
    }

    /// Draws one threshold against precomputed branch lengths.
    fn draw_start_vertex<R: RandomSource + ?Sized>(
        &self,
        branch_lengths: &BTreeMap<VertexIndex, f64>,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        let goal = rng.exponential(self.mean);

        let threshold = branch_lengths
            .values()
            .copied()
            .filter(|&length| length < goal)
            .reduce(f64::max)
            .ok_or(SamplingError::NoBranchBelowThreshold { threshold: goal })?;

        let ties: Vec<VertexIndex> = branch_lengths
            .iter()
            .filter(|&(_, &length)| length == threshold)
            .map(|(&index, _)| index)
            .collect();

        let vertex = if ties.len() == 1 {
            ties[0]
        } else {
            ties[rng.choose_index(ties.len())]
        };
        trace!(goal, threshold, ties = ties.len(), vertex, "picked start vertex");

        Ok(vertex)
    }

    /// Picks a non-root internal vertex by branch length.
    ///
    /// Repeats [NodeSampler::pick_start_vertex] until neither root nor leaf
    /// is returned. A draw without any branch below the threshold is
    /// resampled as well. Every draw counts towards the attempt bound.
    ///
    /// # Errors
    /// * [SamplingError::NoInternalBranch] right away if the tree has no
    ///   internal vertex besides the root
    /// * [SamplingError::AttemptsExhausted] after `max_attempts` draws
    pub fn pick_focal_vertex<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        if !tree.vertices().any(Vertex::is_internal) {
            return Err(SamplingError::NoInternalBranch);
        }

        let branch_lengths = tree.branch_length_map();
        for attempt in 1..=self.max_attempts {
            match self.draw_start_vertex(&branch_lengths, rng) {
                Ok(vertex) if tree[vertex].is_internal() => {
                    debug!(vertex, attempt, "selected focal vertex");
                    return Ok(vertex);
                }
                Ok(vertex) => trace!(vertex, attempt, "rejected root or leaf"),
                Err(err) => trace!(%err, attempt, "resampling threshold"),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "no internal vertex drawn, branches may be long compared to the mean {}", self.mean
        );
        Err(SamplingError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Picks a non-root internal vertex uniformly at random.
    ///
    /// # Errors
    /// [SamplingError::NoInternalBranch] if there is none.
    pub fn pick_uniform_internal<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        let candidates = internal_vertices(tree);
        if candidates.is_empty() {
            return Err(SamplingError::NoInternalBranch);
        }

        Ok(candidates[rng.choose_index(candidates.len())])
    }

    /// Picks a non-root internal vertex with probability proportional to the
    /// inverse of its branch length.
    ///
    /// # Errors
    /// * [SamplingError::NoInternalBranch] if there is none
    /// * [SamplingError::Domain] if an internal branch length is zero or unset
    /// * [SamplingError::NonFiniteWeights] if an inverse length or their sum
    ///   overflows, e.g. for subnormal branch lengths
    pub fn pick_inverse_length_internal<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        let candidates = internal_vertices(tree);
        if candidates.is_empty() {
            return Err(SamplingError::NoInternalBranch);
        }

        let weights = candidates
            .iter()
            .map(|&index| inverse_branch_length(&tree[index]))
            .collect::<Result<Vec<f64>, DomainError>>()?;

        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(SamplingError::NonFiniteWeights { total });
        }
        let chosen = rng
            .choose_weighted(&weights)
            .ok_or(SamplingError::NonFiniteWeights { total })?;

        Ok(candidates[chosen])
    }

    /// Picks a focal vertex according to the given strategy.
    pub fn select<R: RandomSource + ?Sized>(
        &self,
        selection: FocalSelection,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<VertexIndex, SamplingError> {
        match selection {
            FocalSelection::ShortBranchBiased => self.pick_focal_vertex(tree, rng),
            FocalSelection::Uniform => self.pick_uniform_internal(tree, rng),
            FocalSelection::InverseLength => self.pick_inverse_length_internal(tree, rng),
        }
    }

    /// Picks uniformly among the children of the given vertex that have
    /// children themselves.
    ///
    /// # Returns
    /// `None` if the vertex is a leaf, out of bounds, or has only leaves as children.
    pub fn pick_child_with_children<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        index: VertexIndex,
        rng: &mut R,
    ) -> Option<VertexIndex> {
        let (left, right) = tree.get(index)?.children()?;
        let candidates: Vec<VertexIndex> = [left, right]
            .into_iter()
            .filter(|&child| !tree[child].is_leaf())
            .collect();

        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => Some(candidates[rng.choose_index(candidates.len())]),
        }
    }
}

/// Returns non-root internal vertices in pre-order.
fn internal_vertices(tree: &Tree) -> Vec<VertexIndex> {
    tree.pre_order_iter()
        .filter(|v| v.is_internal())
        .map(Vertex::index)
        .collect()
}
