//! Source of randomness for focal vertex selection and NNI moves.
//!
//! [RandomSource] is the seam between this crate and the pseudorandom
//! generator. It is implemented for every [rand::Rng], so a seeded
//! [rand::rngs::StdRng] gives reproducible runs:
//!
//! ```
//! use nnitree::nni::RandomSource;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let draw = rng.exponential(0.1);
//! assert!(draw >= 0.0);
//! assert!(rng.choose_index(2) < 2);
//! ```

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand_distr::Exp1;

/// Draws needed by [NodeSampler](crate::nni::NodeSampler) and
/// [NniEngine](crate::nni::NniEngine).
pub trait RandomSource {
    /// Draws from an exponential distribution with the given mean (`1/rate`);
    /// the result is non-negative.
    fn exponential(&mut self, mean: f64) -> f64;

    /// Draws an index uniformly from `0..len`.
    ///
    /// # Panics
    /// May panic if `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Draws an index `i` with probability proportional to `weights[i]`.
    ///
    /// # Returns
    /// `None` if the weights are empty, negative, not finite or all zero.
    fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize>;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn exponential(&mut self, mean: f64) -> f64 {
        let draw: f64 = self.sample(Exp1);
        mean * draw
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        // WeightedIndex panics instead of failing on an infinite total
        if !weights.iter().sum::<f64>().is_finite() {
            return None;
        }
        WeightedIndex::new(weights)
            .ok()
            .map(|distribution| distribution.sample(self))
    }
}
