//! Default configuration values for focal vertex selection.

/// Default mean of the exponential threshold draw (rate 10)
pub(crate) const DEFAULT_EXPONENTIAL_MEAN: f64 = 0.1;

/// Default bound on draws when looking for a non-root internal vertex
pub(crate) const DEFAULT_MAX_ATTEMPTS: usize = 10_000;
