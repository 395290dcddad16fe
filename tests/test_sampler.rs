mod common;

use nnitree::model::DomainError;
use nnitree::nni::{FocalSelection, NodeSampler, RandomSource, SamplingError};
use nnitree::parse_newick_str;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// Replays scripted draws, panics on any draw it was not given.
#[derive(Default)]
struct ScriptedSource {
    exponentials: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedSource {
    fn new(exponentials: &[f64], indices: &[usize]) -> Self {
        Self {
            exponentials: exponentials.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn exponential(&mut self, _mean: f64) -> f64 {
        self.exponentials.pop_front().expect("No exponential draw scripted")
    }

    fn choose_index(&mut self, len: usize) -> usize {
        let index = self.indices.pop_front().expect("No index draw scripted");
        assert!(index < len);
        index
    }

    fn choose_weighted(&mut self, _weights: &[f64]) -> Option<usize> {
        panic!("No weighted draw scripted")
    }
}

const SHORT_INTERNAL: &str = "((A:0.5,B:0.5):0.01,(C:0.5,D:0.5):0.2);";

// ============= pick_start_vertex =============
#[test]
fn test_start_vertex_is_longest_branch_below_goal() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let cd = common::clade_index(&tree, &["C", "D"]);
    let sampler = NodeSampler::new();

    // Unique candidates, so no index is drawn
    let mut rng = ScriptedSource::new(&[0.1, 0.3, 0.005], &[]);
    assert_eq!(sampler.pick_start_vertex(&tree, &mut rng), Ok(ab));
    assert_eq!(sampler.pick_start_vertex(&tree, &mut rng), Ok(cd));
    assert_eq!(
        sampler.pick_start_vertex(&tree, &mut rng),
        Ok(tree.root_index())
    );
}

#[test]
fn test_start_vertex_threshold_is_strict() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);

    // 0.2 itself is not below 0.2
    let mut rng = ScriptedSource::new(&[0.2], &[]);
    assert_eq!(NodeSampler::new().pick_start_vertex(&tree, &mut rng), Ok(ab));
}

#[test]
fn test_start_vertex_can_be_leaf() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let mut rng = ScriptedSource::new(&[0.9], &[2]);

    let vertex = NodeSampler::new().pick_start_vertex(&tree, &mut rng).unwrap();
    assert!(tree[vertex].is_leaf());
}

#[test]
fn test_start_vertex_ties_broken_by_draw() {
    let tree = parse_newick_str("((A:0.01,B:0.01):0.05,C:0.01);").unwrap();
    let mut tied = vec![
        common::leaf_index(&tree, "A"),
        common::leaf_index(&tree, "B"),
        common::leaf_index(&tree, "C"),
    ];
    tied.sort_unstable();

    for (draw, expected) in tied.iter().enumerate() {
        let mut rng = ScriptedSource::new(&[0.02], &[draw]);
        let vertex = NodeSampler::new().pick_start_vertex(&tree, &mut rng).unwrap();
        assert_eq!(vertex, *expected);
    }
}

#[test]
fn test_start_vertex_without_branch_below_goal() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let mut rng = ScriptedSource::new(&[0.0], &[]);

    assert_eq!(
        NodeSampler::new().pick_start_vertex(&tree, &mut rng),
        Err(SamplingError::NoBranchBelowThreshold { threshold: 0.0 })
    );
}

// ============= pick_focal_vertex =============
#[test]
fn test_focal_vertex_resamples_root_and_leaves() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let cd = common::clade_index(&tree, &["C", "D"]);

    // Root, no branch below 0, a leaf, then CD
    let mut rng = ScriptedSource::new(&[0.005, 0.0, 0.9, 0.3], &[0]);
    assert_eq!(NodeSampler::new().pick_focal_vertex(&tree, &mut rng), Ok(cd));
}

#[test]
fn test_focal_vertex_is_never_root_or_leaf() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let sampler = NodeSampler::new();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let focal = sampler.pick_focal_vertex(&tree, &mut rng).unwrap();
        assert!(tree[focal].is_internal(), "seed {seed} gave {focal}");
    }
}

#[test]
fn test_focal_vertex_prefers_short_branches() {
    let tree = parse_newick_str(SHORT_INTERNAL).unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let sampler = NodeSampler::new();
    let mut rng = StdRng::seed_from_u64(2024);

    let short_count = (0..1000)
        .filter(|_| sampler.pick_focal_vertex(&tree, &mut rng).unwrap() == ab)
        .count();

    // Expected ratio is roughly 6:1
    assert!(short_count > 750, "short branch picked {short_count} of 1000");
}

#[test]
fn test_focal_vertex_no_internal_branch() {
    let tree = parse_newick_str("(A:0.01,B:0.01);").unwrap();
    let mut rng = ScriptedSource::default();

    assert_eq!(
        NodeSampler::new().pick_focal_vertex(&tree, &mut rng),
        Err(SamplingError::NoInternalBranch)
    );
}

#[test]
fn test_focal_vertex_attempts_exhausted() {
    // All branches far above typical draws, so only the root qualifies
    let tree = parse_newick_str("((A:5,B:5):5,C:5);").unwrap();
    let sampler = NodeSampler::new().with_max_attempts(50);
    let mut rng = StdRng::seed_from_u64(9);

    assert_eq!(
        sampler.pick_focal_vertex(&tree, &mut rng),
        Err(SamplingError::AttemptsExhausted { attempts: 50 })
    );
}

#[test]
fn test_larger_mean_reaches_long_branches() {
    let tree = parse_newick_str("((A:5,B:5):1,C:5);").unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let sampler = NodeSampler::new().with_mean(2.0);
    let mut rng = StdRng::seed_from_u64(9);

    assert_eq!(sampler.pick_focal_vertex(&tree, &mut rng), Ok(ab));
}

// ============= Configuration =============
#[test]
fn test_sampler_defaults() {
    let sampler = NodeSampler::default();
    assert_eq!(sampler.mean(), 0.1);
    assert_eq!(sampler.max_attempts(), 10_000);

    let sampler = NodeSampler::new().with_mean(0.5).with_max_attempts(7);
    assert_eq!(sampler.mean(), 0.5);
    assert_eq!(sampler.max_attempts(), 7);
}

#[test]
#[should_panic]
fn test_non_positive_mean_panics() {
    NodeSampler::new().with_mean(0.0);
}

#[test]
#[should_panic]
fn test_zero_attempts_panics() {
    NodeSampler::new().with_max_attempts(0);
}

// ============= Alternative strategies =============
#[test]
fn test_uniform_selection_covers_all_internal_vertices() {
    let tree = parse_newick_str("((A:1,B:1):3,(C:1,D:1):3);").unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let cd = common::clade_index(&tree, &["C", "D"]);
    let sampler = NodeSampler::new();
    let mut rng = StdRng::seed_from_u64(31);

    let picks: Vec<_> = (0..100)
        .map(|_| {
            sampler
                .select(FocalSelection::Uniform, &tree, &mut rng)
                .unwrap()
        })
        .collect();

    assert!(picks.iter().all(|&v| v == ab || v == cd));
    assert!(picks.contains(&ab));
    assert!(picks.contains(&cd));
}

#[test]
fn test_uniform_selection_without_internal_vertex() {
    let tree = parse_newick_str("(A:1,B:1);").unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(
        NodeSampler::new().pick_uniform_internal(&tree, &mut rng),
        Err(SamplingError::NoInternalBranch)
    );
}

#[test]
fn test_inverse_length_selection_prefers_short_branches() {
    let tree = parse_newick_str("((A:1,B:1):0.01,(C:1,D:1):1);").unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let sampler = NodeSampler::new();
    let mut rng = StdRng::seed_from_u64(77);

    let short_count = (0..500)
        .filter(|_| {
            sampler
                .select(FocalSelection::InverseLength, &tree, &mut rng)
                .unwrap()
                == ab
        })
        .count();

    // Weight 100 against 1
    assert!(short_count > 450, "short branch picked {short_count} of 500");
}

#[test]
fn test_inverse_length_selection_rejects_zero_length() {
    let tree = parse_newick_str("((A:1,B:1):0,(C:1,D:1):1);").unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(
        NodeSampler::new().pick_inverse_length_internal(&tree, &mut rng),
        Err(SamplingError::Domain(DomainError::ZeroBranchLength {
            vertex: ab
        }))
    );
}

#[test]
fn test_inverse_length_selection_rejects_subnormal_length() {
    let tree = parse_newick_str("((A:1,B:1):1e-310,(C:1,D:1):1);").unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(
        NodeSampler::new().pick_inverse_length_internal(&tree, &mut rng),
        Err(SamplingError::NonFiniteWeights {
            total: f64::INFINITY
        })
    );
}

#[test]
fn test_inverse_length_selection_rejects_overflowing_total() {
    // Each weight is finite, their sum is not
    let tree = parse_newick_str("((A:1,B:1):1e-308,(C:1,D:1):1e-308);").unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let err = NodeSampler::new()
        .select(FocalSelection::InverseLength, &tree, &mut rng)
        .unwrap_err();
    assert!(matches!(err, SamplingError::NonFiniteWeights { total } if total.is_infinite()));
}

#[test]
fn test_choose_weighted_refuses_infinite_total() {
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(rng.choose_weighted(&[f64::MAX, f64::MAX]), None);
    assert_eq!(rng.choose_weighted(&[1.0, f64::INFINITY]), None);
    assert_eq!(rng.choose_weighted(&[0.0, 2.0]), Some(1));
}

// ============= pick_child_with_children =============
#[test]
fn test_child_with_children() {
    let tree = parse_newick_str("((A:1,B:1):1,C:1);").unwrap();
    let ab = common::clade_index(&tree, &["A", "B"]);
    let a = common::leaf_index(&tree, "A");
    let sampler = NodeSampler::new();

    // Single candidate, so no index is drawn
    let mut rng = ScriptedSource::default();
    assert_eq!(
        sampler.pick_child_with_children(&tree, tree.root_index(), &mut rng),
        Some(ab)
    );
    assert_eq!(sampler.pick_child_with_children(&tree, ab, &mut rng), None);
    assert_eq!(sampler.pick_child_with_children(&tree, a, &mut rng), None);
    assert_eq!(sampler.pick_child_with_children(&tree, 99, &mut rng), None);
}

#[test]
fn test_child_with_children_chooses_among_two() {
    let tree = parse_newick_str("((A:1,B:1):1,(C:1,D:1):1);").unwrap();
    let (left, right) = tree.root().children().unwrap();
    let sampler = NodeSampler::new();

    let mut rng = ScriptedSource::new(&[], &[0, 1]);
    assert_eq!(
        sampler.pick_child_with_children(&tree, tree.root_index(), &mut rng),
        Some(left)
    );
    assert_eq!(
        sampler.pick_child_with_children(&tree, tree.root_index(), &mut rng),
        Some(right)
    );
}
