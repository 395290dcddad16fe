//! Nearest-neighbor interchange on a copy of a tree.

use crate::error::NniError;
use crate::model::{Tree, VertexIndex};
use crate::newick;
use crate::nni::random::RandomSource;
use crate::nni::sampler::{FocalSelection, NodeSampler};
use thiserror::Error;
use tracing::debug;

/// Focal vertex unsuitable for an interchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Index does not refer to a vertex of the tree
    #[error("vertex {vertex} does not exist")]
    UnknownVertex { vertex: VertexIndex },
    /// Root has no incoming branch to rearrange around
    #[error("vertex {vertex} is the root")]
    FocalIsRoot { vertex: VertexIndex },
    /// Leaf has no children to exchange
    #[error("vertex {vertex} is a leaf")]
    FocalIsLeaf { vertex: VertexIndex },
    /// Parent of the focal vertex does not list it as a child
    #[error("parent of vertex {vertex} is malformed")]
    MalformedParent { vertex: VertexIndex },
}

/// Performs NNI moves on bifurcating trees.
///
/// Every move works on an independent copy obtained by writing the input as
/// Newick and parsing it again; the input tree is never modified.
///
/// Around the incoming edge of the focal vertex `c2` with parent `p`,
/// sibling `c1` and children `gc1`, `gc2`, a move turns
/// `p(c1, c2(gc1, gc2))` into `p(c2(c1, gcY), gcX)`, where a fair coin
/// decides which grandchild becomes `gcX`. Vertex `c2` keeps its arena slot
/// and its branch length, as do all other vertices.
///
/// # Configuration
/// * `with_sampler(sampler)` - [NodeSampler] used to select the focal vertex
/// * `with_focal_selection(selection)` - [FocalSelection] strategy
///   (default [FocalSelection::ShortBranchBiased])
///
/// # Example
/// ```
/// use nnitree::nni::{FocalSelection, NniEngine};
/// use nnitree::parse_newick_str;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let tree = parse_newick_str("((A:1,B:1):2,(C:1,D:1):2);").unwrap();
/// let mut rng = StdRng::seed_from_u64(3);
///
/// let engine = NniEngine::new().with_focal_selection(FocalSelection::Uniform);
/// let rearranged = engine.nni(&tree, &mut rng).unwrap();
/// assert_eq!(rearranged.tree_length(), 8.0);
/// assert_eq!(rearranged.num_leaves(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NniEngine {
    sampler: NodeSampler,
    focal_selection: FocalSelection,
}

impl NniEngine {
    /// Creates a new `NniEngine` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampler used to select the focal vertex.
    pub fn with_sampler(mut self, sampler: NodeSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the focal vertex selection strategy.
    pub fn with_focal_selection(mut self, focal_selection: FocalSelection) -> Self {
        self.focal_selection = focal_selection;
        self
    }

    /// Returns the sampler.
    pub fn sampler(&self) -> &NodeSampler {
        &self.sampler
    }

    /// Returns the focal vertex selection strategy.
    pub fn focal_selection(&self) -> FocalSelection {
        self.focal_selection
    }

    /// Returns a rearranged copy of `tree`, the focal vertex selected by the
    /// configured strategy.
    ///
    /// # Errors
    /// * [NniError::Sampling] if no focal vertex can be selected
    /// * [NniError::Structural] if the selected vertex cannot be rearranged around
    /// * [NniError::Parsing] if the copy cannot be read back, e.g. for labels
    ///   set by hand that Newick cannot carry
    pub fn nni<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        rng: &mut R,
    ) -> Result<Tree, NniError> {
        let mut copy = isolated_copy(tree)?;
        let focal = self.sampler.select(self.focal_selection, &copy, rng)?;
        interchange(&mut copy, focal, rng)?;
        Ok(copy)
    }

    /// Returns a rearranged copy of `tree` around the incoming edge of `focal`.
    ///
    /// `focal` indexes the input tree; the corresponding vertex of the copy
    /// is the one at the same pre-order position.
    ///
    /// # Errors
    /// * [NniError::Structural] if `focal` does not exist, is the root or a leaf
    /// * [NniError::Parsing] if the copy cannot be read back
    pub fn nni_at<R: RandomSource + ?Sized>(
        &self,
        tree: &Tree,
        focal: VertexIndex,
        rng: &mut R,
    ) -> Result<Tree, NniError> {
        let position = tree
            .pre_order_iter()
            .position(|v| v.index() == focal)
            .ok_or(StructuralError::UnknownVertex { vertex: focal })?;

        let mut copy = isolated_copy(tree)?;
        let copy_focal = copy
            .pre_order_iter()
            .nth(position)
            .map(|v| v.index())
            .ok_or(StructuralError::UnknownVertex { vertex: focal })?;

        interchange(&mut copy, copy_focal, rng)?;
        Ok(copy)
    }
}

/// Returns a tree sharing no state with `tree`, built from its Newick form.
fn isolated_copy(tree: &Tree) -> Result<Tree, NniError> {
    Ok(newick::parse_str(tree.to_newick())?)
}

/// Relinks the neighborhood of `c2` in place.
fn interchange<R: RandomSource + ?Sized>(
    tree: &mut Tree,
    c2: VertexIndex,
    rng: &mut R,
) -> Result<(), StructuralError> {
    let focal = tree
        .get(c2)
        .ok_or(StructuralError::UnknownVertex { vertex: c2 })?;
    if focal.is_root() {
        return Err(StructuralError::FocalIsRoot { vertex: c2 });
    }
    let (gc1, gc2) = focal
        .children()
        .ok_or(StructuralError::FocalIsLeaf { vertex: c2 })?;
    let p = focal
        .parent()
        .ok_or(StructuralError::MalformedParent { vertex: c2 })?;
    let c1 = tree
        .sibling(c2)
        .ok_or(StructuralError::MalformedParent { vertex: c2 })?;

    let (to_parent, to_focal) = if rng.choose_index(2) == 0 {
        (gc1, gc2)
    } else {
        (gc2, gc1)
    };

    tree[p].set_children((c2, to_parent));
    tree[c2].set_children((c1, to_focal));
    tree[c1].set_parent(c2);
    tree[to_focal].set_parent(c2);
    tree[to_parent].set_parent(p);

    debug!(
        focal = c2,
        parent = p,
        sibling = c1,
        moved_up = to_parent,
        "performed NNI"
    );
    Ok(())
}
