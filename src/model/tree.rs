//! Arena-based rooted bifurcating tree.
//!
//! * [Tree] - Owns all vertices in one vector, links are indices
//! * [VertexIndex] - Position of a vertex in that vector
//! * [PreOrderIter] and [PostOrderIter] - Depth-first traversals on an
//!   explicit stack, so deep trees do not overflow the call stack

use crate::model::vertex::{BranchLength, Vertex};
use crate::newick;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// Root index while the tree is still being built bottom-up.
const ROOT_PENDING: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted bifurcating phylogenetic tree stored as an arena of [Vertex].
///
/// Parents own their children by index; the parent index kept in each
/// non-root vertex is a plain back-reference, so there is no cyclic ownership.
///
/// # Structure
/// - With `n` leaves there are `n - 1` vertices with children, `2n - 1` in total.
/// - Arena order is insertion order. The parser inserts bottom-up, so
///   children always precede their parent and the root comes last, but no
///   method relies on that.
/// - Only leaves have a label.
/// - Branch lengths are optional, non-negative and finite; the root has none.
///
/// # Construction
/// Trees usually come from [crate::newick::parse_str]. By hand, size the
/// tree by its number of leaves and add vertices children first, the root
/// last; [`Tree::is_valid()`] checks the result.
///
/// # Example
/// ```
/// use nnitree::model::Tree;
/// use nnitree::model::vertex::BranchLength;
///
/// // ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new(3);
/// let a = tree.add_leaf(Some(BranchLength::new(0.2)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(0.2)), "B");
/// let c = tree.add_leaf(Some(BranchLength::new(0.4)), "C");
/// let ab = tree.add_internal_vertex((a, b), Some(BranchLength::new(0.2)));
/// tree.add_root((ab, c));
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    vertices: Vec<Vertex>,
    root_index: VertexIndex,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl Tree {
    /// Creates an empty tree with room for `num_leaves` leaves and all
    /// vertices above them.
    ///
    /// # Panics
    /// Panics if `num_leaves` is zero.
    pub fn new(num_leaves: usize) -> Self {
        assert!(num_leaves > 0, "Tree needs at least one leaf");
        Tree {
            vertices: Vec::with_capacity(2 * num_leaves - 1),
            root_index: ROOT_PENDING,
        }
    }

    /// Adds the root above `children` and returns its index.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or refers to a root.
    pub fn add_root(&mut self, children: (VertexIndex, VertexIndex)) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new_root(index, children));
        self.adopt(index, children);
        self.root_index = index;
        index
    }

    /// Adds a non-root vertex above `children` and returns its index.
    ///
    /// # Panics
    /// Panics if a child index is out of bounds or refers to a root.
    pub fn add_internal_vertex(
        &mut self,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));
        self.adopt(index, children);
        index
    }

    /// Adds a leaf and returns its index; its parent is set once the vertex
    /// above it is added.
    pub fn add_leaf(
        &mut self,
        branch_length: Option<BranchLength>,
        label: impl Into<String>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label));
        index
    }

    fn adopt(&mut self, parent: VertexIndex, (left, right): (VertexIndex, VertexIndex)) {
        self[left].set_parent(parent);
        self[right].set_parent(parent);
    }
}

// ============================================================================
// Accessors (pub)
// ============================================================================
impl Tree {
    /// Returns whether the root has been added.
    pub fn is_root_set(&self) -> bool {
        self.root_index != ROOT_PENDING
    }

    /// Returns the root vertex.
    ///
    /// # Panics
    /// Panics while the root has not been added.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns the vertex at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns the vertex at `index`, or `None` if out of bounds.
    pub fn get(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Returns the vertex at `index` mutably.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self[index]
    }

    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_leaf()).count()
    }

    /// Number of vertices with a parent and children, i.e. without the root.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_internal()).count()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates all vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Returns whether every branch (all vertices but the root) has a length.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.is_root() || v.has_branch_length())
    }

    /// Returns the other child of the parent of `index`; `None` for the root.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn sibling(&self, index: VertexIndex) -> Option<VertexIndex> {
        let (left, right) = self[self[index].parent()?].children()?;
        match (left == index, right == index) {
            (true, false) => Some(right),
            (false, true) => Some(left),
            _ => None,
        }
    }

    /// Leaf indices, left to right in stored child order.
    pub fn leaf_indices(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(Vertex::index)
            .collect()
    }

    /// Leaf labels, left to right in stored child order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter().filter_map(Vertex::label).collect()
    }

    /// Labels of the leaves below `index` (the vertex itself if it is a
    /// leaf), left to right.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn subtree_leaf_labels(&self, index: VertexIndex) -> Vec<&str> {
        self.pre_order_iter_from(index)
            .filter_map(Vertex::label)
            .collect()
    }

    /// Writes this tree as Newick string, see [newick::to_newick].
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl Tree {
    /// Checks that this is a well-formed rooted bifurcating tree:
    /// - Root is set and is the only [Vertex::Root]
    /// - Each vertex sits at the arena position given by its index
    /// - Child and parent links agree in both directions
    /// - Leaf labels are non-empty
    /// - `n` leaves for `2n - 1` vertices, all reachable from the root
    pub fn is_valid(&self) -> bool {
        match self.get(self.root_index) {
            Some(root) if root.is_root() => {}
            _ => return false,
        }

        let single_root = self.vertices.iter().filter(|v| v.is_root()).count() == 1;
        let linked = self
            .vertices
            .iter()
            .enumerate()
            .all(|(position, vertex)| vertex.index() == position && self.links_agree(vertex));
        let labelled = self
            .vertices
            .iter()
            .filter_map(Vertex::label)
            .all(|label| !label.is_empty());
        let bifurcating = self.num_leaves() == self.vertices.len().div_ceil(2);

        single_root
            && linked
            && labelled
            && bifurcating
            && self.pre_order_iter().count() == self.vertices.len()
    }

    /// Checks the links of one vertex against its children and its parent.
    fn links_agree(&self, vertex: &Vertex) -> bool {
        let index = vertex.index();

        if let Some((left, right)) = vertex.children() {
            let points_back =
                |child: VertexIndex| self.get(child).and_then(Vertex::parent) == Some(index);
            if left == right || !points_back(left) || !points_back(right) {
                return false;
            }
        }

        if vertex.is_root() {
            return true;
        }
        vertex
            .parent()
            .and_then(|parent| self.get(parent))
            .and_then(Vertex::children)
            .is_some_and(|(left, right)| left == index || right == index)
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// TRAVERSALS
// =$========================================================================$=
impl Tree {
    /// Iterates the tree children first, the root last.
    ///
    /// # Example
    /// ```
    /// use nnitree::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((A:1,B:1):2,C:3);").unwrap();
    /// let last = tree.post_order_iter().last().unwrap();
    /// assert!(last.is_root());
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter {
            tree: self,
            stack: self
                .is_root_set()
                .then_some(Visit::Enter(self.root_index))
                .into_iter()
                .collect(),
        }
    }

    /// Iterates the tree parents first, starting at the root.
    ///
    /// # Example
    /// ```
    /// use nnitree::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((A:1,B:1):2,C:3);").unwrap();
    /// let first = tree.pre_order_iter().next().unwrap();
    /// assert!(first.is_root());
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            pending: self.is_root_set().then_some(self.root_index).into_iter().collect(),
        }
    }

    /// Iterates the subtree below `index` parents first, starting at `index`.
    pub fn pre_order_iter_from(&self, index: VertexIndex) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            pending: vec![index],
        }
    }
}

/// Step of a post-order traversal.
enum Visit {
    /// Children of the vertex still have to be traversed
    Enter(VertexIndex),
    /// Children are done, the vertex is next
    Exit(VertexIndex),
}

/// Post-order traversal (children before parents, left before right).
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<Visit>,
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Visit::Exit(index) => return Some(&self.tree[index]),
                Visit::Enter(index) => match self.tree[index].children() {
                    None => return Some(&self.tree[index]),
                    Some((left, right)) => {
                        self.stack.push(Visit::Exit(index));
                        self.stack.push(Visit::Enter(right));
                        self.stack.push(Visit::Enter(left));
                    }
                },
            }
        }
    }
}

/// Pre-order traversal (parents before children, left before right).
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    pending: Vec<VertexIndex>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = &self.tree[self.pending.pop()?];
        if let Some((left, right)) = vertex.children() {
            self.pending.extend([right, left]);
        }
        Some(vertex)
    }
}
