//! Minimum spanning tree over the complete distance graph (Prim, O(n²)).
//!
//! The graph is complete and dense, so the array-scan form of Prim's
//! algorithm beats a heap: each of the `n` rounds scans every vertex once
//! to pick the next one and once more to relax keys.
//!
//! Ties are broken by lowest vertex index. The scan keeps the first
//! strictly-smaller key it sees, and relaxation only replaces a key when
//! the new edge is strictly shorter, so the same matrix always yields the
//! same tree.

use petgraph::unionfind::UnionFind;

use crate::distance::DistanceMatrix;

/// A spanning tree rooted at vertex 0, stored as a parent mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    parent: Vec<Option<usize>>,
}

impl SpanningTree {
    /// Wrap a parent mapping. The root maps to `None`.
    #[must_use]
    pub const fn from_parents(parent: Vec<Option<usize>>) -> Self {
        Self { parent }
    }

    /// Number of vertices covered by the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` for the tree of an empty vertex set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Parent of `v`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parent.get(v).copied().flatten()
    }

    /// Iterate over tree edges as `(parent, child)`, in child-index order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(child, p)| p.map(|p| (p, child)))
    }

    /// Number of tree edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parent.iter().filter(|p| p.is_some()).count()
    }

    /// Total weight of the tree under `distances`.
    #[must_use]
    pub fn weight(&self, distances: &DistanceMatrix) -> f64 {
        self.edges().map(|(a, b)| distances.get(a, b)).sum()
    }

    /// Returns `true` if the edges form a connected, acyclic graph over
    /// every vertex: exactly `n - 1` edges, each joining two previously
    /// separate components.
    #[must_use]
    pub fn is_spanning(&self) -> bool {
        let n = self.len();
        if n == 0 {
            return true;
        }
        if self.edge_count() != n - 1 {
            return false;
        }
        let mut uf = UnionFind::<usize>::new(n);
        self.edges()
            .all(|(a, b)| a < n && uf.union(a, b))
    }
}

/// Build a minimum spanning tree rooted at vertex 0 with Prim's algorithm.
///
/// Returns an empty tree for an empty matrix and a lone root for a single
/// vertex.
#[must_use]
pub fn prim(distances: &DistanceMatrix) -> SpanningTree {
    let n = distances.len();
    let mut key = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];

    if n == 0 {
        return SpanningTree::from_parents(parent);
    }
    key[0] = 0.0;

    for _ in 0..n {
        let mut best = f64::INFINITY;
        let mut next = None;
        for v in 0..n {
            if !in_tree[v] && key[v] < best {
                best = key[v];
                next = Some(v);
            }
        }
        // Only reachable with non-finite distances (NaN coordinates).
        let Some(u) = next else {
            break;
        };
        in_tree[u] = true;

        for v in 0..n {
            let d = distances.get(u, v);
            if !in_tree[v] && d < key[v] {
                key[v] = d;
                parent[v] = Some(u);
            }
        }
    }

    SpanningTree::from_parents(parent)
}
