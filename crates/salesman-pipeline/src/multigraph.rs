//! Owned, mutable undirected multigraph consumed by the Eulerian circuit
//! builder.
//!
//! The circuit builder only needs three operations, captured by the
//! [`EulerGraph`] trait, so it does not depend on how adjacency is stored.
//! [`Multigraph`] stores a bag of neighbor indices per vertex; parallel
//! edges are separate entries in the bags.

use petgraph::unionfind::UnionFind;

use crate::mst::SpanningTree;
use crate::types::PipelineError;

/// Graph capability required by the Eulerian circuit builder.
///
/// Removing an edge instance must be visible from both endpoints at once:
/// after `pop_edge(u)` returns `Some(v)`, both `degree(u)` and `degree(v)`
/// have dropped by one (or by two for a self-loop at `u`).
pub trait EulerGraph {
    /// Number of unused edge instances incident to `v`.
    fn degree(&self, v: usize) -> usize;

    /// Remove one edge instance incident to `v` and return its other
    /// endpoint, or `None` if `v` has no unused edges.
    fn pop_edge(&mut self, v: usize) -> Option<usize>;

    /// Remove one edge instance between `u` and `v`. Returns `false` if
    /// no such instance exists.
    fn remove_edge(&mut self, u: usize, v: usize) -> bool;

    /// Number of unused edge instances in the whole graph.
    fn edge_count(&self) -> usize;
}

/// Undirected multigraph as per-vertex neighbor bags.
///
/// Each undirected edge instance appears once in each endpoint's bag.
/// [`pop_edge`](EulerGraph::pop_edge) takes the most recently inserted
/// neighbor (the bag is used as a stack).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multigraph {
    adjacency: Vec<Vec<usize>>,
    edges: usize,
}

impl Multigraph {
    /// An edgeless graph on `n` vertices.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            edges: 0,
        }
    }

    /// Tree edges followed by matching edges.
    ///
    /// Tree edges are inserted in child-index order, then matching pairs
    /// in emission order, so neighbor bags (and therefore the circuit)
    /// are deterministic.
    #[must_use]
    pub fn from_tree_and_matching(tree: &SpanningTree, matching: &[(usize, usize)]) -> Self {
        let mut graph = Self::new(tree.len());
        for (p, c) in tree.edges() {
            graph.add_edge(c, p);
        }
        for &(a, b) in matching {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Add one undirected edge instance between `u` and `v`.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edges += 1;
    }

    /// Neighbor bag of `v`, including parallel instances.
    #[must_use]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Returns `true` if every vertex has even degree.
    #[must_use]
    pub fn all_degrees_even(&self) -> bool {
        (0..self.vertex_count()).all(|v| self.degree(v) % 2 == 0)
    }

    /// Vertices of odd degree, ascending.
    #[must_use]
    pub fn odd_vertices(&self) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&v| self.degree(v) % 2 == 1)
            .collect()
    }

    /// Returns `true` if every vertex is reachable from every other.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let n = self.vertex_count();
        if n <= 1 {
            return true;
        }
        let mut uf = UnionFind::<usize>::new(n);
        let mut components = n;
        for (u, bag) in self.adjacency.iter().enumerate() {
            for &v in bag {
                if uf.union(u, v) {
                    components -= 1;
                }
            }
        }
        components == 1
    }

    /// Check the two preconditions of an Eulerian circuit: every degree is
    /// even and every vertex is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvariantViolation`] naming the first odd
    /// vertex, or reporting a disconnected graph.
    pub fn check_eulerian(&self) -> Result<(), PipelineError> {
        if let Some(&v) = self.odd_vertices().first() {
            return Err(PipelineError::InvariantViolation(format!(
                "vertex {v} has odd degree {} after matching",
                self.degree(v)
            )));
        }
        if !self.is_connected() {
            return Err(PipelineError::InvariantViolation(
                "tree and matching edges do not connect every vertex".to_owned(),
            ));
        }
        Ok(())
    }
}

impl EulerGraph for Multigraph {
    fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    fn pop_edge(&mut self, v: usize) -> Option<usize> {
        let u = self.adjacency[v].pop()?;
        // Drop the mirrored instance, keeping the bag's insertion order.
        // A self-loop stores `v` twice in its own bag; this drops the twin.
        if let Some(pos) = self.adjacency[u].iter().position(|&w| w == v) {
            self.adjacency[u].remove(pos);
        }
        self.edges -= 1;
        Some(u)
    }

    fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let Some(pos_u) = self.adjacency[u].iter().rposition(|&w| w == v) else {
            return false;
        };
        self.adjacency[u].remove(pos_u);
        if let Some(pos_v) = self.adjacency[v].iter().position(|&w| w == u) {
            self.adjacency[v].remove(pos_v);
        }
        self.edges -= 1;
        true
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}
