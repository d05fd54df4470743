//! Incremental pipeline: advance the MST-and-matching tour builder
//! stage by stage, inspecting each intermediate result before continuing.
//!
//! ```rust
//! # use salesman_pipeline::{Pipeline, PipelineError, Point};
//! # fn run() -> Result<(), PipelineError> {
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(1.0, 0.0),
//! ];
//! let staged = Pipeline::new(points)
//!     .measure()?
//!     .span()
//!     .pair()?
//!     .traverse()?
//!     .shortcut()
//!     .into_result();
//! assert!((staged.length - 4.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state (or a
//! `Result` for fallible stages), carrying every previously computed
//! intermediate. Skipping or reordering stages is a compile-time error.
//!
//! Unlike [`crate::solve`], the pipeline does not short-circuit a single
//! city: every stage runs and the result is the trivial tour `[0, 0]`.

use crate::distance::DistanceMatrix;
use crate::euler;
use crate::mst::{self, SpanningTree};
use crate::multigraph::Multigraph;
use crate::parity;
use crate::shortcut;
use crate::types::{PipelineError, Point, StagedResult, Tour};

/// Vertex the Eulerian traversal starts from.
pub const START_VERTEX: usize = 0;

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing: the point set only.
#[must_use = "pipeline stages are consumed by advancing; call .measure() to continue"]
pub struct Pending {
    points: Vec<Point>,
}

impl Pending {
    /// The input points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Build the distance matrix and advance to [`Measured`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if there are no points.
    pub fn measure(self) -> Result<Measured, PipelineError> {
        if self.points.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let distances = DistanceMatrix::from_points(&self.points);
        log::debug!("pipeline.measure: done n={}", distances.len());
        Ok(Measured {
            points: self.points,
            distances,
        })
    }
}

// ───────────────────────── Stage 1: Measured ─────────────────────────

/// Pipeline state after building the distance matrix.
#[must_use = "pipeline stages are consumed by advancing; call .span() to continue"]
pub struct Measured {
    points: Vec<Point>,
    distances: DistanceMatrix,
}

impl Measured {
    /// The pairwise distance matrix.
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Build the minimum spanning tree and advance to [`Spanned`].
    pub fn span(self) -> Spanned {
        let tree = mst::prim(&self.distances);
        log::debug!(
            "pipeline.span: done edges={} weight={:.6}",
            tree.edge_count(),
            tree.weight(&self.distances)
        );
        Spanned {
            points: self.points,
            distances: self.distances,
            tree,
        }
    }
}

// ───────────────────────── Stage 2: Spanned ──────────────────────────

/// Pipeline state after building the minimum spanning tree.
#[must_use = "pipeline stages are consumed by advancing; call .pair() to continue"]
pub struct Spanned {
    points: Vec<Point>,
    distances: DistanceMatrix,
    tree: SpanningTree,
}

impl Spanned {
    /// The minimum spanning tree.
    #[must_use]
    pub const fn tree(&self) -> &SpanningTree {
        &self.tree
    }

    /// Find odd-degree vertices, match them greedily, and build the
    /// combined multigraph. Advances to [`Paired`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvariantViolation`] if the odd set cannot
    /// be fully matched, or if the multigraph is disconnected or still has
    /// an odd vertex. Both indicate a defect in the tree stage.
    pub fn pair(self) -> Result<Paired, PipelineError> {
        let odd = parity::odd_degree_vertices(&self.tree);
        let matching = parity::greedy_matching(&odd, &self.distances)?;
        let graph = Multigraph::from_tree_and_matching(&self.tree, &matching);
        graph.check_eulerian()?;
        log::debug!(
            "pipeline.pair: done odd={} pairs={} weight={:.6}",
            odd.len(),
            matching.len(),
            parity::matching_weight(&matching, &self.distances)
        );
        Ok(Paired {
            points: self.points,
            distances: self.distances,
            tree: self.tree,
            odd,
            matching,
            graph,
        })
    }
}

// ───────────────────────── Stage 3: Paired ───────────────────────────

/// Pipeline state after matching: tree edges plus matching edges form an
/// even-degree, connected multigraph.
#[must_use = "pipeline stages are consumed by advancing; call .traverse() to continue"]
pub struct Paired {
    points: Vec<Point>,
    distances: DistanceMatrix,
    tree: SpanningTree,
    odd: Vec<usize>,
    matching: Vec<(usize, usize)>,
    graph: Multigraph,
}

impl Paired {
    /// Odd-degree vertices of the tree, ascending.
    #[must_use]
    pub fn odd_vertices(&self) -> &[usize] {
        &self.odd
    }

    /// Matching pairs in emission order.
    #[must_use]
    pub fn matching(&self) -> &[(usize, usize)] {
        &self.matching
    }

    /// The combined multigraph, before the traversal consumes it.
    #[must_use]
    pub const fn multigraph(&self) -> &Multigraph {
        &self.graph
    }

    /// Extract the Eulerian circuit, consuming the multigraph. Advances to
    /// [`Traversed`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvariantViolation`] if the traversal
    /// leaves edges unused or misses a vertex.
    pub fn traverse(self) -> Result<Traversed, PipelineError> {
        let n = self.distances.len();
        let circuit = euler::eulerian_circuit(self.graph, START_VERTEX, n)?;
        log::debug!(
            "pipeline.traverse: done edges={} length={:.6}",
            circuit.len().saturating_sub(1),
            self.distances.walk_length(&circuit)
        );
        Ok(Traversed {
            points: self.points,
            distances: self.distances,
            tree: self.tree,
            odd: self.odd,
            matching: self.matching,
            circuit,
        })
    }
}

// ───────────────────────── Stage 4: Traversed ────────────────────────

/// Pipeline state after Eulerian circuit extraction.
#[must_use = "pipeline stages are consumed by advancing; call .shortcut() to continue"]
pub struct Traversed {
    points: Vec<Point>,
    distances: DistanceMatrix,
    tree: SpanningTree,
    odd: Vec<usize>,
    matching: Vec<(usize, usize)>,
    circuit: Vec<usize>,
}

impl Traversed {
    /// The Eulerian circuit as a closed vertex walk.
    #[must_use]
    pub fn circuit(&self) -> &[usize] {
        &self.circuit
    }

    /// Skip repeated visits and advance to the final [`Shortcut`] stage.
    pub fn shortcut(self) -> Shortcut {
        let tour = shortcut::shortcut(&self.circuit, self.distances.len());
        let length = self.distances.tour_length(&tour);
        log::debug!("pipeline.shortcut: done length={length:.6}");
        Shortcut {
            points: self.points,
            distances: self.distances,
            tree: self.tree,
            odd: self.odd,
            matching: self.matching,
            circuit: self.circuit,
            tour,
            length,
        }
    }
}

// ───────────────────────── Stage 5: Shortcut ─────────────────────────

/// Pipeline state after shortcutting -- the final stage.
///
/// Call [`into_result`](Self::into_result) to extract the
/// [`StagedResult`] containing all intermediates.
#[must_use = "call .into_result() to extract the StagedResult"]
pub struct Shortcut {
    points: Vec<Point>,
    distances: DistanceMatrix,
    tree: SpanningTree,
    odd: Vec<usize>,
    matching: Vec<(usize, usize)>,
    circuit: Vec<usize>,
    tour: Tour,
    length: f64,
}

impl Shortcut {
    /// The closed Hamiltonian tour.
    #[must_use]
    pub const fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Length of the tour.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Consume the pipeline and return the full [`StagedResult`].
    #[must_use]
    pub fn into_result(self) -> StagedResult {
        StagedResult {
            points: self.points,
            distances: self.distances,
            tree: self.tree,
            odd_vertices: self.odd,
            matching: self.matching,
            circuit: self.circuit,
            tour: self.tour,
            length: self.length,
        }
    }
}

/// Entry point for the stage-by-stage API.
///
/// Each stage method consumes the current state and returns the next,
/// making it a compile-time error to skip stages or call them out of
/// order.
pub struct Pipeline;

impl Pipeline {
    /// Create a new pipeline from a point set.
    ///
    /// No processing is performed; call [`.measure()`](Pending::measure)
    /// to begin.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(points: Vec<Point>) -> Pending {
        Pending { points }
    }
}
