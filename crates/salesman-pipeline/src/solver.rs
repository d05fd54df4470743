//! Tour construction strategies.
//!
//! This module defines the [`TourSolver`] trait for pluggable solvers and
//! the [`SolverKind`] enum for runtime selection. Every solver reads the
//! same [`DistanceMatrix`] and returns a closed [`Tour`] starting at
//! vertex 0.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::euler;
use crate::exhaustive;
use crate::mst;
use crate::multigraph::Multigraph;
use crate::nearest_neighbor;
use crate::parity;
use crate::pipeline::START_VERTEX;
use crate::shortcut;
use crate::types::{PipelineConfig, PipelineError, Tour};

/// Selects which tour construction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverKind {
    /// Minimum spanning tree, greedy odd-vertex matching, Eulerian
    /// circuit, shortcut.
    ///
    /// Polynomial (O(n²) for the tree, O(k²) for k odd vertices). The
    /// matching is greedy, so no approximation ratio is guaranteed.
    #[default]
    Christofides,

    /// Start at vertex 0 and repeatedly move to the closest unvisited
    /// city. O(n²).
    NearestNeighbor,

    /// Enumerate every tour starting at vertex 0 and keep the shortest.
    ///
    /// Optimal but O((n - 1)!); rejected above
    /// [`PipelineConfig::max_exhaustive_cities`].
    Exhaustive,
}

impl SolverKind {
    /// Human-readable name used as the prefix of the textual report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Christofides => "Christofides-style",
            Self::NearestNeighbor => "Greedy (Nearest-Neighbor)",
            Self::Exhaustive => "Brute-force optimal",
        }
    }
}

/// Trait for tour construction strategies.
///
/// Input: the distance matrix of at least one city.
/// Output: a closed tour visiting every city once, starting at vertex 0.
pub trait TourSolver {
    /// Build a tour over every vertex of `distances`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the solver cannot run
    /// under `config`, or [`PipelineError::InvariantViolation`] if an
    /// internal stage breaks its contract.
    fn solve(
        &self,
        distances: &DistanceMatrix,
        config: &PipelineConfig,
    ) -> Result<Tour, PipelineError>;
}

impl TourSolver for SolverKind {
    fn solve(
        &self,
        distances: &DistanceMatrix,
        config: &PipelineConfig,
    ) -> Result<Tour, PipelineError> {
        match *self {
            Self::Christofides => christofides_tour(distances),
            Self::NearestNeighbor => Ok(nearest_neighbor::nearest_neighbor_tour(distances)),
            Self::Exhaustive => {
                exhaustive::exhaustive_tour(distances, config.max_exhaustive_cities)
            }
        }
    }
}

/// Run the MST-and-matching stages back to back without keeping the
/// intermediates.
///
/// [`Pipeline`](crate::Pipeline) runs the same stages one at a time.
///
/// # Errors
///
/// Returns [`PipelineError::InvariantViolation`] if matching or Eulerian
/// extraction fails its checks.
pub fn christofides_tour(distances: &DistanceMatrix) -> Result<Tour, PipelineError> {
    let n = distances.len();
    let tree = mst::prim(distances);
    let odd = parity::odd_degree_vertices(&tree);
    let matching = parity::greedy_matching(&odd, distances)?;
    let graph = Multigraph::from_tree_and_matching(&tree, &matching);
    graph.check_eulerian()?;
    let circuit = euler::eulerian_circuit(graph, START_VERTEX, n)?;
    Ok(shortcut::shortcut(&circuit, n))
}
