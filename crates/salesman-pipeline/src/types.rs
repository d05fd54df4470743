//! Shared types for the salesman tour construction pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::mst::SpanningTree;
use crate::solver::SolverKind;

/// A city location in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    ///
    /// Computed with `hypot`, so it stays finite wherever the coordinate
    /// differences are finite, even when their squares are not.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A closed tour: every city index exactly once, followed by the first
/// index again.
///
/// `Tour` does not validate on construction because solvers build it
/// incrementally; use [`is_closed_permutation`](Self::is_closed_permutation)
/// to check the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Create a tour from a vertex sequence (closing vertex included).
    #[must_use]
    pub const fn new(vertices: Vec<usize>) -> Self {
        Self(vertices)
    }

    /// The tour of a single-city instance: `[0, 0]`.
    #[must_use]
    pub fn trivial() -> Self {
        Self(vec![0, 0])
    }

    /// Returns the vertex sequence including the closing vertex.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the tour and returns the underlying vertex sequence.
    #[must_use]
    pub fn into_vertices(self) -> Vec<usize> {
        self.0
    }

    /// Number of entries in the sequence (cities + 1 for a closed tour).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first vertex, if any.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Iterate over the directed edges `(from, to)` of the tour.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Returns `true` if the tour visits each of `0..n` exactly once and
    /// ends where it started.
    #[must_use]
    pub fn is_closed_permutation(&self, n: usize) -> bool {
        let Some((&last, body)) = self.0.split_last() else {
            return false;
        };
        if body.len() != n || body.first() != Some(&last) {
            return false;
        }
        let mut seen = vec![false; n];
        for &v in body {
            if v >= n || seen[v] {
                return false;
            }
            seen[v] = true;
        }
        true
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Configuration for tour construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Which solver builds the tour.
    pub solver: SolverKind,

    /// Largest instance the exhaustive solver accepts.
    ///
    /// Enumeration is `(n - 1)!`; 11 cities is already 3.6 million
    /// permutations.
    pub max_exhaustive_cities: usize,
}

impl PipelineConfig {
    /// Default solver: the MST-and-matching heuristic.
    pub const DEFAULT_SOLVER: SolverKind = SolverKind::Christofides;

    /// Default cap on exhaustive enumeration.
    pub const DEFAULT_MAX_EXHAUSTIVE_CITIES: usize = 11;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            solver: Self::DEFAULT_SOLVER,
            max_exhaustive_cities: Self::DEFAULT_MAX_EXHAUSTIVE_CITIES,
        }
    }
}

/// Result of solving one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourResult {
    /// The closed tour.
    pub tour: Tour,
    /// Total Euclidean length of the tour.
    pub length: f64,
    /// Which solver produced it.
    pub solver: SolverKind,
}

impl TourResult {
    /// Format the result as the two-line textual report: the length with
    /// six decimals, then the tour order.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "{} Tour Length: {:.6}\nTour order: {}",
            self.solver.label(),
            self.length,
            self.tour,
        )
    }
}

/// Every intermediate of one staged MST-and-matching run.
///
/// Produced by [`Pipeline`](crate::Pipeline) or [`solve_staged`](crate::solve_staged)
/// for inspection, rendering, and diagnostics.
#[derive(Debug, Clone)]
pub struct StagedResult {
    /// The input points.
    pub points: Vec<Point>,
    /// Pairwise distances.
    pub distances: DistanceMatrix,
    /// Minimum spanning tree rooted at vertex 0.
    pub tree: SpanningTree,
    /// Odd-degree tree vertices, ascending.
    pub odd_vertices: Vec<usize>,
    /// Greedy matching pairs in emission order.
    pub matching: Vec<(usize, usize)>,
    /// Eulerian circuit over tree plus matching edges.
    pub circuit: Vec<usize>,
    /// Final shortcut tour.
    pub tour: Tour,
    /// Length of `tour`.
    pub length: f64,
}

impl StagedResult {
    /// Total weight of the spanning tree.
    #[must_use]
    pub fn tree_weight(&self) -> f64 {
        self.tree.weight(&self.distances)
    }

    /// Total weight of the matching edges.
    #[must_use]
    pub fn matching_weight(&self) -> f64 {
        crate::parity::matching_weight(&self.matching, &self.distances)
    }

    /// Length of the Eulerian circuit before shortcutting.
    #[must_use]
    pub fn circuit_length(&self) -> f64 {
        self.distances.walk_length(&self.circuit)
    }

    /// Drop the intermediates and keep the final tour.
    #[must_use]
    pub fn into_tour_result(self) -> TourResult {
        TourResult {
            tour: self.tour,
            length: self.length,
            solver: SolverKind::Christofides,
        }
    }
}

/// Errors that can occur while reading an instance or building a tour.
///
/// Uses custom `Serialize`/`Deserialize` so the error can be emitted in
/// JSON output alongside successful results.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The point source produced no points.
    #[error("no points in input")]
    EmptyInput,

    /// A token could not be read as a coordinate.
    #[error("malformed input on line {line}: {message}")]
    MalformedInput {
        /// 1-based line number of the offending token.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Configuration is invalid for the requested operation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An internal structure broke an invariant that construction should
    /// guarantee. Indicates a bug in an earlier stage.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Serde-compatible proxy for `PipelineError`.
#[derive(Serialize, Deserialize)]
enum PipelineErrorProxy {
    EmptyInput,
    MalformedInput { line: usize, message: String },
    InvalidConfig(String),
    InvariantViolation(String),
}

impl Serialize for PipelineError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::EmptyInput => PipelineErrorProxy::EmptyInput,
            Self::MalformedInput { line, message } => PipelineErrorProxy::MalformedInput {
                line: *line,
                message: message.clone(),
            },
            Self::InvalidConfig(s) => PipelineErrorProxy::InvalidConfig(s.clone()),
            Self::InvariantViolation(s) => PipelineErrorProxy::InvariantViolation(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PipelineErrorProxy::deserialize(deserializer)? {
            PipelineErrorProxy::EmptyInput => Self::EmptyInput,
            PipelineErrorProxy::MalformedInput { line, message } => {
                Self::MalformedInput { line, message }
            }
            PipelineErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
            PipelineErrorProxy::InvariantViolation(s) => Self::InvariantViolation(s),
        })
    }
}
