//! Distance oracle: a dense symmetric matrix of pairwise Euclidean
//! distances.
//!
//! Every later stage reads distances through [`DistanceMatrix::get`], so
//! the square roots are paid once per pair.

use crate::types::{Point, Tour};

/// Dense `n x n` table of pairwise distances, stored row-major.
///
/// Symmetric with a zero diagonal. Derived from Euclidean distance, so it
/// satisfies the triangle inequality, which the shortcutting stage relies
/// on.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for a point set.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance(points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` for the matrix of an empty point set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between vertices `i` and `j`.
    ///
    /// Indices must be below [`len`](Self::len).
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Sum of consecutive distances along a vertex walk.
    ///
    /// For a closed tour (last vertex == first) this is the tour length.
    #[must_use]
    pub fn walk_length(&self, walk: &[usize]) -> f64 {
        walk.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }

    /// Total length of a closed tour.
    #[must_use]
    pub fn tour_length(&self, tour: &Tour) -> f64 {
        self.walk_length(tour.vertices())
    }
}
