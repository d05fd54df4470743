//! Degree parity analysis and greedy odd-vertex matching.
//!
//! An Eulerian circuit needs every vertex to have even degree. A spanning
//! tree always has an even number of odd-degree vertices (the degree sum
//! is `2(n - 1)`), so pairing them up and adding one edge per pair makes
//! every degree even.
//!
//! # Greedy, not minimum-weight
//!
//! [`greedy_matching`] pairs each unmatched odd vertex with its nearest
//! unmatched successor. This is **not** a minimum-weight perfect matching,
//! which would need a blossom-style algorithm, so the classical 3/2
//! approximation bound of Christofides' algorithm does not hold for the
//! tours built here. Swapping in an exact matcher only requires a
//! replacement for this function with the same input and output.

use crate::distance::DistanceMatrix;
use crate::mst::SpanningTree;
use crate::types::PipelineError;

/// Degree of every vertex in the tree, counting each parent/child pair
/// once on both endpoints.
#[must_use]
pub fn tree_degrees(tree: &SpanningTree) -> Vec<usize> {
    let mut degree = vec![0; tree.len()];
    for (p, c) in tree.edges() {
        degree[p] += 1;
        degree[c] += 1;
    }
    degree
}

/// Vertices of odd degree in the tree, in ascending index order.
#[must_use]
pub fn odd_degree_vertices(tree: &SpanningTree) -> Vec<usize> {
    tree_degrees(tree)
        .into_iter()
        .enumerate()
        .filter(|&(_, d)| d % 2 == 1)
        .map(|(v, _)| v)
        .collect()
}

/// Pair odd-degree vertices greedily by distance.
///
/// Walks `odd` in order. Each still-unmatched vertex is paired with the
/// closest unmatched vertex after it in `odd`; on equal distances the
/// earliest one wins. Returns the pairs in emission order.
///
/// # Errors
///
/// Returns [`PipelineError::InvariantViolation`] if a vertex is left
/// without a partner, which only happens when `odd` has odd length.
pub fn greedy_matching(
    odd: &[usize],
    distances: &DistanceMatrix,
) -> Result<Vec<(usize, usize)>, PipelineError> {
    let k = odd.len();
    let mut used = vec![false; k];
    let mut pairs = Vec::with_capacity(k / 2);

    for i in 0..k {
        if used[i] {
            continue;
        }

        let mut best = f64::INFINITY;
        let mut best_j = None;
        for j in (i + 1)..k {
            if used[j] {
                continue;
            }
            let d = distances.get(odd[i], odd[j]);
            if d < best {
                best = d;
                best_j = Some(j);
            }
        }

        let Some(j) = best_j else {
            return Err(PipelineError::InvariantViolation(format!(
                "odd-degree vertex {} has no matching partner ({k} odd vertices)",
                odd[i]
            )));
        };
        used[i] = true;
        used[j] = true;
        pairs.push((odd[i], odd[j]));
    }

    Ok(pairs)
}

/// Total length of the matching edges.
#[must_use]
pub fn matching_weight(pairs: &[(usize, usize)], distances: &DistanceMatrix) -> f64 {
    pairs.iter().map(|&(a, b)| distances.get(a, b)).sum()
}
