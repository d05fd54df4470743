//! Exhaustive search: the optimal tour by enumerating every ordering.
//!
//! Vertex 0 is fixed as the start, so `(n - 1)!` orderings of the rest
//! are visited in lexicographic order. A partial tour is abandoned as soon
//! as its running length reaches the best complete tour found so far.
//! Only a strictly shorter tour replaces the incumbent, so among equal
//! optima the lexicographically first one is returned.

use crate::distance::DistanceMatrix;
use crate::types::{PipelineError, Tour};

/// Optimal tour from vertex 0.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the instance has more than
/// `max_cities` cities.
pub fn exhaustive_tour(
    distances: &DistanceMatrix,
    max_cities: usize,
) -> Result<Tour, PipelineError> {
    let n = distances.len();
    if n > max_cities {
        return Err(PipelineError::InvalidConfig(format!(
            "exhaustive search is limited to {max_cities} cities, got {n}"
        )));
    }
    if n == 0 {
        return Ok(Tour::new(Vec::new()));
    }

    let mut perm: Vec<usize> = (1..n).collect();
    let mut best_len = f64::INFINITY;
    let mut best = perm.clone();
    let mut visited: u64 = 0;

    loop {
        visited += 1;
        if let Some(len) = bounded_length(distances, &perm, best_len)
            && len < best_len
        {
            best_len = len;
            best.clone_from(&perm);
        }
        if !next_permutation(&mut perm) {
            break;
        }
    }

    log::debug!("exhaustive: {visited} orderings, best length {best_len:.6}");

    let mut order = Vec::with_capacity(n + 1);
    order.push(0);
    order.extend_from_slice(&best);
    order.push(0);
    Ok(Tour::new(order))
}

/// Length of the closed tour `0 -> perm.. -> 0`, or `None` once the
/// running sum reaches `bound`.
fn bounded_length(distances: &DistanceMatrix, perm: &[usize], bound: f64) -> Option<f64> {
    let mut len = 0.0;
    let mut prev = 0;
    for &v in perm {
        len += distances.get(prev, v);
        if len >= bound {
            return None;
        }
        prev = v;
    }
    Some(len + distances.get(prev, 0))
}

/// Advance `items` to the next lexicographic permutation in place.
///
/// Returns `false` (leaving `items` sorted descending) when `items` was
/// already the last permutation.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(swap) = items.iter().rposition(|&x| x > items[pivot]) else {
        return false;
    };
    items.swap(pivot, swap);
    items[pivot + 1..].reverse();
    true
}
