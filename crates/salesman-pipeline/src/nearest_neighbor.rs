//! Nearest-neighbor tour: always move to the closest unvisited city.

use crate::distance::DistanceMatrix;
use crate::types::Tour;

/// Greedy tour from vertex 0.
///
/// At each step picks the unvisited vertex closest to the current one; on
/// equal distances the lowest index wins. Returns an empty tour for an
/// empty matrix.
#[must_use]
pub fn nearest_neighbor_tour(distances: &DistanceMatrix) -> Tour {
    let n = distances.len();
    if n == 0 {
        return Tour::new(Vec::new());
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n + 1);
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    for _ in 1..n {
        let mut best = f64::INFINITY;
        let mut next = None;
        for v in 0..n {
            if !visited[v] && distances.get(current, v) < best {
                best = distances.get(current, v);
                next = Some(v);
            }
        }
        let Some(v) = next else {
            break;
        };
        visited[v] = true;
        order.push(v);
        current = v;
    }

    order.push(0);
    Tour::new(order)
}
