//! Shortcutting: compress an Eulerian circuit into a Hamiltonian tour.
//!
//! Keeping only the first visit of each vertex replaces every detour
//! `a -> ... -> b` through already-visited vertices with the direct edge
//! `a -> b`. Under the triangle inequality the direct edge is never
//! longer, so the tour is never longer than the circuit it came from.

use crate::types::Tour;

/// Keep the first occurrence of each vertex, rotate so the tour starts
/// at vertex 0 when it is present, and close the cycle.
///
/// The rotation does not change the tour length; it only makes output
/// comparable across runs and solvers.
#[must_use]
pub fn shortcut(circuit: &[usize], vertex_count: usize) -> Tour {
    let mut visited = vec![false; vertex_count];
    let mut order = Vec::with_capacity(vertex_count + 1);

    for &v in circuit {
        if !visited[v] {
            visited[v] = true;
            order.push(v);
        }
    }

    if let Some(pos) = order.iter().position(|&v| v == 0) {
        order.rotate_left(pos);
    }
    if let Some(&first) = order.first() {
        order.push(first);
    }

    Tour::new(order)
}
