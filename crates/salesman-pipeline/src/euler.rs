//! Eulerian circuit extraction with a stack-based Hierholzer traversal.
//!
//! The traversal is an explicit loop over an explicit stack, so deep
//! graphs cannot overflow the call stack. Each iteration is in one of two
//! states, decided by the vertex on top of the stack:
//!
//! - **exploring** -- the vertex still has an unused edge instance: take
//!   it (removing it from both endpoints) and push the neighbor.
//! - **backtrack** -- the vertex has no unused edges: pop it and append
//!   it to the circuit.
//!
//! The loop ends when the stack is empty. Vertices are appended on the
//! way back out, so the circuit is reversed before it is returned.

use crate::multigraph::EulerGraph;
use crate::types::PipelineError;

/// Run Hierholzer's traversal from `start`, consuming edges of `graph`.
///
/// Returns the vertex sequence of the closed walk. Edges unreachable from
/// `start` are left in `graph`; [`eulerian_circuit`] turns that into an
/// error.
pub fn hierholzer<G: EulerGraph>(graph: &mut G, start: usize) -> Vec<usize> {
    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(graph.edge_count() + 1);

    while let Some(&top) = stack.last() {
        if let Some(next) = graph.pop_edge(top) {
            stack.push(next);
        } else {
            circuit.push(top);
            stack.pop();
        }
    }

    circuit.reverse();
    circuit
}

/// Extract an Eulerian circuit covering every edge instance and every one
/// of the `vertex_count` vertices.
///
/// Consumes the graph: the circuit is the only thing left afterwards.
///
/// The degree check runs here for any [`EulerGraph`], whether or not the
/// caller already validated it. For a [`Multigraph`](crate::Multigraph)
/// built by the pipeline, [`check_eulerian`](crate::Multigraph::check_eulerian)
/// has rejected odd vertices before this point, so the check never fires
/// there.
///
/// # Errors
///
/// Returns [`PipelineError::InvariantViolation`] if the graph has an odd
/// vertex, if edges remain after the traversal (the graph was
/// disconnected), or if the circuit misses a vertex.
pub fn eulerian_circuit<G: EulerGraph>(
    mut graph: G,
    start: usize,
    vertex_count: usize,
) -> Result<Vec<usize>, PipelineError> {
    if let Some(v) = (0..vertex_count).find(|&v| graph.degree(v) % 2 == 1) {
        return Err(PipelineError::InvariantViolation(format!(
            "vertex {v} has odd degree {} before Eulerian extraction",
            graph.degree(v)
        )));
    }

    let edges = graph.edge_count();
    let circuit = hierholzer(&mut graph, start);

    let left = graph.edge_count();
    if left != 0 {
        return Err(PipelineError::InvariantViolation(format!(
            "{left} of {edges} edge instances unreachable from vertex {start}"
        )));
    }
    if circuit.len() != edges + 1 {
        return Err(PipelineError::InvariantViolation(format!(
            "circuit has {} vertices for {edges} edges",
            circuit.len()
        )));
    }

    let mut covered = vec![false; vertex_count];
    for &v in &circuit {
        if let Some(slot) = covered.get_mut(v) {
            *slot = true;
        }
    }
    if let Some(missing) = covered.iter().position(|&c| !c) {
        return Err(PipelineError::InvariantViolation(format!(
            "circuit never visits vertex {missing}"
        )));
    }

    log::trace!("euler: {edges} edges, circuit of {} vertices", circuit.len());
    Ok(circuit)
}
