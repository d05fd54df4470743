//! salesman-pipeline: Euclidean travelling-salesman tour construction (sans-IO).
//!
//! Builds a closed tour through a set of planar points with the
//! MST-and-matching heuristic:
//! distance matrix -> minimum spanning tree -> odd-degree vertices ->
//! greedy matching -> Eulerian circuit -> shortcut.
//!
//! Two sibling solvers share the same contract: nearest-neighbor and
//! exhaustive search (see [`SolverKind`]).
//!
//! This crate has **no I/O dependencies** -- it parses and produces
//! in-memory data only. Files, rendering, and the command line live in
//! `salesman-export` and `salesman`.

pub mod diagnostics;
pub mod distance;
pub mod euler;
pub mod exhaustive;
pub mod generate;
pub mod input;
pub mod mst;
pub mod multigraph;
pub mod nearest_neighbor;
pub mod parity;
pub mod pipeline;
pub mod shortcut;
pub mod solver;
pub mod types;

pub use distance::DistanceMatrix;
pub use generate::{GeneratorConfig, generate};
pub use input::parse_points;
pub use multigraph::{EulerGraph, Multigraph};
pub use pipeline::Pipeline;
pub use solver::{SolverKind, TourSolver};
pub use types::{PipelineConfig, PipelineError, Point, StagedResult, Tour, TourResult};

/// Build a closed tour through `points` with the configured solver.
///
/// A single point short-circuits to the tour `[0, 0]` of length 0
/// without running any stage.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `points` is empty.
/// Returns [`PipelineError::InvalidConfig`] if the exhaustive solver is
/// selected for an instance above its size cap.
/// Returns [`PipelineError::InvariantViolation`] if a stage breaks its
/// contract or the solver returns something other than a closed tour.
pub fn solve(points: &[Point], config: &PipelineConfig) -> Result<TourResult, PipelineError> {
    let n = points.len();
    if n == 0 {
        return Err(PipelineError::EmptyInput);
    }
    if n == 1 {
        log::warn!("solve: only 1 city, tour length is 0");
        return Ok(TourResult {
            tour: Tour::trivial(),
            length: 0.0,
            solver: config.solver,
        });
    }

    let distances = DistanceMatrix::from_points(points);
    let tour = config.solver.solve(&distances, config)?;
    if !tour.is_closed_permutation(n) {
        return Err(PipelineError::InvariantViolation(format!(
            "{} solver returned a tour that is not a closed permutation of {n} cities",
            config.solver.label()
        )));
    }
    let length = distances.tour_length(&tour);

    log::info!(
        "solve: {} n={n} length={length:.6}",
        config.solver.label()
    );
    Ok(TourResult {
        tour,
        length,
        solver: config.solver,
    })
}

/// Run the MST-and-matching pipeline and keep every intermediate.
///
/// Equivalent to advancing a [`Pipeline`] through all of its stages.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `points` is empty, or
/// [`PipelineError::InvariantViolation`] if a stage breaks its contract.
pub fn solve_staged(points: Vec<Point>) -> Result<StagedResult, PipelineError> {
    Ok(Pipeline::new(points)
        .measure()?
        .span()
        .pair()?
        .traverse()?
        .shortcut()
        .into_result())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use petgraph::data::Element;
    use petgraph::graph::UnGraph;
    use proptest::prelude::*;

    use super::*;

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn with_solver(solver: SolverKind) -> PipelineConfig {
        PipelineConfig {
            solver,
            ..PipelineConfig::default()
        }
    }

    /// MST weight computed independently with petgraph's Kruskal.
    fn kruskal_weight(points: &[Point]) -> f64 {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let nodes: Vec<_> = points.iter().map(|_| graph.add_node(())).collect();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                graph.add_edge(nodes[i], nodes[j], points[i].distance(points[j]));
            }
        }
        petgraph::algo::min_spanning_tree(&graph)
            .filter_map(|element| match element {
                Element::Edge { weight, .. } => Some(weight),
                Element::Node { .. } => None,
            })
            .sum()
    }

    #[test]
    fn solve_empty_input() {
        let result = solve(&[], &PipelineConfig::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn solve_single_city_is_trivial() {
        let result = solve(&points(&[(5.0, 5.0)]), &PipelineConfig::default()).unwrap();
        assert_eq!(result.tour, Tour::trivial());
        assert!(result.length.abs() < f64::EPSILON);
    }

    #[test]
    fn solve_two_cities_goes_there_and_back() {
        let result = solve(&points(&[(0.0, 0.0), (3.0, 4.0)]), &PipelineConfig::default()).unwrap();
        assert_eq!(result.tour.vertices(), &[0, 1, 0]);
        assert!((result.length - 10.0).abs() < 1e-9);
        assert_eq!(
            result.report(),
            "Christofides-style Tour Length: 10.000000\nTour order: 0 -> 1 -> 0",
        );
    }

    #[test]
    fn solve_unit_square_finds_perimeter() {
        let square = points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        for solver in [
            SolverKind::Christofides,
            SolverKind::NearestNeighbor,
            SolverKind::Exhaustive,
        ] {
            let result = solve(&square, &with_solver(solver)).unwrap();
            assert!(
                (result.length - 4.0).abs() < 1e-9,
                "{solver:?} length {}",
                result.length
            );
        }
    }

    #[test]
    fn solve_is_deterministic() {
        let pts = points(&[
            (12.0, 3.5),
            (7.25, 18.0),
            (0.5, 0.5),
            (19.0, 11.0),
            (4.0, 9.0),
            (15.5, 15.5),
            (9.0, 1.0),
        ]);
        let config = PipelineConfig::default();
        let a = solve(&pts, &config).unwrap().report();
        let b = solve(&pts, &config).unwrap().report();
        assert_eq!(a, b);
    }

    #[test]
    fn solve_exhaustive_over_cap_is_invalid_config() {
        let pts: Vec<Point> = (0..5).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let config = PipelineConfig {
            solver: SolverKind::Exhaustive,
            max_exhaustive_cities: 4,
        };
        assert!(matches!(
            solve(&pts, &config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn solve_staged_matches_solve() {
        let pts = points(&[(1.0, 7.0), (6.0, 2.0), (3.0, 3.0), (8.0, 9.0), (0.0, 0.0)]);
        let staged = solve_staged(pts.clone()).unwrap();
        let plain = solve(&pts, &PipelineConfig::default()).unwrap();
        assert_eq!(staged.into_tour_result(), plain);
    }

    #[test]
    fn huge_coordinates_still_yield_a_tour() {
        let pts = parse_points("0 0\n1e200 0\n2e200 0\n").unwrap();
        for solver in [
            SolverKind::Christofides,
            SolverKind::NearestNeighbor,
            SolverKind::Exhaustive,
        ] {
            let result = solve(&pts, &with_solver(solver)).unwrap();
            assert!(result.tour.is_closed_permutation(3), "{solver:?}");
            assert!((result.length - 4e200).abs() < 1e190, "{solver:?}");
        }
    }

    #[test]
    fn duplicate_points_still_yield_a_tour() {
        let pts = points(&[(2.0, 2.0), (2.0, 2.0), (5.0, 2.0), (2.0, 2.0)]);
        let result = solve(&pts, &PipelineConfig::default()).unwrap();
        assert!(result.tour.is_closed_permutation(4));
        assert!((result.length - 6.0).abs() < 1e-9);
    }

    fn point_set(max: usize) -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((0.0_f64..100.0, 0.0_f64..100.0), 2..max)
            .prop_map(|coords| points(&coords))
    }

    proptest! {
        #[test]
        fn mst_matches_kruskal(pts in point_set(20)) {
            let staged = solve_staged(pts.clone()).unwrap();
            prop_assert_eq!(staged.tree.edge_count(), pts.len() - 1);
            prop_assert!(staged.tree.is_spanning());
            prop_assert!((staged.tree_weight() - kruskal_weight(&pts)).abs() < 1e-6);
        }

        #[test]
        fn staged_invariants_hold(pts in point_set(30)) {
            let n = pts.len();
            let staged = solve_staged(pts).unwrap();
            prop_assert_eq!(staged.odd_vertices.len() % 2, 0);
            prop_assert_eq!(staged.matching.len() * 2, staged.odd_vertices.len());
            prop_assert_eq!(staged.circuit.len() - 1, (n - 1) + staged.matching.len());
            prop_assert!(staged.tour.is_closed_permutation(n));
            prop_assert_eq!(staged.tour.start(), Some(0));
            prop_assert!(staged.length <= staged.circuit_length() + 1e-9);
            prop_assert!(staged.length >= staged.tree_weight() - 1e-9);
        }

        #[test]
        fn exhaustive_is_never_beaten(pts in point_set(8)) {
            let best = solve(&pts, &with_solver(SolverKind::Exhaustive)).unwrap();
            let heuristic = solve(&pts, &with_solver(SolverKind::Christofides)).unwrap();
            let greedy = solve(&pts, &with_solver(SolverKind::NearestNeighbor)).unwrap();
            prop_assert!(best.length <= heuristic.length + 1e-9);
            prop_assert!(best.length <= greedy.length + 1e-9);
        }
    }
}
