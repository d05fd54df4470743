//! Pipeline diagnostics: timing, weights, and other metrics for each stage.
//!
//! [`solve_with_diagnostics`] runs the selected solver with an injected
//! [`Clock`] and records a [`StageDiagnostics`] per stage. The
//! MST-and-matching solver reports each of its stages separately; the
//! sibling solvers report a single search stage.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::pipeline::Pipeline;
use crate::solver::{SolverKind, TourSolver};
use crate::types::{PipelineConfig, PipelineError, Point, Tour, TourResult};

/// Source of timestamps for stage timing.
///
/// The library stays free of a clock dependency; callers provide one
/// (`std::time::Instant` on native, a fake in tests).
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single solve.
///
/// The per-stage fields of the MST-and-matching solver are `None` when a
/// sibling solver ran, and `search` is `None` when it did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: distance matrix construction.
    pub measure: StageDiagnostics,
    /// Stage 2: minimum spanning tree.
    pub span: Option<StageDiagnostics>,
    /// Stage 3: parity analysis and greedy matching.
    pub pair: Option<StageDiagnostics>,
    /// Stage 4: Eulerian circuit extraction.
    pub traverse: Option<StageDiagnostics>,
    /// Stage 5: shortcutting.
    pub shortcut: Option<StageDiagnostics>,
    /// Nearest-neighbor or exhaustive search.
    pub search: Option<StageDiagnostics>,
    /// Total wall-clock duration of the entire solve (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Distance matrix metrics.
    Measure {
        /// Number of cities.
        city_count: usize,
        /// Number of unordered city pairs.
        pair_count: usize,
    },
    /// Spanning tree metrics.
    Span {
        /// Number of tree edges (`n - 1`).
        edge_count: usize,
        /// Total tree weight.
        tree_weight: f64,
    },
    /// Parity and matching metrics.
    Pair {
        /// Number of odd-degree tree vertices.
        odd_count: usize,
        /// Number of matching pairs.
        pair_count: usize,
        /// Total matching weight.
        matching_weight: f64,
    },
    /// Eulerian circuit metrics.
    Traverse {
        /// Edge instances walked.
        edge_count: usize,
        /// Circuit length before shortcutting.
        circuit_length: f64,
    },
    /// Shortcutting metrics.
    Shortcut {
        /// Final tour length.
        tour_length: f64,
        /// Length removed by shortcutting.
        savings: f64,
    },
    /// Single-stage solver metrics.
    Search {
        /// Which solver ran.
        solver: SolverKind,
        /// Final tour length.
        tour_length: f64,
    },
}

/// High-level summary for the entire solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Number of cities.
    pub city_count: usize,
    /// Which solver ran.
    pub solver: SolverKind,
    /// Final tour length.
    pub tour_length: f64,
}

/// Solve `points` under `config`, timing each stage with `clock`.
///
/// A single city short-circuits like [`solve`](crate::solve): no stage
/// runs, and only an instantaneous measure record is kept.
///
/// # Errors
///
/// Returns the same errors as [`solve`](crate::solve).
pub fn solve_with_diagnostics<C: Clock>(
    points: Vec<Point>,
    config: &PipelineConfig,
    clock: &C,
) -> Result<(TourResult, PipelineDiagnostics), PipelineError> {
    let total_start = clock.now();
    let city_count = points.len();

    let (tour, length, stages) = match (city_count, config.solver) {
        (1, _) => trivial_stages(),
        (_, SolverKind::Christofides) => run_staged(points, clock)?,
        (_, kind) => run_search(kind, &points, config, clock)?,
    };

    let diagnostics = PipelineDiagnostics {
        measure: stages.measure,
        span: stages.span,
        pair: stages.pair,
        traverse: stages.traverse,
        shortcut: stages.shortcut,
        search: stages.search,
        total_duration: clock.elapsed(&total_start),
        summary: PipelineSummary {
            city_count,
            solver: config.solver,
            tour_length: length,
        },
    };
    let result = TourResult {
        tour,
        length,
        solver: config.solver,
    };
    Ok((result, diagnostics))
}

/// Stage records gathered before the summary is known.
struct Stages {
    measure: StageDiagnostics,
    span: Option<StageDiagnostics>,
    pair: Option<StageDiagnostics>,
    traverse: Option<StageDiagnostics>,
    shortcut: Option<StageDiagnostics>,
    search: Option<StageDiagnostics>,
}

fn trivial_stages() -> (Tour, f64, Stages) {
    log::warn!("diagnostics: only 1 city, no stages run");
    let stages = Stages {
        measure: StageDiagnostics {
            duration: Duration::ZERO,
            metrics: measure_metrics(1),
        },
        span: None,
        pair: None,
        traverse: None,
        shortcut: None,
        search: None,
    };
    (Tour::trivial(), 0.0, stages)
}

fn run_staged<C: Clock>(
    points: Vec<Point>,
    clock: &C,
) -> Result<(Tour, f64, Stages), PipelineError> {
    let start = clock.now();
    let measured = Pipeline::new(points).measure()?;
    let measure_duration = clock.elapsed(&start);

    let start = clock.now();
    let spanned = measured.span();
    let span_duration = clock.elapsed(&start);

    let start = clock.now();
    let paired = spanned.pair()?;
    let pair_duration = clock.elapsed(&start);

    let start = clock.now();
    let traversed = paired.traverse()?;
    let traverse_duration = clock.elapsed(&start);

    let start = clock.now();
    let staged = traversed.shortcut().into_result();
    let shortcut_duration = clock.elapsed(&start);

    let circuit_length = staged.circuit_length();
    let stage = |duration, metrics| Some(StageDiagnostics { duration, metrics });
    let stages = Stages {
        measure: StageDiagnostics {
            duration: measure_duration,
            metrics: measure_metrics(staged.distances.len()),
        },
        span: stage(
            span_duration,
            StageMetrics::Span {
                edge_count: staged.tree.edge_count(),
                tree_weight: staged.tree_weight(),
            },
        ),
        pair: stage(
            pair_duration,
            StageMetrics::Pair {
                odd_count: staged.odd_vertices.len(),
                pair_count: staged.matching.len(),
                matching_weight: staged.matching_weight(),
            },
        ),
        traverse: stage(
            traverse_duration,
            StageMetrics::Traverse {
                edge_count: staged.circuit.len().saturating_sub(1),
                circuit_length,
            },
        ),
        shortcut: stage(
            shortcut_duration,
            StageMetrics::Shortcut {
                tour_length: staged.length,
                savings: circuit_length - staged.length,
            },
        ),
        search: None,
    };
    Ok((staged.tour, staged.length, stages))
}

fn run_search<C: Clock>(
    kind: SolverKind,
    points: &[Point],
    config: &PipelineConfig,
    clock: &C,
) -> Result<(Tour, f64, Stages), PipelineError> {
    if points.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let start = clock.now();
    let distances = DistanceMatrix::from_points(points);
    let measure = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: measure_metrics(distances.len()),
    };

    let start = clock.now();
    let tour = kind.solve(&distances, config)?;
    let duration = clock.elapsed(&start);
    let length = distances.tour_length(&tour);

    let stages = Stages {
        measure,
        span: None,
        pair: None,
        traverse: None,
        shortcut: None,
        search: Some(StageDiagnostics {
            duration,
            metrics: StageMetrics::Search {
                solver: kind,
                tour_length: length,
            },
        }),
    };
    Ok((tour, length, stages))
}

const fn measure_metrics(n: usize) -> StageMetrics {
    StageMetrics::Measure {
        city_count: n,
        pair_count: n * n.saturating_sub(1) / 2,
    }
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Cities: {}  |  Solver: {}",
            self.summary.city_count,
            self.summary.solver.label(),
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let stages: Vec<(&str, &StageDiagnostics)> = {
            let mut s = vec![("Measure", &self.measure)];
            if let Some(ref st) = self.span {
                s.push(("Spanning Tree", st));
            }
            if let Some(ref st) = self.pair {
                s.push(("Matching", st));
            }
            if let Some(ref st) = self.traverse {
                s.push(("Eulerian Circuit", st));
            }
            if let Some(ref st) = self.shortcut {
                s.push(("Shortcut", st));
            }
            if let Some(ref st) = self.search {
                s.push(("Search", st));
            }
            s
        };

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!("Tour length: {:.6}", self.summary.tour_length));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Measure {
            city_count,
            pair_count,
        } => format!("{city_count} cities, {pair_count} pairs"),
        StageMetrics::Span {
            edge_count,
            tree_weight,
        } => format!("{edge_count} edges, weight={tree_weight:.3}"),
        StageMetrics::Pair {
            odd_count,
            pair_count,
            matching_weight,
        } => format!("{odd_count} odd, {pair_count} pairs, weight={matching_weight:.3}"),
        StageMetrics::Traverse {
            edge_count,
            circuit_length,
        } => format!("{edge_count} edges, length={circuit_length:.3}"),
        StageMetrics::Shortcut {
            tour_length,
            savings,
        } => format!("length={tour_length:.3} (saved {savings:.3})"),
        StageMetrics::Search {
            solver,
            tour_length,
        } => format!("{} length={tour_length:.3}", solver.label()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Reports one millisecond for every measured interval.
    struct TickClock;

    impl Clock for TickClock {
        type Instant = ();

        fn now(&self) {}

        fn elapsed(&self, _since: &()) -> Duration {
            Duration::from_millis(1)
        }
    }

    fn scattered() -> Vec<Point> {
        vec![
            Point::new(3.0, 9.0),
            Point::new(7.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(8.0, 8.0),
            Point::new(5.0, 5.0),
            Point::new(0.0, 6.0),
        ]
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn staged_solver_records_every_stage() {
        let (result, diag) =
            solve_with_diagnostics(scattered(), &PipelineConfig::default(), &TickClock).unwrap();
        assert!(diag.span.is_some());
        assert!(diag.pair.is_some());
        assert!(diag.traverse.is_some());
        assert!(diag.shortcut.is_some());
        assert!(diag.search.is_none());
        assert_eq!(diag.summary.city_count, 6);
        assert!((diag.summary.tour_length - result.length).abs() < f64::EPSILON);
    }

    #[test]
    fn staged_metrics_are_consistent() {
        let (result, diag) =
            solve_with_diagnostics(scattered(), &PipelineConfig::default(), &TickClock).unwrap();

        assert!(matches!(
            diag.span.map(|s| s.metrics),
            Some(StageMetrics::Span { edge_count: 5, tree_weight }) if tree_weight > 0.0
        ));
        assert!(matches!(
            diag.shortcut.map(|s| s.metrics),
            Some(StageMetrics::Shortcut { tour_length, savings })
                if (tour_length - result.length).abs() < f64::EPSILON && savings >= -1e-9
        ));
    }

    #[test]
    fn matches_plain_solve() {
        let config = PipelineConfig::default();
        let (result, _) = solve_with_diagnostics(scattered(), &config, &TickClock).unwrap();
        let plain = crate::solve(&scattered(), &config).unwrap();
        assert_eq!(result, plain);
    }

    #[test]
    fn search_solver_records_single_stage() {
        let config = PipelineConfig {
            solver: SolverKind::NearestNeighbor,
            ..PipelineConfig::default()
        };
        let (result, diag) = solve_with_diagnostics(scattered(), &config, &TickClock).unwrap();
        assert!(diag.span.is_none());
        assert!(matches!(
            diag.search.map(|s| s.metrics),
            Some(StageMetrics::Search {
                solver: SolverKind::NearestNeighbor,
                ..
            })
        ));
        assert_eq!(result.solver, SolverKind::NearestNeighbor);
    }

    #[test]
    fn empty_input_is_rejected_for_every_solver() {
        for solver in [SolverKind::Christofides, SolverKind::Exhaustive] {
            let config = PipelineConfig {
                solver,
                ..PipelineConfig::default()
            };
            let result = solve_with_diagnostics(vec![], &config, &TickClock);
            assert!(matches!(result, Err(PipelineError::EmptyInput)));
        }
    }

    #[test]
    fn single_city_runs_no_stage() {
        for solver in [
            SolverKind::Christofides,
            SolverKind::NearestNeighbor,
            SolverKind::Exhaustive,
        ] {
            let config = PipelineConfig {
                solver,
                ..PipelineConfig::default()
            };
            let (result, diag) =
                solve_with_diagnostics(vec![Point::new(2.0, 3.0)], &config, &TickClock).unwrap();
            assert_eq!(result, crate::solve(&[Point::new(2.0, 3.0)], &config).unwrap());
            assert_eq!(diag.measure.duration, Duration::ZERO);
            assert!(matches!(
                diag.measure.metrics,
                StageMetrics::Measure {
                    city_count: 1,
                    pair_count: 0
                }
            ));
            assert!(diag.span.is_none());
            assert!(diag.pair.is_none());
            assert!(diag.traverse.is_none());
            assert!(diag.shortcut.is_none());
            assert!(diag.search.is_none());
        }
    }

    #[test]
    fn report_lists_stages() {
        let (_, diag) =
            solve_with_diagnostics(scattered(), &PipelineConfig::default(), &TickClock).unwrap();
        let report = diag.report();
        assert!(report.contains("Pipeline Diagnostics Report"));
        assert!(report.contains("Spanning Tree"));
        assert!(report.contains("Eulerian Circuit"));
        assert!(report.contains("Cities: 6"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let (_, diag) =
            solve_with_diagnostics(scattered(), &PipelineConfig::default(), &TickClock).unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"total_duration\":0.001"));
        let back: PipelineDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.city_count, 6);
        assert_eq!(back.total_duration, Duration::from_millis(1));
    }
}
