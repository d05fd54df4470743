//! Integration test: generate an instance, solve it, and export every format.

#![allow(clippy::unwrap_used)]

use salesman_export::{SvgMetadata, fit_grid_size, to_instance_svg, to_png, to_points_text, to_svg};
use salesman_pipeline::{GeneratorConfig, PipelineConfig, generate, parse_points, solve};

#[test]
fn generated_instance_round_trips_through_every_format() {
    let config = GeneratorConfig {
        count: 12,
        grid_size: 50.0,
        seed: 2024,
    };
    let points = generate(&config).unwrap();

    // The text format reloads to the same instance.
    let reloaded = parse_points(&to_points_text(&points)).unwrap();
    assert_eq!(reloaded, points);

    let result = solve(&reloaded, &PipelineConfig::default()).unwrap();
    assert!(result.tour.is_closed_permutation(12));

    let description = format!("{} {:.6}", result.solver.label(), result.length);
    let metadata = SvgMetadata {
        title: Some("generated"),
        description: Some(&description),
    };

    let tour_svg = to_svg(&points, &result.tour, config.grid_size, &metadata).unwrap();
    assert_eq!(tour_svg.matches("<line").count(), 12);
    assert_eq!(tour_svg.matches("<circle").count(), 12);

    let instance_svg = to_instance_svg(&points, config.grid_size, &metadata).unwrap();
    assert_eq!(instance_svg.matches("<line").count(), 12 * 11 / 2);

    let png = to_png(&points, &result.tour, config.grid_size).unwrap();
    assert!(png.starts_with(b"\x89PNG"));

    // Every generated coordinate is below the grid size, so the fitted
    // grid never exceeds it.
    assert!(fit_grid_size(&points) < config.grid_size);
}
