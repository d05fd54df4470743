//! salesman-export: Pure format serializers (sans-IO)
//!
//! Converts point sets and tours into output formats: a tour SVG with
//! directed edges, an instance preview SVG, a PNG raster of the tour, and
//! the plain-text point format read by
//! [`parse_points`](salesman_pipeline::parse_points).
//!
//! Every drawing uses the same square canvas of [`CANVAS_SIZE`] pixels;
//! coordinates are multiplied by `CANVAS_SIZE / grid_size`, so a point at
//! `(grid_size, grid_size)` lands on the bottom-right corner.

pub mod png;
pub mod svg;
pub mod text;

use salesman_pipeline::{Point, Tour};

pub use png::{render_tour, to_png};
pub use svg::{SvgMetadata, to_instance_svg, to_svg};
pub use text::to_points_text;

/// Width and height of every rendered canvas, in pixels.
pub const CANVAS_SIZE: u32 = 800;

/// Errors that can occur while exporting a tour or instance.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The tour refers to a city the point set does not have.
    #[error("tour visits city {vertex} but only {count} points were given")]
    VertexOutOfRange {
        /// Offending vertex index.
        vertex: usize,
        /// Number of points.
        count: usize,
    },

    /// The grid size cannot scale coordinates onto the canvas.
    #[error("grid size must be a positive finite number, got {0}")]
    InvalidGridSize(f64),

    /// The raster canvas could not be allocated.
    #[error("could not allocate a {0}x{0} canvas")]
    Canvas(u32),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

/// Smallest grid that contains every point: the largest coordinate.
///
/// Falls back to `1.0` when every coordinate is zero or negative, so the
/// result is always usable as a grid size.
#[must_use]
pub fn fit_grid_size(points: &[Point]) -> f64 {
    let extent = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .fold(0.0_f64, f64::max);
    if extent > 0.0 { extent } else { 1.0 }
}

/// Canvas pixels per grid unit.
fn canvas_scale(grid_size: f64) -> Result<f64, ExportError> {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return Err(ExportError::InvalidGridSize(grid_size));
    }
    Ok(f64::from(CANVAS_SIZE) / grid_size)
}

/// Resolve each tour edge to its endpoint coordinates.
fn tour_segments(points: &[Point], tour: &Tour) -> Result<Vec<(Point, Point)>, ExportError> {
    let lookup = |v: usize| {
        points.get(v).copied().ok_or(ExportError::VertexOutOfRange {
            vertex: v,
            count: points.len(),
        })
    };
    tour.edges()
        .map(|(a, b)| Ok((lookup(a)?, lookup(b)?)))
        .collect()
}
