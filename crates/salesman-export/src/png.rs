//! PNG raster export via tiny-skia.
//!
//! Draws the same picture as [`to_svg`](crate::to_svg): lime tour edges
//! with arrowheads on a black canvas, red cities on top. `tiny-skia`
//! handles anti-aliasing and sub-pixel positioning.

use salesman_pipeline::{Point, Tour};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::{CANVAS_SIZE, ExportError, canvas_scale, tour_segments};

/// Tour edge width, in pixels.
const TOUR_STROKE_WIDTH: f32 = 3.0;
/// Arrowhead length along the edge, in pixels.
const ARROW_LENGTH: f32 = 12.0;
/// Arrowhead half-width across the edge, in pixels.
const ARROW_HALF_WIDTH: f32 = 6.0;
/// City marker radius, in pixels.
const CITY_RADIUS: f32 = 5.0;

/// Render a tour onto a [`CANVAS_SIZE`] square pixmap.
///
/// # Errors
///
/// Returns [`ExportError::InvalidGridSize`] for a non-positive or
/// non-finite `grid_size`, [`ExportError::VertexOutOfRange`] if the tour
/// visits an index outside `points`, and [`ExportError::Canvas`] if the
/// pixmap cannot be allocated.
#[allow(clippy::cast_possible_truncation)]
pub fn render_tour(points: &[Point], tour: &Tour, grid_size: f64) -> Result<Pixmap, ExportError> {
    let scale = canvas_scale(grid_size)?;
    let segments = tour_segments(points, tour)?;
    let to_canvas = |p: Point| ((p.x * scale) as f32, (p.y * scale) as f32);

    let mut pixmap =
        Pixmap::new(CANVAS_SIZE, CANVAS_SIZE).ok_or(ExportError::Canvas(CANVAS_SIZE))?;
    pixmap.fill(Color::BLACK);

    let mut edge_paint = Paint::default();
    edge_paint.set_color_rgba8(0, 255, 0, 255);
    edge_paint.anti_alias = true;

    let stroke = Stroke {
        width: TOUR_STROKE_WIDTH,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for (from, to) in segments {
        let (x1, y1) = to_canvas(from);
        let (x2, y2) = to_canvas(to);

        let mut pb = PathBuilder::new();
        pb.move_to(x1, y1);
        pb.line_to(x2, y2);
        // Zero-length edges (trivial tour, duplicate cities) yield no path.
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &edge_paint, &stroke, Transform::identity(), None);
        }
        if let Some(head) = arrowhead((x1, y1), (x2, y2)) {
            pixmap.fill_path(
                &head,
                &edge_paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    let mut city_paint = Paint::default();
    city_paint.set_color_rgba8(255, 0, 0, 255);
    city_paint.anti_alias = true;

    for &p in points {
        let (cx, cy) = to_canvas(p);
        if let Some(circle) = PathBuilder::from_circle(cx, cy, CITY_RADIUS) {
            pixmap.fill_path(
                &circle,
                &city_paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    Ok(pixmap)
}

/// Render a tour and encode it as PNG bytes.
///
/// # Errors
///
/// Returns the errors of [`render_tour`], or [`ExportError::PngEncode`]
/// if encoding fails.
pub fn to_png(points: &[Point], tour: &Tour, grid_size: f64) -> Result<Vec<u8>, ExportError> {
    render_tour(points, tour, grid_size)?
        .encode_png()
        .map_err(|e| ExportError::PngEncode(e.to_string()))
}

/// Triangle with its tip at `to`, pointing along `from -> to`.
///
/// Returns `None` for a zero-length edge, which has no direction.
fn arrowhead(from: (f32, f32), to: (f32, f32)) -> Option<tiny_skia::Path> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len <= f32::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = (
        (-ux).mul_add(ARROW_LENGTH, to.0),
        (-uy).mul_add(ARROW_LENGTH, to.1),
    );

    let mut pb = PathBuilder::new();
    pb.move_to(to.0, to.1);
    pb.line_to(
        uy.mul_add(ARROW_HALF_WIDTH, base.0),
        (-ux).mul_add(ARROW_HALF_WIDTH, base.1),
    );
    pb.line_to(
        (-uy).mul_add(ARROW_HALF_WIDTH, base.0),
        ux.mul_add(ARROW_HALF_WIDTH, base.1),
    );
    pb.close();
    pb.finish()
}
