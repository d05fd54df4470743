//! SVG export serializers.
//!
//! Builds documents with the [`svg`] crate, which handles XML escaping
//! and attribute formatting.
//!
//! - [`to_svg`] draws a tour: one `<line>` per directed tour edge, each
//!   ending in an arrowhead marker, then one `<circle>` per city on top.
//! - [`to_instance_svg`] draws an instance preview: every pair of cities
//!   joined by a thin line, then the cities.
//!
//! Both render onto a black [`CANVAS_SIZE`] square. These are pure
//! functions with no I/O -- they return a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::element::{Circle, Definitions, Description, Line, Marker, Path, Title};

use salesman_pipeline::{Point, Tour};

use crate::{CANVAS_SIZE, ExportError, canvas_scale, tour_segments};

/// Id of the arrowhead marker referenced by tour edges.
const ARROW_ID: &str = "arrow";
/// Colour of tour edges and arrowheads.
const TOUR_COLOR: &str = "lime";
/// Stroke width of tour edges.
const TOUR_STROKE_WIDTH: u32 = 3;
/// Colour of complete-graph edges in the instance preview.
const INSTANCE_EDGE_COLOR: &str = "white";
/// Colour of city markers.
const CITY_COLOR: &str = "red";
/// Radius of city markers, in canvas pixels.
const CITY_RADIUS: u32 = 5;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted before the drawing.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the instance file name without extension.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the solver and tour length.
    pub description: Option<&'a str>,
}

/// Render a tour over `points` as an SVG string.
///
/// Coordinates are scaled by `CANVAS_SIZE / grid_size`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidGridSize`] for a non-positive or
/// non-finite `grid_size`, and [`ExportError::VertexOutOfRange`] if the
/// tour visits an index outside `points`.
pub fn to_svg(
    points: &[Point],
    tour: &Tour,
    grid_size: f64,
    metadata: &SvgMetadata<'_>,
) -> Result<String, ExportError> {
    let scale = canvas_scale(grid_size)?;
    let segments = tour_segments(points, tour)?;

    let mut doc = with_metadata(canvas(), metadata).add(arrow_definitions());

    for (from, to) in segments {
        doc = doc.add(
            segment(from, to, scale)
                .set("stroke", TOUR_COLOR)
                .set("stroke-width", TOUR_STROKE_WIDTH)
                .set("marker-end", format!("url(#{ARROW_ID})")),
        );
    }
    for &p in points {
        doc = doc.add(city(p, scale));
    }

    Ok(finish(&doc))
}

/// Render an instance preview: the complete graph over `points` in thin
/// white lines, with the cities on top.
///
/// # Errors
///
/// Returns [`ExportError::InvalidGridSize`] for a non-positive or
/// non-finite `grid_size`.
pub fn to_instance_svg(
    points: &[Point],
    grid_size: f64,
    metadata: &SvgMetadata<'_>,
) -> Result<String, ExportError> {
    let scale = canvas_scale(grid_size)?;

    let mut doc = with_metadata(canvas(), metadata);

    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            doc = doc.add(
                segment(a, b, scale)
                    .set("stroke", INSTANCE_EDGE_COLOR)
                    .set("stroke-width", 1),
            );
        }
    }
    for &p in points {
        doc = doc.add(city(p, scale));
    }

    Ok(finish(&doc))
}

/// Empty black canvas.
fn canvas() -> Document {
    Document::new()
        .set("width", CANVAS_SIZE)
        .set("height", CANVAS_SIZE)
        .set("viewBox", (0, 0, CANVAS_SIZE, CANVAS_SIZE))
        .set("style", "background:black")
}

fn with_metadata(mut doc: Document, metadata: &SvgMetadata<'_>) -> Document {
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    doc
}

/// `<defs>` holding the arrowhead drawn at the end of each tour edge.
fn arrow_definitions() -> Definitions {
    let head = Path::new()
        .set("d", "M0,0 L0,6 L6,3 z")
        .set("fill", TOUR_COLOR);
    let marker = Marker::new()
        .set("id", ARROW_ID)
        .set("markerWidth", 10)
        .set("markerHeight", 10)
        .set("refX", 5)
        .set("refY", 3)
        .set("orient", "auto")
        .add(head);
    Definitions::new().add(marker)
}

fn segment(from: Point, to: Point, scale: f64) -> Line {
    Line::new()
        .set("x1", from.x * scale)
        .set("y1", from.y * scale)
        .set("x2", to.x * scale)
        .set("y2", to.y * scale)
}

fn city(p: Point, scale: f64) -> Circle {
    Circle::new()
        .set("cx", p.x * scale)
        .set("cy", p.y * scale)
        .set("r", CITY_RADIUS)
        .set("fill", CITY_COLOR)
}

/// The svg crate omits the XML declaration, so we prepend it.
fn finish(doc: &Document) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
