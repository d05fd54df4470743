//! Point-file parsing.
//!
//! An instance is a stream of whitespace-separated coordinates read in
//! pairs `x y`. Line breaks carry no meaning beyond whitespace, but line
//! numbers are tracked so errors can point at the offending token.
//!
//! Every coordinate must be finite, and so must the distance between any
//! two points; an instance spread wider than `f64` can measure is
//! rejected here rather than deep inside the tour builder.

use crate::types::{PipelineError, Point};

/// Parse an instance into points, in input order.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedInput`] for a token that is not a
/// finite number, for a trailing `x` without its `y`, or for a point so
/// far from an earlier one that their distance overflows. Returns
/// [`PipelineError::EmptyInput`] if the text holds no coordinates.
pub fn parse_points(text: &str) -> Result<Vec<Point>, PipelineError> {
    let mut points = Vec::new();
    let mut pending_x: Option<(f64, usize)> = None;
    let mut bounds = Bounds::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        for token in line.split_whitespace() {
            let value = parse_coordinate(token, line_no)?;
            match pending_x.take() {
                None => pending_x = Some((value, line_no)),
                Some((x, _)) => {
                    let point = Point::new(x, value);
                    bounds.include(point);
                    if !bounds.diagonal().is_finite() {
                        return Err(PipelineError::MalformedInput {
                            line: line_no,
                            message: format!(
                                "point ({x}, {value}) is too far from the others to measure"
                            ),
                        });
                    }
                    points.push(point);
                }
            }
        }
    }

    if let Some((x, line)) = pending_x {
        return Err(PipelineError::MalformedInput {
            line,
            message: format!("coordinate {x} has no matching y value"),
        });
    }
    if points.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    log::debug!("input: parsed {} points", points.len());
    Ok(points)
}

/// Axis-aligned bounding box of the points read so far.
struct Bounds {
    min: Point,
    max: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
}

impl Bounds {
    fn include(&mut self, p: Point) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// Upper bound on the distance between any two included points.
    fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }
}

fn parse_coordinate(token: &str, line: usize) -> Result<f64, PipelineError> {
    let value: f64 = token.parse().map_err(|_| PipelineError::MalformedInput {
        line,
        message: format!("expected a number, found `{token}`"),
    })?;
    if !value.is_finite() {
        return Err(PipelineError::MalformedInput {
            line,
            message: format!("coordinate `{token}` is not finite"),
        });
    }
    Ok(value)
}
