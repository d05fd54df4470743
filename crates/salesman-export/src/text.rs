//! Plain-text instance export: one `x y` record per line.

use std::fmt::Write;

use salesman_pipeline::Point;

/// Serialize points in the format read by
/// [`parse_points`](salesman_pipeline::parse_points).
///
/// Coordinates use the shortest representation that parses back to the
/// same `f64`, so a written instance reloads exactly.
#[must_use]
pub fn to_points_text(points: &[Point]) -> String {
    let mut out = String::new();
    for p in points {
        let _ = writeln!(out, "{} {}", p.x, p.y);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn one_record_per_line() {
        let text = to_points_text(&[Point::new(1.0, 2.5), Point::new(-3.0, 0.125)]);
        assert_eq!(text, "1 2.5\n-3 0.125\n");
    }

    #[test]
    fn empty_point_set_is_empty_text() {
        assert_eq!(to_points_text(&[]), "");
    }

    #[test]
    fn parser_reads_back_exact_values() {
        let points = vec![Point::new(0.1, 1.0 / 3.0), Point::new(99.999_999, 42.0)];
        let back = salesman_pipeline::parse_points(&to_points_text(&points)).unwrap();
        assert_eq!(back, points);
    }
}
