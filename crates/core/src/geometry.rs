//! Two-vertex line geometry and its canonical WKT form.
//!
//! A Werkleitung segment is a directed straight line from its start point to
//! its end point. Vertex order encodes the flow direction of the pipe and is
//! never normalised.

use std::fmt;

use geo_types::{coord, Coord, Line};

use crate::error::CoreError;

/// WKT keyword for the only geometry type the importer produces.
const WKT_LINESTRING: &str = "LINESTRING";

/// A directed two-vertex line in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeometry(Line<f64>);

impl LineGeometry {
    pub fn new(start: Coord<f64>, end: Coord<f64>) -> Self {
        Self(Line::new(start, end))
    }

    /// Build a line from `(x, y)` tuples.
    pub fn from_xy(start: (f64, f64), end: (f64, f64)) -> Self {
        Self::new(coord! { x: start.0, y: start.1 }, coord! { x: end.0, y: end.1 })
    }

    pub fn start(&self) -> Coord<f64> {
        self.0.start
    }

    pub fn end(&self) -> Coord<f64> {
        self.0.end
    }

    /// Straight-line (Euclidean) distance between the two vertices.
    pub fn length(&self) -> f64 {
        self.0.dx().hypot(self.0.dy())
    }

    /// Canonical WKT: `LINESTRING (x1 y1, x2 y2)`.
    ///
    /// Coordinates use the shortest representation that parses back to the
    /// identical `f64`, so no precision is lost. The SRID is not part of the
    /// text; see [`crate::types::LV95_SRID`].
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }

    /// Parse the canonical WKT form produced by [`LineGeometry::to_wkt`].
    ///
    /// The keyword is matched case-insensitively and whitespace around
    /// separators is tolerated, but exactly two vertices are required.
    pub fn from_wkt(wkt: &str) -> Result<Self, CoreError> {
        let trimmed = wkt.trim();
        let keyword = trimmed
            .get(..WKT_LINESTRING.len())
            .filter(|k| k.eq_ignore_ascii_case(WKT_LINESTRING))
            .ok_or_else(|| CoreError::Geometry(format!("expected {WKT_LINESTRING}: {wkt}")))?;

        let body = trimmed[keyword.len()..].trim();
        let inner = body
            .strip_prefix('(')
            .and_then(|b| b.strip_suffix(')'))
            .ok_or_else(|| CoreError::Geometry(format!("unbalanced parentheses: {wkt}")))?;

        let vertices = inner
            .split(',')
            .map(parse_vertex)
            .collect::<Result<Vec<_>, _>>()?;

        match vertices.as_slice() {
            [start, end] => Ok(Self::new(*start, *end)),
            other => Err(CoreError::Geometry(format!(
                "expected exactly 2 vertices, found {}",
                other.len()
            ))),
        }
    }
}

impl fmt::Display for LineGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line { start, end } = self.0;
        write!(
            f,
            "{WKT_LINESTRING} ({} {}, {} {})",
            start.x, start.y, end.x, end.y
        )
    }
}

fn parse_vertex(raw: &str) -> Result<Coord<f64>, CoreError> {
    let mut parts = raw.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CoreError::Geometry(format!("malformed vertex: {:?}", raw.trim())));
    };
    let parse = |v: &str| {
        v.parse::<f64>()
            .map_err(|_| CoreError::Geometry(format!("malformed ordinate: {v:?}")))
    };
    Ok(coord! { x: parse(x)?, y: parse(y)? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn length_is_euclidean_distance() {
        let line = LineGeometry::from_xy((2_683_000.0, 1_248_000.0), (2_683_100.0, 1_248_100.0));
        assert!((line.length() - 141.421_356).abs() < 1e-6);
    }

    #[test]
    fn identical_points_have_zero_length() {
        let line = LineGeometry::from_xy((2_683_000.0, 1_248_000.0), (2_683_000.0, 1_248_000.0));
        assert_eq!(line.length(), 0.0);
    }

    #[test]
    fn wkt_uses_canonical_layout() {
        let line = LineGeometry::from_xy((2_683_000.0, 1_248_000.0), (2_683_100.5, 1_248_100.25));
        assert_eq!(
            line.to_wkt(),
            "LINESTRING (2683000 1248000, 2683100.5 1248100.25)"
        );
    }

    #[test]
    fn wkt_round_trip_preserves_vertex_order() {
        let line = LineGeometry::from_xy((2_690_000.12, 1_250_000.34), (2_683_000.56, 1_248_000.78));
        let parsed = LineGeometry::from_wkt(&line.to_wkt()).unwrap();
        assert_eq!(parsed, line);
        assert_eq!(parsed.start(), line.start());
        assert_eq!(parsed.end(), line.end());
    }

    #[test]
    fn wkt_round_trip_keeps_full_precision() {
        let line = LineGeometry::from_xy(
            (2_683_000.123_456_789, 1_248_000.987_654_321),
            (2_683_010.000_000_001, 1_248_010.1),
        );
        let parsed = LineGeometry::from_wkt(&line.to_wkt()).unwrap();
        assert_eq!(parsed.start().x.to_bits(), line.start().x.to_bits());
        assert_eq!(parsed.end().x.to_bits(), line.end().x.to_bits());
    }

    #[test]
    fn from_wkt_accepts_postgis_spacing() {
        let parsed = LineGeometry::from_wkt("LINESTRING(2683000 1248000,2683100 1248100)").unwrap();
        assert_eq!(parsed.end(), coord! { x: 2_683_100.0, y: 1_248_100.0 });
    }

    #[test]
    fn from_wkt_rejects_other_geometry_types() {
        assert_matches!(
            LineGeometry::from_wkt("POINT (2683000 1248000)"),
            Err(CoreError::Geometry(_))
        );
    }

    #[test]
    fn from_wkt_rejects_multi_vertex_lines() {
        assert_matches!(
            LineGeometry::from_wkt("LINESTRING (0 0, 1 1, 2 2)"),
            Err(CoreError::Geometry(msg)) if msg.contains("exactly 2")
        );
    }

    #[test]
    fn from_wkt_rejects_garbage_ordinates() {
        assert_matches!(
            LineGeometry::from_wkt("LINESTRING (a 0, 1 1)"),
            Err(CoreError::Geometry(_))
        );
    }
}
