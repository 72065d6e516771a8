//! # Geographic Utilities
//!
//! Point-in-polygon checking against a GeoJSON boundary, used to validate
//! that a submitted observation location falls within the service area.

use serde_json::Value;

use crate::error::Error;
use crate::Result;

/// A `[longitude, latitude]` coordinate pair.
pub type Point = [f64; 2];

/// Check whether a point lies inside a polygon using ray casting.
///
/// Points exactly on an edge may fall on either side; boundary fixtures
/// should not rely on edge hits.
#[must_use]
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let [x, y] = point;
    let mut inside = false;

    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// A boundary loaded from a GeoJSON file, checking points against its
/// first `Polygon` feature's outer ring.
#[derive(Clone, Debug)]
pub struct BoundaryChecker {
    polygon: Vec<Point>,
}

impl BoundaryChecker {
    /// Parse a GeoJSON document and extract the first polygon feature.
    ///
    /// # Errors
    /// Returns [`Error::Format`] if the document holds no polygon feature,
    /// or [`Error::Json`] if it is not valid JSON.
    pub fn from_geojson(geojson: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(geojson)?;

        let features = document
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Format("geojson document has no features".to_string()))?;

        for feature in features {
            let Some(geometry) = feature.get("geometry") else {
                continue;
            };
            if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
                continue;
            }
            let Some(ring) = geometry
                .get("coordinates")
                .and_then(Value::as_array)
                .and_then(|rings| rings.first())
                .and_then(Value::as_array)
            else {
                continue;
            };

            let polygon = ring
                .iter()
                .filter_map(|position| {
                    let pair = position.as_array()?;
                    Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
                })
                .collect::<Vec<Point>>();
            if polygon.len() >= 3 {
                return Ok(Self { polygon });
            }
        }

        Err(Error::Format("geojson document has no polygon feature".to_string()))
    }

    /// Load a boundary from a GeoJSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let geojson = std::fs::read_to_string(path)?;
        Self::from_geojson(&geojson)
    }

    /// Check whether a point lies within the boundary.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // unit square, closed ring
    const SQUARE: [Point; 5] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];

    #[test]
    fn inside_and_outside() {
        assert!(point_in_polygon([0.5, 0.5], &SQUARE));
        assert!(!point_in_polygon([1.5, 0.5], &SQUARE));
        assert!(!point_in_polygon([-0.1, 0.5], &SQUARE));
    }

    #[test]
    fn concave_polygon() {
        // L-shape: the notch at the top right is outside
        let polygon: Vec<Point> = vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ];
        assert!(point_in_polygon([0.5, 1.5], &polygon));
        assert!(!point_in_polygon([1.5, 1.5], &polygon));
    }

    #[test]
    fn geojson_boundary() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-122.32, 37.85], [-122.24, 37.85],
                        [-122.24, 37.90], [-122.32, 37.90],
                        [-122.32, 37.85]
                    ]]
                }
            }]
        }"#;

        let boundary = BoundaryChecker::from_geojson(geojson).expect("should parse");
        assert!(boundary.contains([-122.27, 37.87]));
        assert!(!boundary.contains([-122.40, 37.87]));
    }

    #[test]
    fn geojson_without_polygon_errors() {
        let geojson = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(BoundaryChecker::from_geojson(geojson).is_err());
    }
}
