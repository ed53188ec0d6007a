//! Boundary extraction from a GeoJSON FeatureCollection.

use std::path::Path;

use geo_types::Coord;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::BoundaryError;
use crate::models::BoundingBox;
use crate::pip::geometry::{Polygon, PolygonSet, Ring};

/// Top-level boundary document. Only `features` is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundaryDocument {
    #[serde(default)]
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundaryFeature {
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

/// Geometry with its coordinates left undecoded until the type is known
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type", default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub coordinates: Value,
}

type Position = Vec<f64>;
type RawRing = Vec<Position>;
type RawPolygon = Vec<RawRing>;

/// Boundary polygons plus their envelope, both fixed once built
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygons: PolygonSet,
    bbox: BoundingBox,
}

impl Boundary {
    /// Validate a polygon set and compute its bounding box.
    ///
    /// Fails if there is nothing to filter against.
    pub fn from_polygons(polygons: PolygonSet) -> Result<Self, BoundaryError> {
        if polygons.is_empty() {
            return Err(BoundaryError::NoPolygons);
        }
        let bbox = BoundingBox::from_coords(polygons.vertices()).ok_or(BoundaryError::NoVertices)?;
        Ok(Self { polygons, bbox })
    }

    pub fn from_document(doc: &BoundaryDocument) -> Result<Self, BoundaryError> {
        Self::from_polygons(collect_polygons(doc)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BoundaryError> {
        let doc: BoundaryDocument = serde_json::from_str(json)?;
        Self::from_document(&doc)
    }

    pub fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// Read and decode a boundary file
pub fn load_boundary<P: AsRef<Path>>(path: P) -> Result<Boundary, BoundaryError> {
    let path = path.as_ref();
    info!("Loading boundary from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: BoundaryDocument = serde_json::from_str(&content)?;
    let boundary = Boundary::from_document(&doc)?;

    let polygons = boundary.polygons();
    info!(
        "Loaded {} polygons ({} rings, {} vertices) from {} features",
        polygons.len(),
        polygons.ring_count(),
        polygons.vertices().count(),
        doc.features.len()
    );
    info!("Boundary bbox: {}", boundary.bbox());

    Ok(boundary)
}

/// Flatten every Polygon and MultiPolygon feature into one polygon set.
///
/// Other geometry types, and features without geometry, are skipped.
pub fn collect_polygons(doc: &BoundaryDocument) -> Result<PolygonSet, BoundaryError> {
    let mut polygons = Vec::new();

    for (idx, feature) in doc.features.iter().enumerate() {
        let geometry = match &feature.geometry {
            Some(g) => g,
            None => {
                debug!("Feature {} has no geometry, skipping", idx);
                continue;
            }
        };

        match geometry.geometry_type.as_deref() {
            Some("Polygon") => {
                let raw: RawPolygon = decode_coordinates(&geometry.coordinates, "Polygon")?;
                polygons.push(build_polygon(raw)?);
            }
            Some("MultiPolygon") => {
                let raw: Vec<RawPolygon> =
                    decode_coordinates(&geometry.coordinates, "MultiPolygon")?;
                for poly in raw {
                    polygons.push(build_polygon(poly)?);
                }
            }
            other => {
                debug!("Feature {} has geometry type {:?}, skipping", idx, other);
            }
        }
    }

    Ok(PolygonSet::new(polygons))
}

/// Missing or null coordinates decode as an empty list
fn decode_coordinates<T>(value: &Value, geometry: &'static str) -> Result<T, BoundaryError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(|source| BoundaryError::MalformedCoordinates { geometry, source })
}

fn build_polygon(raw: RawPolygon) -> Result<Polygon, BoundaryError> {
    let rings = raw
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|pos| match pos.as_slice() {
                    [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                    _ => Err(BoundaryError::ShortPosition),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Ring::new)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(rings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::BoundingRect;
    use geo_types::Rect;
    use serde_json::json;

    fn doc(value: Value) -> BoundaryDocument {
        serde_json::from_value(value).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
        json!([[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]])
    }

    #[test]
    fn test_polygon_and_multipolygon_features_flatten() {
        let d = doc(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": [square(0.0, 0.0, 10.0, 10.0), square(4.0, 4.0, 6.0, 6.0)] } },
                { "type": "Feature", "geometry": { "type": "MultiPolygon", "coordinates": [[square(20.0, 0.0, 24.0, 4.0)], [square(30.0, 0.0, 34.0, 4.0)]] } }
            ]
        }));
        let boundary = Boundary::from_document(&d).unwrap();
        let set = boundary.polygons();
        assert_eq!(set.len(), 3);
        assert_eq!(set.ring_count(), 4);
        assert_eq!(set.polygons()[0].holes().len(), 1);

        assert!(!set.contains(5.0, 5.0));
        assert!(set.contains(1.0, 1.0));
        assert!(set.contains(22.0, 2.0));
        assert!(set.contains(32.0, 2.0));
        assert!(!set.contains(27.0, 2.0));
    }

    #[test]
    fn test_other_geometries_ignored() {
        let d = doc(json!({
            "features": [
                { "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } },
                { "geometry": null },
                { "properties": { "name": "no geometry" } },
                { "geometry": { "type": "Polygon", "coordinates": [square(0.0, 0.0, 1.0, 1.0)] } }
            ]
        }));
        let boundary = Boundary::from_document(&d).unwrap();
        assert_eq!(boundary.polygons().len(), 1);
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_no_polygons_is_error() {
        let d = doc(json!({
            "features": [{ "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } }]
        }));
        assert!(matches!(
            Boundary::from_document(&d),
            Err(BoundaryError::NoPolygons)
        ));

        assert!(matches!(
            Boundary::from_json("{}"),
            Err(BoundaryError::NoPolygons)
        ));

        assert!(matches!(
            Boundary::from_polygons(PolygonSet::default()),
            Err(BoundaryError::NoPolygons)
        ));
    }

    #[test]
    fn test_polygon_without_vertices_is_error() {
        let d = doc(json!({
            "features": [
                { "geometry": { "type": "Polygon", "coordinates": [] } },
                { "geometry": { "type": "Polygon" } }
            ]
        }));
        assert_eq!(collect_polygons(&d).unwrap().len(), 2);
        assert!(matches!(
            Boundary::from_document(&d),
            Err(BoundaryError::NoVertices)
        ));
    }

    #[test]
    fn test_altitude_ignored() {
        let d = doc(json!({
            "features": [{ "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0, 5.0], [4.0, 0.0, 5.0], [4.0, 4.0, 9.0], [0.0, 4.0, 1.0]]] } }]
        }));
        let boundary = Boundary::from_document(&d).unwrap();
        assert!(boundary.polygons().contains(2.0, 2.0));
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 4.0, 0.0, 4.0));
    }

    #[test]
    fn test_short_position_rejected() {
        let d = doc(json!({
            "features": [{ "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [4.0], [4.0, 4.0]]] } }]
        }));
        assert!(matches!(
            Boundary::from_document(&d),
            Err(BoundaryError::ShortPosition)
        ));
    }

    #[test]
    fn test_malformed_coordinates_rejected() {
        let d = doc(json!({
            "features": [{ "geometry": { "type": "MultiPolygon", "coordinates": "nope" } }]
        }));
        assert!(matches!(
            Boundary::from_document(&d),
            Err(BoundaryError::MalformedCoordinates { geometry: "MultiPolygon", .. })
        ));
    }

    #[test]
    fn test_bbox_spans_all_polygons() {
        // Two squares side by side: 5 + 5 vertices with closing points, plus a hole.
        let d = doc(json!({
            "features": [
                { "geometry": { "type": "Polygon", "coordinates": [square(0.0, 0.0, 4.0, 4.0)] } },
                { "geometry": { "type": "Polygon", "coordinates": [square(10.0, -3.0, 14.0, 1.0), square(11.0, -2.0, 12.0, 0.0)] } }
            ]
        }));
        let boundary = Boundary::from_document(&d).unwrap();
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 14.0, -3.0, 4.0));

        let rect: Rect<f64> = boundary.bbox().into();
        assert_eq!(boundary.polygons().to_geo().bounding_rect(), Some(rect));
    }

    #[test]
    fn test_load_boundary_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin0.json");
        let body = json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": {}, "geometry": { "type": "Polygon", "coordinates": [square(-67.3, 17.9, -65.2, 18.5)] } }]
        });
        std::fs::write(&path, body.to_string()).unwrap();

        let boundary = load_boundary(&path).unwrap();
        assert_eq!(boundary.bbox(), BoundingBox::new(-67.3, -65.2, 17.9, 18.5));
    }

    #[test]
    fn test_load_boundary_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_boundary(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BoundaryError::Io { .. }));
    }

    #[test]
    fn test_load_boundary_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin0.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_boundary(&path),
            Err(BoundaryError::Json(_))
        ));
    }
}
