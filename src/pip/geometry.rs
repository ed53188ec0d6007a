//! Planar point-in-polygon predicates over lon/lat rings.

use geo_types::{Coord, LineString, MultiPolygon as GeoMultiPolygon, Polygon as GeoPolygon};

/// A closed loop of vertices. The last vertex connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    vertices: Vec<Coord<f64>>,
}

impl Ring {
    pub fn new(vertices: Vec<Coord<f64>>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even-odd ray casting against a horizontal ray towards +x.
    ///
    /// Rings with fewer than 3 vertices contain nothing. Points lying exactly
    /// on an edge or vertex resolve through the strict comparisons below:
    /// an edge counts only when exactly one endpoint is strictly above `y`,
    /// and a crossing toggles only when `x` is strictly left of it.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        for i in 0..n {
            let Coord { x: x1, y: y1 } = self.vertices[i];
            let Coord { x: x2, y: y2 } = self.vertices[(i + 1) % n];
            if (y1 > y) != (y2 > y) {
                let x_intercept = (x2 - x1) * (y - y1) / (y2 - y1) + x1;
                if x < x_intercept {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Exterior ring followed by zero or more holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Inside the exterior and outside every hole
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self.exterior() {
            Some(exterior) if exterior.contains(x, y) => {
                !self.holes().iter().any(|hole| hole.contains(x, y))
            }
            _ => false,
        }
    }

    fn to_geo(&self) -> Option<GeoPolygon<f64>> {
        let exterior = self.exterior()?;
        let interiors = self
            .holes()
            .iter()
            .map(|hole| LineString::new(hole.vertices.clone()))
            .collect();
        Some(GeoPolygon::new(
            LineString::new(exterior.vertices.clone()),
            interiors,
        ))
    }
}

/// Union of polygons, possibly gathered from several features.
///
/// Built once from the boundary document and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn ring_count(&self) -> usize {
        self.polygons.iter().map(|p| p.rings.len()).sum()
    }

    /// Every vertex of every ring of every polygon
    pub fn vertices(&self) -> impl Iterator<Item = &Coord<f64>> + '_ {
        self.polygons
            .iter()
            .flat_map(|p| p.rings.iter())
            .flat_map(|r| r.vertices.iter())
    }

    /// True if any polygon contains the point (OR, never XOR)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygons.iter().any(|p| p.contains(x, y))
    }

    /// Convert into a `geo` multipolygon, e.g. to hand to `geo` algorithms.
    /// Polygons without an exterior ring are dropped.
    pub fn to_geo(&self) -> GeoMultiPolygon<f64> {
        GeoMultiPolygon::new(self.polygons.iter().filter_map(Polygon::to_geo).collect())
    }
}
