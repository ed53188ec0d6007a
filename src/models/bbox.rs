//! Axis-aligned lon/lat envelope used to narrow the event query.

use geo_types::{coord, Coord, Rect};
use serde::{Deserialize, Serialize};

/// Envelope of every boundary vertex, in degrees.
///
/// Longitudes are taken as-is, so a boundary crossing the antimeridian
/// yields a box spanning nearly the whole globe rather than two boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Smallest box around the given coordinates, or `None` if there are none
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord<f64>>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let init = Self::new(first.x, first.x, first.y, first.y);

        Some(iter.fold(init, |bbox, c| Self {
            min_lon: bbox.min_lon.min(c.x),
            max_lon: bbox.max_lon.max(c.x),
            min_lat: bbox.min_lat.min(c.y),
            max_lat: bbox.max_lat.max(c.y),
        }))
    }

    /// Inclusive on every side
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Query parameters for the FDSN event service, six fractional digits each
    pub fn query_params(&self) -> [(&'static str, String); 4] {
        [
            ("minlongitude", format!("{:.6}", self.min_lon)),
            ("maxlongitude", format!("{:.6}", self.max_lon)),
            ("minlatitude", format!("{:.6}", self.min_lat)),
            ("maxlatitude", format!("{:.6}", self.max_lat)),
        ]
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            coord! { x: bbox.min_lon, y: bbox.min_lat },
            coord! { x: bbox.max_lon, y: bbox.max_lat },
        )
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lon [{:.6}, {:.6}] lat [{:.6}, {:.6}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}
