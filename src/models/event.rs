//! Event records as returned by the USGS GeoJSON feed.

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything that may carry a lon/lat position
pub trait Located {
    /// `None` when the record has no usable position
    fn location(&self) -> Option<Coord<f64>>;
}

impl Located for Coord<f64> {
    fn location(&self) -> Option<Coord<f64>> {
        Some(*self)
    }
}

/// One GeoJSON event feature, kept verbatim.
///
/// Only `geometry.coordinates[0..2]` is ever read; every other field is
/// passed through to the output untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFeature(pub Value);

impl EventFeature {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// USGS event id, when present
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Located for EventFeature {
    fn location(&self) -> Option<Coord<f64>> {
        let coords = self.0.get("geometry")?.get("coordinates")?.as_array()?;
        if coords.len() < 2 {
            return None;
        }
        Some(Coord {
            x: coords[0].as_f64()?,
            y: coords[1].as_f64()?,
        })
    }
}

impl From<Value> for EventFeature {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
