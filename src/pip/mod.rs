//! Point-in-Polygon (PIP) boundary filtering.
//!
//! Loads boundary polygons from GeoJSON and keeps the candidate points
//! that fall inside them, using even-odd ray casting.

mod boundary;
mod geometry;
mod service;

pub use boundary::{
    collect_polygons, load_boundary, Boundary, BoundaryDocument, BoundaryFeature, RawGeometry,
};
pub use geometry::{Polygon, PolygonSet, Ring};
pub use service::{FilterResult, PipFilter};
