//! Quakefence - earthquake events clipped to an administrative boundary.
//!
//! This library provides the boundary loader, the point-in-polygon filter,
//! the USGS event fetcher and the output writer used by the `quakefence` binary.

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod pip;
pub mod usgs;

pub use error::{BoundaryError, ConfigError, FetchError, OutputError};
pub use models::{BoundingBox, EventCollection, EventFeature, Metadata};
pub use pip::{load_boundary, Boundary, FilterResult, PipFilter, PolygonSet};
