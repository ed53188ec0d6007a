//! Core data models shared by the loader, fetcher and writer.

pub mod bbox;
pub mod collection;
pub mod event;

pub use bbox::BoundingBox;
pub use collection::{EventCollection, Metadata};
pub use event::{EventFeature, Located};
