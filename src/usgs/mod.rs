//! USGS FDSN event service client.

mod client;

pub use client::{collect_pages, EventQuery, UsgsClient};
