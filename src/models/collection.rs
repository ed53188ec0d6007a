//! Output FeatureCollection with a summary metadata block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventFeature;

pub const DEFAULT_TITLE: &str = "USGS Earthquakes within admin0 polygon";
pub const SOURCE: &str = "USGS FDSN Event API";

/// Summary written next to the filtered features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Generation time, Unix milliseconds
    pub generated: i64,
    pub title: String,
    /// Events inside the boundary polygons
    pub count: usize,
    /// Events returned by the bounding-box query
    pub bbox_count: usize,
    pub starttime: String,
    pub endtime: String,
    pub source: String,
}

impl Metadata {
    pub fn new(
        title: &str,
        count: usize,
        bbox_count: usize,
        starttime: &str,
        endtime: &str,
        generated: DateTime<Utc>,
    ) -> Self {
        Self {
            generated: generated.timestamp_millis(),
            title: title.to_string(),
            count,
            bbox_count,
            starttime: starttime.to_string(),
            endtime: endtime.to_string(),
            source: SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub metadata: Metadata,
    pub features: Vec<EventFeature>,
}

impl EventCollection {
    pub fn new(metadata: Metadata, features: Vec<EventFeature>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            metadata,
            features,
        }
    }
}
