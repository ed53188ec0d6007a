//! Error types for the library. The binary wraps these with `anyhow`.

use std::path::PathBuf;

/// Fatal problems with the boundary document. No filtering can happen after one.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("no polygon geometry found")]
    NoPolygons,

    #[error("boundary polygons have no vertices")]
    NoVertices,

    #[error("malformed {geometry} coordinates: {source}")]
    MalformedCoordinates {
        geometry: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("position with fewer than two ordinates")]
    ShortPosition,

    #[error("failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse boundary document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while paging through the event service
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid endpoint URL {url}: {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event service returned {status} at offset {offset}: {body}")]
    Status {
        status: reqwest::StatusCode,
        offset: usize,
        body: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
