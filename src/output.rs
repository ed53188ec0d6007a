//! Writing the filtered FeatureCollection to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::OutputError;
use crate::models::EventCollection;

/// `usgs_earthquakes_admin0_{start}_to_{run date}.geojson`
pub fn output_file_name(start_time: &str, run_date: NaiveDate) -> String {
    format!(
        "usgs_earthquakes_admin0_{}_to_{}.geojson",
        start_time,
        run_date.format("%Y-%m-%d")
    )
}

/// Write the collection as compact JSON, creating `dir` if needed.
///
/// Returns the path written.
pub fn write_collection(
    dir: &Path,
    file_name: &str,
    collection: &EventCollection,
) -> Result<PathBuf, OutputError> {
    let path = dir.join(file_name);
    let io_err = |source| OutputError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush().map_err(io_err)?;

    info!(
        "Wrote {} events to {}",
        collection.features.len(),
        path.display()
    );
    Ok(path)
}
