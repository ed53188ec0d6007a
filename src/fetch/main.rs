//! Fetch USGS earthquake events and keep those inside an admin boundary.
//!
//! Loads boundary polygons, queries the event service with their bounding
//! box, refines the result with a point-in-polygon test, and writes a
//! GeoJSON FeatureCollection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quakefence::config::Config;
use quakefence::models::Located;
use quakefence::output::{output_file_name, write_collection};
use quakefence::usgs::{EventQuery, UsgsClient};
use quakefence::{load_boundary, EventCollection, Metadata, PipFilter};

#[derive(Parser, Debug)]
#[command(name = "quakefence")]
#[command(about = "Fetch USGS earthquakes within an admin boundary polygon")]
struct Args {
    /// GeoJSON boundary file (Polygon / MultiPolygon features)
    #[arg(short, long, default_value = "admin0.json")]
    boundary: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start of the time window (overrides config)
    #[arg(long)]
    start: Option<String>,

    /// End of the time window, defaults to now (UTC)
    #[arg(long)]
    end: Option<String>,

    /// Events per page (overrides config)
    #[arg(long)]
    limit: Option<usize>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Run the polygon test on all cores
    #[arg(long)]
    parallel: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Quakefence");

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(start) = &args.start {
        config.fetch.start_time = start.clone();
    }
    if let Some(limit) = args.limit {
        config.fetch.page_limit = limit;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    config.validate().context("Invalid configuration")?;

    // Boundary problems are fatal: nothing is written.
    let boundary = load_boundary(&args.boundary)
        .with_context(|| format!("Failed to load boundary {}", args.boundary.display()))?;
    let bbox = boundary.bbox();

    let end_time = args
        .end
        .clone()
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string());

    let query = EventQuery {
        start_time: config.fetch.start_time.clone(),
        end_time: end_time.clone(),
        bbox,
        limit: config.fetch.page_limit,
    };

    let client = UsgsClient::new(&config.fetch).context("Failed to create USGS client")?;
    info!("Querying {}", client.endpoint());
    let events = client
        .fetch_all(&query)
        .await
        .context("Failed to fetch events")?;

    let outside_bbox = events
        .iter()
        .filter_map(|e| e.location())
        .filter(|c| !bbox.contains(c.x, c.y))
        .count();
    if outside_bbox > 0 {
        warn!("{} events returned outside the requested bbox", outside_bbox);
    }

    let filter = PipFilter::new(boundary.polygons());
    let result = if args.parallel {
        filter.filter_par(events)
    } else {
        filter.filter(events)
    };

    let now = Utc::now();
    let metadata = Metadata::new(
        &config.output.title,
        result.total_kept,
        result.total_considered,
        &query.start_time,
        &end_time,
        now,
    );
    let collection = EventCollection::new(metadata, result.kept);

    let file_name = output_file_name(&query.start_time, now.date_naive());
    let path = write_collection(&config.output.dir, &file_name, &collection)
        .context("Failed to write output")?;

    info!(
        "Done! Wrote {} filtered events ({} in bbox) to {}",
        collection.metadata.count,
        collection.metadata.bbox_count,
        path.display()
    );

    Ok(())
}
