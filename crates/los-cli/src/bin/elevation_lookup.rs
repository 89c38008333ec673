//! Look up ground elevation at a single point.

use anyhow::Result;
use clap::Parser;
use los_cli::args::number;
use los_cli::{init_tracing, Config};
use los_core::{Coordinate, ElevationSource};
use los_terrain::ElevationClient;

/// Query the configured elevation API for one coordinate
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, value_parser = number, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, value_parser = number, allow_hyphen_values = true)]
    lon: f64,

    /// Elevation API URL (overrides LOS_ELEVATION_URL)
    #[arg(long)]
    elevation_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.elevation_url {
        config.elevation_url = url;
    }
    init_tracing(config.log_json, los_cli::logging::DEFAULT_DIRECTIVES)?;

    let client = ElevationClient::new(config.client_config())?;
    let at = Coordinate::new(args.lon, args.lat);
    tracing::debug!("GET {}", client.lookup_url(at));

    let elevation_m = client.elevation(at).await?;
    println!("{:.1}", elevation_m);
    Ok(())
}
