//! Compute radar line-of-sight coverage around a receiver.
//!
//! Samples terrain elevation along every bearing, then writes the coverage
//! circle, visibility polygon, blind zone and blocked samples as GeoJSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use los_cli::{feature_collection, init_tracing, Config, ReceiverArgs};
use los_core::CalculationError;
use los_terrain::{CoverageSession, ElevationClient, ElevationProvider};

/// Radar line-of-sight coverage from public elevation data
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    receiver: ReceiverArgs,

    /// Elevation API URL (overrides LOS_ELEVATION_URL)
    #[arg(long)]
    elevation_url: Option<String>,

    /// Elevation API wire format: open-elevation or open-meteo
    #[arg(long, value_parser = provider)]
    provider: Option<ElevationProvider>,

    /// Minimum milliseconds between elevation queries (overrides LOS_QUERY_INTERVAL_MS)
    #[arg(long)]
    query_interval_ms: Option<u64>,

    /// Write GeoJSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pretty-print the GeoJSON
    #[arg(long)]
    pretty: bool,
}

fn provider(raw: &str) -> Result<ElevationProvider, String> {
    ElevationProvider::parse(raw).ok_or_else(|| format!("unknown provider {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(provider) = args.provider {
        if config.elevation_url == config.elevation_provider.default_url() {
            config.elevation_url = provider.default_url().to_string();
        }
        config.elevation_provider = provider;
    }
    if let Some(url) = args.elevation_url {
        config.elevation_url = url;
    }
    if let Some(interval) = args.query_interval_ms {
        config.query_interval_ms = interval;
    }

    init_tracing(
        config.log_json,
        &format!("{},los_coverage=info", los_cli::logging::DEFAULT_DIRECTIVES),
    )?;

    let receiver = args
        .receiver
        .to_config()
        .context("invalid receiver parameters")?;

    tracing::info!(
        "Receiver at {:.6},{:.6}, radius {} m, height {} m, elevation from {}",
        receiver.center.lat,
        receiver.center.lon,
        receiver.radius_m,
        receiver.height_m,
        config.elevation_url
    );

    let client = ElevationClient::new(config.client_config())?;
    let session = Arc::new(CoverageSession::new(client, config.rate_limiter()));

    let interrupt = tokio::spawn({
        let session = session.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling calculation");
                session.cancel();
            }
        }
    });

    let result = session.calculate(&receiver).await;
    interrupt.abort();

    let result = match result {
        Ok(result) => result,
        Err(CalculationError::Cancelled) => anyhow::bail!("calculation cancelled"),
        Err(err) => return Err(err.into()),
    };

    let collection = feature_collection(&result);
    let body = if args.pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", body),
    }

    match &result.polygon {
        Some(polygon) => tracing::info!(
            "Visibility polygon: {} vertices, {:.0} m2",
            polygon.vertex_count(),
            polygon.area_m2()
        ),
        None => tracing::info!("Not enough boundary points for a visibility polygon"),
    }
    tracing::info!(
        "Blind zone radius {:.1} m, {} blocked sample(s), {} of {} queries failed",
        result.blind_zone.radius_m,
        result.blocked_samples().count(),
        result.stats.failed,
        result.stats.attempted
    );

    Ok(())
}
