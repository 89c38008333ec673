//! End-to-end coverage calculation.

use chrono::Utc;

use crate::assembler::assemble;
use crate::blind_zone::{blind_zone, coverage_circle};
use crate::error::{CalculationError, ElevationError};
use crate::models::{CoverageResult, QueryStats, ReceiverConfig};
use crate::sampler::{sample, ElevationSource, SamplePlan, SampleProgress};
use crate::spatial::bearings;

/// Validate `config`, sample terrain and derive every output geometry.
pub async fn calculate<S: ElevationSource>(
    source: &S,
    config: &ReceiverConfig,
) -> Result<CoverageResult, CalculationError> {
    calculate_with_progress(source, config, |_| {}).await
}

pub async fn calculate_with_progress<S, F>(
    source: &S,
    config: &ReceiverConfig,
    on_progress: F,
) -> Result<CoverageResult, CalculationError>
where
    S: ElevationSource,
    F: FnMut(&SampleProgress),
{
    config.validate()?;

    let mut stats = QueryStats::default();
    let mut receiver_ground_m = None;
    let mut effective_height_m = config.height_m;

    if config.ground_offset {
        stats.attempted += 1;
        match source.elevation(config.center).await {
            Ok(ground_m) => {
                receiver_ground_m = Some(ground_m);
                effective_height_m += ground_m;
            }
            Err(ElevationError::Cancelled) => return Err(CalculationError::Cancelled),
            Err(err) => {
                stats.failed += 1;
                tracing::warn!(
                    "Receiver ground elevation lookup failed, using raw height {} m: {}",
                    config.height_m,
                    err
                );
            }
        }
    }

    let plan = SamplePlan {
        center: config.center,
        bearings: bearings(config.bearing_step_deg),
        radius_m: config.radius_m,
        step_m: config.sample_step_m,
        threshold_m: effective_height_m,
    };
    tracing::info!(
        "Sampling {} bearing(s) x {} step(s), threshold {:.1} m",
        plan.bearings.len(),
        plan.steps_per_bearing(),
        effective_height_m
    );

    let results = sample(source, &plan, on_progress).await?;
    for result in &results {
        stats.attempted += result.attempted;
        stats.failed += result.attempted - result.samples.len();
    }

    let polygon = assemble(&results, config.policy, config.min_vertices);
    let blind_zone = blind_zone(
        config.center,
        config.cone_angle_deg,
        effective_height_m,
        config.circle_steps,
    );
    let coverage = coverage_circle(config.center, config.radius_m, config.circle_steps);

    tracing::info!(
        "Coverage complete: {} queries ({} failed), polygon: {}, blind zone {:.1} m",
        stats.attempted,
        stats.failed,
        polygon
            .as_ref()
            .map(|p| format!("{} vertices", p.vertex_count()))
            .unwrap_or_else(|| "none".to_string()),
        blind_zone.radius_m
    );

    Ok(CoverageResult {
        config: config.clone(),
        effective_height_m,
        receiver_ground_m,
        bearings: results,
        polygon,
        blind_zone,
        coverage,
        stats,
        computed_at: Utc::now(),
    })
}
