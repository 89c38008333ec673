//! Visibility sampler.
//!
//! Walks outward from the receiver along each bearing in fixed steps,
//! querying terrain elevation until a sample rises above the effective
//! receiver height or the radius is exhausted.

use std::future::Future;

use serde::Serialize;

use crate::error::{CalculationError, ElevationError};
use crate::models::{BearingResult, Coordinate, ElevationSample};
use crate::spatial::destination;

/// Anything that can report ground elevation for a coordinate.
pub trait ElevationSource {
    fn elevation(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<f64, ElevationError>> + Send;
}

/// Synchronous lookups (fixed grids, test profiles) wrapped as a source.
impl<F> ElevationSource for F
where
    F: Fn(Coordinate) -> Result<f64, ElevationError>,
{
    fn elevation(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<f64, ElevationError>> + Send {
        std::future::ready(self(at))
    }
}

/// Where and how far to walk.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub center: Coordinate,
    pub bearings: Vec<f64>,
    pub radius_m: f64,
    pub step_m: f64,
    /// Effective receiver height; samples strictly above it block the view.
    pub threshold_m: f64,
}

impl SamplePlan {
    /// Number of distance steps `step, 2*step, ...` that fit within the radius.
    pub fn steps_per_bearing(&self) -> usize {
        if self.step_m.is_nan() || self.step_m <= 0.0 || self.radius_m.is_nan() || self.radius_m < 0.0
        {
            return 0;
        }
        // Absorb float error so that e.g. 0.3 / 0.1 still yields 3 steps.
        ((self.radius_m / self.step_m) + 1e-9).floor() as usize
    }

    /// Upper bound on elevation queries; early stops only lower it.
    pub fn planned_queries(&self) -> usize {
        self.bearings.len().saturating_mul(self.steps_per_bearing())
    }

    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.steps_per_bearing()).map(move |k| k as f64 * self.step_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "elevation_m", rename_all = "snake_case")]
pub enum SampleOutcome {
    Clear(f64),
    Blocked(f64),
    Failed,
}

/// Emitted after every attempted elevation query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleProgress {
    pub bearing_deg: f64,
    pub distance_m: f64,
    pub outcome: SampleOutcome,
    pub attempted: usize,
    pub planned: usize,
}

/// Walk every bearing in `plan`, one query at a time.
///
/// Failed queries are logged and skipped. A `Cancelled` error from the
/// source aborts the whole walk.
pub async fn sample<S, F>(
    source: &S,
    plan: &SamplePlan,
    mut on_progress: F,
) -> Result<Vec<BearingResult>, CalculationError>
where
    S: ElevationSource,
    F: FnMut(&SampleProgress),
{
    let planned = plan.planned_queries();
    let mut attempted = 0usize;
    let mut results = Vec::with_capacity(plan.bearings.len());

    for &bearing_deg in &plan.bearings {
        let mut result = BearingResult {
            bearing_deg,
            samples: Vec::new(),
            attempted: 0,
        };

        for distance_m in plan.distances() {
            let point = destination(plan.center, bearing_deg, distance_m);
            result.attempted += 1;
            attempted += 1;

            let outcome = match source.elevation(point).await {
                Ok(elevation_m) => {
                    let above_threshold = elevation_m > plan.threshold_m;
                    result.samples.push(ElevationSample {
                        coordinate: point,
                        elevation_m,
                        bearing_deg,
                        distance_m,
                        above_threshold,
                    });
                    if above_threshold {
                        SampleOutcome::Blocked(elevation_m)
                    } else {
                        SampleOutcome::Clear(elevation_m)
                    }
                }
                Err(ElevationError::Cancelled) => return Err(CalculationError::Cancelled),
                Err(err) => {
                    tracing::warn!(
                        "Elevation query at {:.6},{:.6} (bearing {}, {} m) failed, skipping: {}",
                        point.lat,
                        point.lon,
                        bearing_deg,
                        distance_m,
                        err
                    );
                    SampleOutcome::Failed
                }
            };

            on_progress(&SampleProgress {
                bearing_deg,
                distance_m,
                outcome,
                attempted,
                planned,
            });

            if matches!(outcome, SampleOutcome::Blocked(_)) {
                break;
            }
        }

        tracing::debug!(
            "Bearing {}: {} sample(s), boundary at {:?} m",
            bearing_deg,
            result.samples.len(),
            result.first_exceeding().map(|s| s.distance_m)
        );
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::haversine_distance;
    use std::sync::Mutex;

    const CENTER: Coordinate = Coordinate::new(30.0, 59.0);

    /// Elevation by distance from CENTER, looked up in 100 m buckets.
    struct Profile {
        heights: Vec<Option<f64>>,
        queried: Mutex<Vec<f64>>,
    }

    impl Profile {
        fn new(heights: &[Option<f64>]) -> Self {
            Self {
                heights: heights.to_vec(),
                queried: Mutex::new(Vec::new()),
            }
        }

        fn queried(&self) -> Vec<f64> {
            self.queried.lock().unwrap().clone()
        }
    }

    impl ElevationSource for Profile {
        async fn elevation(&self, at: Coordinate) -> Result<f64, ElevationError> {
            let distance = haversine_distance(CENTER, at).round();
            self.queried.lock().unwrap().push(distance);
            let idx = (distance / 100.0) as usize - 1;
            match self.heights.get(idx).copied().flatten() {
                Some(h) => Ok(h),
                None => Err(ElevationError::Status(500)),
            }
        }
    }

    fn plan(bearings: Vec<f64>, radius_m: f64) -> SamplePlan {
        SamplePlan {
            center: CENTER,
            bearings,
            radius_m,
            step_m: 100.0,
            threshold_m: 50.0,
        }
    }

    #[test]
    fn steps_cover_largest_multiple_within_radius() {
        assert_eq!(plan(vec![0.0], 300.0).steps_per_bearing(), 3);
        assert_eq!(plan(vec![0.0], 350.0).steps_per_bearing(), 3);
        assert_eq!(plan(vec![0.0], 99.0).steps_per_bearing(), 0);
        assert_eq!(plan(vec![0.0, 90.0], 300.0).planned_queries(), 6);

        let fine = SamplePlan {
            radius_m: 0.3,
            step_m: 0.1,
            ..plan(vec![0.0], 0.0)
        };
        assert_eq!(fine.steps_per_bearing(), 3);

        let degenerate = SamplePlan {
            radius_m: 1e7,
            step_m: 1e-13,
            ..plan(vec![0.0, 180.0], 0.0)
        };
        assert_eq!(degenerate.steps_per_bearing(), usize::MAX);
        assert_eq!(degenerate.planned_queries(), usize::MAX);
    }

    #[tokio::test]
    async fn stops_at_first_sample_above_threshold() {
        let source = Profile::new(&[Some(10.0), Some(60.0), Some(80.0)]);
        let results = sample(&source, &plan(vec![0.0], 300.0), |_| {}).await.unwrap();

        assert_eq!(source.queried(), vec![100.0, 200.0]);
        let bearing = &results[0];
        assert_eq!(bearing.samples.len(), 2);
        let boundary = bearing.first_exceeding().unwrap();
        assert_eq!(boundary.distance_m, 200.0);
        assert_eq!(boundary.elevation_m, 60.0);
        assert_eq!(
            boundary.coordinate,
            destination(CENTER, 0.0, 200.0)
        );
    }

    #[tokio::test]
    async fn walks_full_radius_when_never_blocked() {
        let source = Profile::new(&[Some(10.0), Some(20.0), Some(30.0)]);
        let results = sample(&source, &plan(vec![0.0], 300.0), |_| {}).await.unwrap();

        assert_eq!(source.queried(), vec![100.0, 200.0, 300.0]);
        assert!(results[0].first_exceeding().is_none());
        assert_eq!(results[0].farthest().unwrap().distance_m, 300.0);
    }

    #[tokio::test]
    async fn equal_elevation_does_not_block() {
        let source = Profile::new(&[Some(50.0), Some(50.0)]);
        let results = sample(&source, &plan(vec![0.0], 200.0), |_| {}).await.unwrap();
        assert_eq!(results[0].samples.len(), 2);
        assert!(results[0].first_exceeding().is_none());
    }

    #[tokio::test]
    async fn failed_queries_are_skipped_not_fatal() {
        let source = Profile::new(&[Some(10.0), None, Some(70.0)]);
        let mut outcomes = Vec::new();
        let results = sample(&source, &plan(vec![0.0], 300.0), |p| outcomes.push(p.outcome))
            .await
            .unwrap();

        assert_eq!(source.queried(), vec![100.0, 200.0, 300.0]);
        assert_eq!(results[0].attempted, 3);
        let distances: Vec<f64> = results[0].samples.iter().map(|s| s.distance_m).collect();
        assert_eq!(distances, vec![100.0, 300.0]);
        assert_eq!(
            outcomes,
            vec![
                SampleOutcome::Clear(10.0),
                SampleOutcome::Failed,
                SampleOutcome::Blocked(70.0)
            ]
        );
    }

    #[tokio::test]
    async fn every_bearing_is_walked_in_order() {
        let source = Profile::new(&[Some(10.0), Some(20.0)]);
        let mut progress = Vec::new();
        let results = sample(&source, &plan(vec![0.0, 120.0, 240.0], 200.0), |p| {
            progress.push((p.bearing_deg, p.distance_m, p.attempted, p.planned))
        })
        .await
        .unwrap();

        let bearings: Vec<f64> = results.iter().map(|r| r.bearing_deg).collect();
        assert_eq!(bearings, vec![0.0, 120.0, 240.0]);
        assert_eq!(progress.len(), 6);
        assert_eq!(progress[0], (0.0, 100.0, 1, 6));
        assert_eq!(progress[5], (240.0, 200.0, 6, 6));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_walk() {
        let calls = Mutex::new(0usize);
        let source = |_at: Coordinate| {
            let mut calls = calls.lock().unwrap();
            *calls += 1;
            if *calls == 2 {
                Err(ElevationError::Cancelled)
            } else {
                Ok(0.0)
            }
        };

        let err = sample(&source, &plan(vec![0.0, 90.0], 300.0), |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, CalculationError::Cancelled);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
