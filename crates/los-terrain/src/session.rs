//! Coverage session: owns the elevation source and the latest result.
//!
//! Starting a calculation cancels whichever one is still running, so a new
//! request always supersedes an older one. Only the newest run publishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use los_core::{
    calculate_with_progress, CalculationError, CoverageResult, ElevationSource, ReceiverConfig,
    SampleOutcome, SampleProgress,
};
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::rate_limit::RateLimiter;
use crate::throttled::Throttled;

#[derive(Debug)]
struct ActiveRun {
    generation: u64,
    run_id: Uuid,
    cancel: CancelToken,
}

pub struct CoverageSession<S> {
    source: Arc<S>,
    limiter: Arc<RateLimiter>,
    generation: AtomicU64,
    active: Mutex<Option<ActiveRun>>,
    latest: watch::Sender<Option<Arc<CoverageResult>>>,
    progress: watch::Sender<Option<SampleProgress>>,
}

impl<S> CoverageSession<S>
where
    S: ElevationSource + Send + Sync,
{
    pub fn new(source: S, limiter: RateLimiter) -> Self {
        let (latest, _) = watch::channel(None);
        let (progress, _) = watch::channel(None);
        Self {
            source: Arc::new(source),
            limiter: Arc::new(limiter),
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
            latest,
            progress,
        }
    }

    /// Most recent completed result.
    pub fn latest(&self) -> Option<Arc<CoverageResult>> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CoverageResult>>> {
        self.latest.subscribe()
    }

    /// Progress of the running calculation, one update per elevation query.
    pub fn subscribe_progress(&self) -> watch::Receiver<Option<SampleProgress>> {
        self.progress.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .map(|active| active.is_some())
            .unwrap_or(false)
    }

    /// Cancel the in-flight calculation, if any.
    pub fn cancel(&self) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };
        if let Some(run) = active.take() {
            tracing::info!("Cancelling calculation {}", run.run_id);
            run.cancel.cancel();
        }
    }

    /// Run a calculation, superseding any that is still in flight.
    pub async fn calculate(
        &self,
        config: &ReceiverConfig,
    ) -> Result<Arc<CoverageResult>, CalculationError> {
        let run_id = Uuid::new_v4();
        let cancel = CancelToken::new();
        let generation = self.begin(run_id, cancel.clone());

        let source = Throttled::new(self.source.clone(), self.limiter.clone(), cancel);
        let span = tracing::info_span!("coverage", run_id = %run_id);
        let result = calculate_with_progress(&source, config, |progress| {
            log_progress(progress);
            self.progress.send_replace(Some(*progress));
        })
        .instrument(span)
        .await;

        let still_current = self.finish(generation);
        match result {
            Ok(result) if still_current => {
                let result = Arc::new(result);
                self.latest.send_replace(Some(result.clone()));
                Ok(result)
            }
            Ok(_) => {
                tracing::info!("Calculation {} finished after being superseded", run_id);
                Err(CalculationError::Cancelled)
            }
            Err(err) => {
                tracing::warn!("Calculation {} ended: {}", run_id, err);
                Err(err)
            }
        }
    }

    fn begin(&self, run_id: Uuid, cancel: CancelToken) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = active.take() {
            tracing::info!(
                "Superseding calculation {} with {}",
                previous.run_id,
                run_id
            );
            previous.cancel.cancel();
        }
        self.progress.send_replace(None);
        *active = Some(ActiveRun {
            generation,
            run_id,
            cancel,
        });
        generation
    }

    /// Clear the active slot if it still belongs to `generation`.
    fn finish(&self, generation: u64) -> bool {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match active.as_ref() {
            Some(run) if run.generation == generation => {
                *active = None;
                true
            }
            _ => false,
        }
    }
}

fn log_progress(progress: &SampleProgress) {
    match progress.outcome {
        SampleOutcome::Blocked(elevation_m) => tracing::debug!(
            "[{}/{}] bearing {} blocked at {} m ({:.1} m)",
            progress.attempted,
            progress.planned,
            progress.bearing_deg,
            progress.distance_m,
            elevation_m
        ),
        SampleOutcome::Clear(elevation_m) => tracing::trace!(
            "[{}/{}] bearing {} clear at {} m ({:.1} m)",
            progress.attempted,
            progress.planned,
            progress.bearing_deg,
            progress.distance_m,
            elevation_m
        ),
        SampleOutcome::Failed => tracing::debug!(
            "[{}/{}] bearing {} no data at {} m",
            progress.attempted,
            progress.planned,
            progress.bearing_deg,
            progress.distance_m
        ),
    }
}
