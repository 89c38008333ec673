//! Elevation source wrapper adding rate limiting and cancellation.

use std::sync::Arc;

use los_core::{Coordinate, ElevationError, ElevationSource};

use crate::cancel::CancelToken;
use crate::rate_limit::RateLimiter;

/// Waits for a limiter token before each query; both the wait and the query
/// itself give way to cancellation.
pub struct Throttled<S> {
    inner: Arc<S>,
    limiter: Arc<RateLimiter>,
    cancel: CancelToken,
}

impl<S> Throttled<S> {
    pub fn new(inner: Arc<S>, limiter: Arc<RateLimiter>, cancel: CancelToken) -> Self {
        Self {
            inner,
            limiter,
            cancel,
        }
    }
}

impl<S> ElevationSource for Throttled<S>
where
    S: ElevationSource + Send + Sync,
{
    async fn elevation(&self, at: Coordinate) -> Result<f64, ElevationError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ElevationError::Cancelled),
            _ = self.limiter.acquire() => {}
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ElevationError::Cancelled),
            result = self.inner.elevation(at) => result,
        }
    }
}
