//! Token-bucket pacing for elevation queries.
//!
//! Public elevation APIs throttle aggressively, so every query waits for a
//! token. With the default capacity of one and a one second refill, queries
//! go out at most once per second.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant, capacity: u32, interval: Duration) {
        if self.tokens >= capacity {
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill);
        let earned = (elapsed.as_nanos() / interval.as_nanos().max(1)).min(u32::MAX as u128) as u32;
        if earned == 0 {
            return;
        }

        self.tokens = self.tokens.saturating_add(earned).min(capacity);
        self.last_refill = if self.tokens >= capacity {
            now
        } else {
            self.last_refill + interval.saturating_mul(earned)
        };
    }
}

/// FIFO token bucket; waiters are served in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    interval: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        let interval = interval.max(Duration::from_millis(1));
        Self {
            capacity,
            interval,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// One query per `interval`, no burst.
    pub fn per_interval(interval: Duration) -> Self {
        Self::new(1, interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Wait until a token is available and take it.
    pub async fn acquire(&self) {
        let mut bucket = self.bucket.lock().await;
        bucket.refill(Instant::now(), self.capacity, self.interval);
        if bucket.tokens == 0 {
            let ready_at = bucket.last_refill + self.interval;
            tokio::time::sleep_until(ready_at).await;
            bucket.refill(Instant::now(), self.capacity, self.interval);
        }
        bucket.tokens = bucket.tokens.saturating_sub(1);
    }

    /// Tokens that could be taken right now without waiting.
    pub async fn available(&self) -> u32 {
        let mut bucket = self.bucket.lock().await;
        bucket.refill(Instant::now(), self.capacity, self.interval);
        bucket.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::per_interval(Duration::from_secs(1))
    }
}
