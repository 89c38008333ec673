//! Elevation lookups for line-of-sight coverage.
//!
//! HTTP client for public elevation APIs, a token-bucket limiter that keeps
//! queries within their rate limits, and a session that runs one coverage
//! calculation at a time.

pub mod cancel;
pub mod client;
pub mod rate_limit;
pub mod session;
pub mod throttled;

pub use cancel::CancelToken;
pub use client::{
    parse_elevation, ElevationClient, ElevationClientConfig, ElevationProvider, OPEN_ELEVATION_URL,
    OPEN_METEO_URL,
};
pub use rate_limit::RateLimiter;
pub use session::CoverageSession;
pub use throttled::Throttled;
