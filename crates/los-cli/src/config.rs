//! Tool configuration from environment.

use std::env;
use std::time::Duration;

use los_terrain::{ElevationClientConfig, ElevationProvider, RateLimiter};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub elevation_url: String,
    pub elevation_provider: ElevationProvider,
    pub query_interval_ms: u64,
    pub query_burst: u32,
    pub request_timeout_s: u64,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let elevation_provider = var("LOS_ELEVATION_PROVIDER")
            .and_then(|s| ElevationProvider::parse(&s))
            .unwrap_or_default();
        Self {
            elevation_url: var("LOS_ELEVATION_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| elevation_provider.default_url().to_string()),
            elevation_provider,
            query_interval_ms: var("LOS_QUERY_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
            query_burst: var("LOS_QUERY_BURST")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            request_timeout_s: var("LOS_REQUEST_TIMEOUT_S")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            log_json: var("LOS_LOG_FORMAT")
                .map(|s| s.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    pub fn client_config(&self) -> ElevationClientConfig {
        ElevationClientConfig {
            base_url: self.elevation_url.clone(),
            provider: self.elevation_provider,
            request_timeout: Duration::from_secs(self.request_timeout_s.max(1)),
        }
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(
            self.query_burst,
            Duration::from_millis(self.query_interval_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_open_elevation_once_per_second() {
        let config = config(&[]);
        assert_eq!(config.elevation_url, los_terrain::OPEN_ELEVATION_URL);
        assert_eq!(config.elevation_provider, ElevationProvider::OpenElevation);
        assert_eq!(config.query_interval_ms, 1000);
        assert_eq!(config.query_burst, 1);
        assert!(!config.log_json);

        let limiter = config.rate_limiter();
        assert_eq!(limiter.interval(), Duration::from_secs(1));
        assert_eq!(limiter.capacity(), 1);
    }

    #[test]
    fn provider_selects_default_url() {
        let config = config(&[("LOS_ELEVATION_PROVIDER", "open-meteo")]);
        assert_eq!(config.elevation_provider, ElevationProvider::OpenMeteo);
        assert_eq!(config.elevation_url, los_terrain::OPEN_METEO_URL);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config(&[
            ("LOS_ELEVATION_URL", "http://localhost:3001/api/lookup"),
            ("LOS_QUERY_INTERVAL_MS", "250"),
            ("LOS_QUERY_BURST", "4"),
            ("LOS_REQUEST_TIMEOUT_S", "3"),
            ("LOS_LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(config.elevation_url, "http://localhost:3001/api/lookup");
        assert_eq!(config.query_interval_ms, 250);
        assert_eq!(config.query_burst, 4);
        assert!(config.log_json);
        assert_eq!(config.client_config().request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = config(&[
            ("LOS_QUERY_INTERVAL_MS", "fast"),
            ("LOS_ELEVATION_PROVIDER", "srtm"),
        ]);
        assert_eq!(config.query_interval_ms, 1000);
        assert_eq!(config.elevation_provider, ElevationProvider::OpenElevation);
    }
}
