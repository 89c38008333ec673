//! HTTP elevation lookups against public elevation APIs.

use std::time::Duration;

use los_core::{Coordinate, ElevationError, ElevationSource};
use reqwest::Client;
use serde::Deserialize;

pub const OPEN_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/elevation";

/// Wire format spoken by the elevation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElevationProvider {
    /// `?locations=lat,lon` -> `results[0].elevation`
    #[default]
    OpenElevation,
    /// `?latitude=..&longitude=..` -> `elevation[0]`
    OpenMeteo,
}

impl ElevationProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "open-elevation" | "open_elevation" | "openelevation" => Some(Self::OpenElevation),
            "open-meteo" | "open_meteo" | "openmeteo" => Some(Self::OpenMeteo),
            _ => None,
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            Self::OpenElevation => OPEN_ELEVATION_URL,
            Self::OpenMeteo => OPEN_METEO_URL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElevationClientConfig {
    pub base_url: String,
    pub provider: ElevationProvider,
    pub request_timeout: Duration,
}

impl Default for ElevationClientConfig {
    fn default() -> Self {
        Self {
            base_url: OPEN_ELEVATION_URL.to_string(),
            provider: ElevationProvider::OpenElevation,
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenElevationResponse {
    results: Vec<OpenElevationResult>,
}

#[derive(Debug, Deserialize)]
struct OpenElevationResult {
    elevation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoElevationResponse {
    elevation: Option<Vec<f64>>,
}

/// Single-point elevation client. Performs no caching and no retries.
#[derive(Debug, Clone)]
pub struct ElevationClient {
    client: Client,
    config: ElevationClientConfig,
}

impl ElevationClient {
    pub fn new(config: ElevationClientConfig) -> Result<Self, ElevationError> {
        if config.base_url.trim().is_empty() {
            return Err(ElevationError::Request(
                "elevation provider URL is empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ElevationError::Request(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn lookup_url(&self, at: Coordinate) -> String {
        build_provider_url(&self.config.base_url, self.config.provider, at)
    }

    /// Ground elevation in meters at `at`.
    pub async fn lookup(&self, at: Coordinate) -> Result<f64, ElevationError> {
        let url = self.lookup_url(at);
        tracing::debug!("Fetching elevation: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ElevationError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ElevationError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ElevationError::Request(err.to_string()))?;
        parse_elevation(self.config.provider, &body)
    }
}

impl ElevationSource for ElevationClient {
    async fn elevation(&self, at: Coordinate) -> Result<f64, ElevationError> {
        self.lookup(at).await
    }
}

/// Extract the first elevation from a provider response body.
pub fn parse_elevation(provider: ElevationProvider, body: &[u8]) -> Result<f64, ElevationError> {
    let malformed = |err: serde_json::Error| ElevationError::Malformed(err.to_string());
    let value = match provider {
        ElevationProvider::OpenElevation => {
            let payload: OpenElevationResponse = serde_json::from_slice(body).map_err(malformed)?;
            payload
                .results
                .first()
                .ok_or_else(|| ElevationError::Malformed("empty results".to_string()))?
                .elevation
                .ok_or_else(|| ElevationError::Malformed("missing elevation".to_string()))?
        }
        ElevationProvider::OpenMeteo => {
            let payload: OpenMeteoElevationResponse =
                serde_json::from_slice(body).map_err(malformed)?;
            payload
                .elevation
                .and_then(|values| values.first().copied())
                .ok_or_else(|| ElevationError::Malformed("missing elevation".to_string()))?
        }
    };

    if !value.is_finite() {
        return Err(ElevationError::Malformed(format!(
            "non-finite elevation {}",
            value
        )));
    }
    Ok(value)
}

fn build_provider_url(base: &str, provider: ElevationProvider, at: Coordinate) -> String {
    let separator = if base.contains('?') { "&" } else { "?" };
    match provider {
        ElevationProvider::OpenElevation => {
            format!("{}{}locations={:.6},{:.6}", base, separator, at.lat, at.lon)
        }
        ElevationProvider::OpenMeteo => format!(
            "{}{}latitude={:.6}&longitude={:.6}",
            base, separator, at.lat, at.lon
        ),
    }
}
