//! Error types shared by the sampler and its elevation sources.

use thiserror::Error;

use crate::validation::ValidationError;

/// Failure of a single elevation query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElevationError {
    #[error("elevation request failed: {0}")]
    Request(String),
    #[error("elevation provider HTTP {0}")]
    Status(u16),
    #[error("malformed elevation response: {0}")]
    Malformed(String),
    #[error("elevation query cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("invalid receiver configuration: {0}")]
    Invalid(#[from] ValidationError),
    #[error("calculation cancelled")]
    Cancelled,
}
