//! Receiver input validation.

use thiserror::Error;

use crate::models::ReceiverConfig;

/// Upper bound on elevation queries one configuration may plan.
pub const MAX_PLANNED_QUERIES: usize = 100_000;

/// Upper bound on circle tessellation segments.
pub const MAX_CIRCLE_STEPS: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: usize,
        min: usize,
    },
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },
    #[error("{bearings} bearing(s) x {steps} step(s) exceeds {max} elevation queries")]
    TooManyQueries { bearings: f64, steps: f64, max: usize },
}

/// Parse a numeric text field, rejecting anything that would turn into NaN.
pub fn parse_field(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    Ok(value)
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

impl ReceiverConfig {
    /// Reject configurations that would feed invalid numbers into the geometry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        within("lon", self.center.lon, -180.0, 180.0)?;
        within("lat", self.center.lat, -90.0, 90.0)?;
        non_negative("radius_m", self.radius_m)?;
        non_negative("height_m", self.height_m)?;

        if non_negative("sample_step_m", self.sample_step_m)? == 0.0 {
            return Err(ValidationError::Zero {
                field: "sample_step_m",
            });
        }
        if non_negative("bearing_step_deg", self.bearing_step_deg)? == 0.0 {
            return Err(ValidationError::Zero {
                field: "bearing_step_deg",
            });
        }
        within("bearing_step_deg", self.bearing_step_deg, 0.0, 360.0)?;

        // tan() diverges at 90 degrees.
        let cone = non_negative("cone_angle_deg", self.cone_angle_deg)?;
        if cone >= 90.0 {
            return Err(ValidationError::OutOfRange {
                field: "cone_angle_deg",
                value: cone,
                min: 0.0,
                max: 90.0,
            });
        }

        if self.min_vertices < 3 {
            return Err(ValidationError::TooSmall {
                field: "min_vertices",
                value: self.min_vertices,
                min: 3,
            });
        }
        if self.circle_steps < 3 {
            return Err(ValidationError::TooSmall {
                field: "circle_steps",
                value: self.circle_steps,
                min: 3,
            });
        }
        if self.circle_steps > MAX_CIRCLE_STEPS {
            return Err(ValidationError::TooLarge {
                field: "circle_steps",
                value: self.circle_steps,
                max: MAX_CIRCLE_STEPS,
            });
        }

        // Counted in f64 so tiny steps cannot overflow before the comparison.
        let bearings = (360.0 / self.bearing_step_deg).floor();
        let steps = ((self.radius_m / self.sample_step_m) + 1e-9).floor();
        if bearings * steps > MAX_PLANNED_QUERIES as f64 {
            return Err(ValidationError::TooManyQueries {
                bearings,
                steps,
                max: MAX_PLANNED_QUERIES,
            });
        }
        Ok(())
    }
}
