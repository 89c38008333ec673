//! Receiver arguments shared by the binaries.

use clap::Args;
use los_core::{parse_field, BoundaryPolicy, Coordinate, ReceiverConfig, ValidationError};

/// clap value parser that refuses NaN and infinities.
pub fn number(raw: &str) -> Result<f64, ValidationError> {
    parse_field("value", raw)
}

fn policy(raw: &str) -> Result<BoundaryPolicy, String> {
    BoundaryPolicy::parse(raw)
        .ok_or_else(|| format!("unknown policy {raw:?} (outer, exceeding-only, clear-only)"))
}

#[derive(Args, Debug, Clone)]
pub struct ReceiverArgs {
    /// Receiver latitude
    #[arg(long, value_parser = number, default_value = "59.79052973571955", allow_hyphen_values = true)]
    pub lat: f64,

    /// Receiver longitude
    #[arg(long, value_parser = number, default_value = "30.281996992887677", allow_hyphen_values = true)]
    pub lon: f64,

    /// Analysis radius in meters
    #[arg(long, value_parser = number, default_value = "100")]
    pub radius: f64,

    /// Receiver height above ground in meters
    #[arg(long, value_parser = number, default_value = "0")]
    pub height: f64,

    /// Add the ground elevation at the receiver to its height
    #[arg(long)]
    pub ground_offset: bool,

    /// Radar cone angle in degrees
    #[arg(long = "cone-angle", value_parser = number, default_value = "10")]
    pub cone_angle: f64,

    /// Bearing increment in degrees
    #[arg(long = "bearing-step", value_parser = number, default_value = "10")]
    pub bearing_step: f64,

    /// Distance between samples along a bearing in meters
    #[arg(long = "sample-step", value_parser = number, default_value = "100")]
    pub sample_step: f64,

    /// Boundary selection policy
    #[arg(long, value_parser = policy, default_value = "outer")]
    pub policy: BoundaryPolicy,

    /// Distinct vertices required for a visibility polygon
    #[arg(long = "min-vertices", default_value_t = 3)]
    pub min_vertices: usize,

    /// Segments used to draw circles
    #[arg(long = "circle-steps", default_value_t = 256)]
    pub circle_steps: usize,
}

impl ReceiverArgs {
    pub fn to_config(&self) -> Result<ReceiverConfig, ValidationError> {
        let config = ReceiverConfig {
            center: Coordinate::new(self.lon, self.lat),
            radius_m: self.radius,
            height_m: self.height,
            ground_offset: self.ground_offset,
            cone_angle_deg: self.cone_angle,
            bearing_step_deg: self.bearing_step,
            sample_step_m: self.sample_step,
            policy: self.policy,
            min_vertices: self.min_vertices,
            circle_steps: self.circle_steps,
        };
        config.validate()?;
        Ok(config)
    }
}
