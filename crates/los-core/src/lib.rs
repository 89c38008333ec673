pub mod assembler;
pub mod blind_zone;
pub mod calculate;
pub mod error;
pub mod models;
pub mod sampler;
pub mod spatial;
pub mod validation;

pub use assembler::assemble;
pub use blind_zone::{blind_zone, blind_zone_radius, coverage_circle};
pub use calculate::{calculate, calculate_with_progress};
pub use error::{CalculationError, ElevationError};
pub use models::{
    BearingResult, BlindZoneCircle, BoundaryPolicy, CirclePolygon, Coordinate, CoverageResult,
    ElevationSample, QueryStats, ReceiverConfig, VisibilityPolygon,
};
pub use sampler::{sample, ElevationSource, SampleOutcome, SamplePlan, SampleProgress};
pub use spatial::{destination, haversine_distance};
pub use validation::{parse_field, ValidationError, MAX_CIRCLE_STEPS, MAX_PLANNED_QUERIES};
