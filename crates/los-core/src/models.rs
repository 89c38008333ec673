//! Core data models for line-of-sight coverage.

use chrono::{DateTime, Utc};
use geo::{ChamberlainDuquetteArea, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]` ordering used by GeoJSON.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// One elevation lookup along a bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub coordinate: Coordinate,
    pub elevation_m: f64,
    pub bearing_deg: f64,
    pub distance_m: f64,
    /// Elevation exceeded the effective receiver height.
    pub above_threshold: bool,
}

/// Which sampled point represents a bearing in the visibility polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// First point above the threshold, else the farthest sampled point.
    #[default]
    Outer,
    /// First point above the threshold; bearings that never exceed it are dropped.
    ExceedingOnly,
    /// Farthest point at or below the threshold.
    ClearOnly,
}

impl BoundaryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "outer" | "outer_boundary" => Some(Self::Outer),
            "exceeding" | "exceeding_only" => Some(Self::ExceedingOnly),
            "clear" | "clear_only" => Some(Self::ClearOnly),
            _ => None,
        }
    }
}

/// Receiver parameters for one coverage calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    pub center: Coordinate,
    /// Maximum sampling distance in meters
    pub radius_m: f64,
    /// Receiver height above ground in meters
    pub height_m: f64,
    /// Add the ground elevation at `center` to `height_m`
    #[serde(default)]
    pub ground_offset: bool,
    /// Radar cone (minimum look-down) angle in degrees
    pub cone_angle_deg: f64,
    /// Increment between sampled bearings in degrees
    pub bearing_step_deg: f64,
    /// Distance between samples along a bearing in meters
    #[serde(default = "default_sample_step_m")]
    pub sample_step_m: f64,
    #[serde(default)]
    pub policy: BoundaryPolicy,
    /// Distinct vertices required before a polygon is produced
    #[serde(default = "default_min_vertices")]
    pub min_vertices: usize,
    /// Segments used to tessellate circles
    #[serde(default = "default_circle_steps")]
    pub circle_steps: usize,
}

fn default_sample_step_m() -> f64 {
    100.0
}

fn default_min_vertices() -> usize {
    3
}

fn default_circle_steps() -> usize {
    256
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            center: Coordinate::new(30.281996992887677, 59.79052973571955),
            radius_m: 100.0,
            height_m: 0.0,
            ground_offset: false,
            cone_angle_deg: 10.0,
            bearing_step_deg: 10.0,
            sample_step_m: default_sample_step_m(),
            policy: BoundaryPolicy::Outer,
            min_vertices: default_min_vertices(),
            circle_steps: default_circle_steps(),
        }
    }
}

/// Samples collected along a single bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingResult {
    pub bearing_deg: f64,
    /// Successful samples, nearest first.
    pub samples: Vec<ElevationSample>,
    /// Queries issued, including failed ones.
    pub attempted: usize,
}

impl BearingResult {
    /// Sample where terrain first rose above the threshold.
    pub fn first_exceeding(&self) -> Option<&ElevationSample> {
        self.samples.iter().find(|sample| sample.above_threshold)
    }

    pub fn farthest(&self) -> Option<&ElevationSample> {
        self.samples.last()
    }

    pub fn farthest_clear(&self) -> Option<&ElevationSample> {
        self.samples
            .iter()
            .rev()
            .find(|sample| !sample.above_threshold)
    }

    /// Boundary point for this bearing under `policy`.
    pub fn boundary(&self, policy: BoundaryPolicy) -> Option<&ElevationSample> {
        match policy {
            BoundaryPolicy::Outer => self.first_exceeding().or_else(|| self.farthest()),
            BoundaryPolicy::ExceedingOnly => self.first_exceeding(),
            BoundaryPolicy::ClearOnly => self.farthest_clear(),
        }
    }
}

/// Closed ring approximating the visible area. First and last points are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    pub ring: Vec<Coordinate>,
}

impl VisibilityPolygon {
    /// Number of vertices, not counting the closing point.
    pub fn vertex_count(&self) -> usize {
        self.ring.len().saturating_sub(1)
    }

    /// Geodesic area estimate in square meters.
    pub fn area_m2(&self) -> f64 {
        let exterior: LineString<f64> = self.ring.iter().map(|c| (c.lon, c.lat)).collect();
        Polygon::new(exterior, vec![]).chamberlain_duquette_unsigned_area()
    }
}

/// Tessellated circle around a center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePolygon {
    pub center: Coordinate,
    pub radius_m: f64,
    pub ring: Vec<Coordinate>,
}

/// Area assumed unobservable below the radar cone.
pub type BlindZoneCircle = CirclePolygon;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    pub attempted: usize,
    pub failed: usize,
}

/// Everything derived from one calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResult {
    pub config: ReceiverConfig,
    pub effective_height_m: f64,
    /// Ground elevation at the receiver, when it was looked up.
    pub receiver_ground_m: Option<f64>,
    pub bearings: Vec<BearingResult>,
    pub polygon: Option<VisibilityPolygon>,
    pub blind_zone: BlindZoneCircle,
    pub coverage: CirclePolygon,
    pub stats: QueryStats,
    pub computed_at: DateTime<Utc>,
}

impl CoverageResult {
    /// Samples where terrain blocks the line of sight.
    pub fn blocked_samples(&self) -> impl Iterator<Item = &ElevationSample> {
        self.bearings
            .iter()
            .flat_map(|bearing| bearing.samples.iter())
            .filter(|sample| sample.above_threshold)
    }

    pub fn sample_count(&self) -> usize {
        self.bearings.iter().map(|b| b.samples.len()).sum()
    }
}
