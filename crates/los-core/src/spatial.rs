//! Spherical geometry for sampling and circle tessellation.

use crate::models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial great-circle bearing from `from` to `to`, in degrees [0, 360).
pub fn initial_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lon - from.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Point reached by travelling `distance_m` from `origin` along `bearing_deg`.
///
/// # Arguments
/// * `origin` - Starting position
/// * `bearing_deg` - Compass bearing in degrees (0 = north, 90 = east)
/// * `distance_m` - Great-circle distance in meters
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    if distance_m.abs() <= f64::EPSILON {
        return origin;
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    Coordinate::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Bearings `0, step, 2*step, ...` below 360 degrees.
pub fn bearings(step_deg: f64) -> Vec<f64> {
    if !step_deg.is_finite() || step_deg <= 0.0 {
        return Vec::new();
    }
    let count = (360.0 / step_deg).floor() as usize;
    (0..count).map(|i| i as f64 * step_deg).collect()
}

/// Closed ring of `steps` points at `radius_m` around `center`.
pub fn circle_ring(center: Coordinate, radius_m: f64, steps: usize) -> Vec<Coordinate> {
    let steps = steps.max(3);
    let mut ring: Vec<Coordinate> = (0..steps)
        .map(|i| destination(center, i as f64 * 360.0 / steps as f64, radius_m))
        .collect();
    close_ring(&mut ring);
    ring
}

/// Append the first point if the ring is open.
pub fn close_ring(ring: &mut Vec<Coordinate>) {
    let Some(first) = ring.first().copied() else {
        return;
    };
    if ring.len() == 1 || ring.last() != Some(&first) {
        ring.push(first);
    }
}
