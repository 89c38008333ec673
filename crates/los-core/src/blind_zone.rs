//! Blind-zone and coverage circles.

use crate::models::{BlindZoneCircle, CirclePolygon, Coordinate};
use crate::spatial::circle_ring;

/// Ground radius hidden below the radar cone: `tan(cone) * height`, never negative.
pub fn blind_zone_radius(cone_angle_deg: f64, effective_height_m: f64) -> f64 {
    let radius = cone_angle_deg.to_radians().tan() * effective_height_m;
    if radius.is_finite() {
        radius.max(0.0)
    } else {
        0.0
    }
}

pub fn blind_zone(
    center: Coordinate,
    cone_angle_deg: f64,
    effective_height_m: f64,
    steps: usize,
) -> BlindZoneCircle {
    let radius_m = blind_zone_radius(cone_angle_deg, effective_height_m);
    CirclePolygon {
        center,
        radius_m,
        ring: circle_ring(center, radius_m, steps),
    }
}

/// Outer extent of the analysis.
pub fn coverage_circle(center: Coordinate, radius_m: f64, steps: usize) -> CirclePolygon {
    CirclePolygon {
        center,
        radius_m,
        ring: circle_ring(center, radius_m, steps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::haversine_distance;

    #[test]
    fn radius_is_zero_when_angle_or_height_is_zero() {
        assert_eq!(blind_zone_radius(0.0, 120.0), 0.0);
        assert_eq!(blind_zone_radius(30.0, 0.0), 0.0);
    }

    #[test]
    fn radius_matches_tangent() {
        assert!((blind_zone_radius(45.0, 100.0) - 100.0).abs() < 1e-9);
        let expected = 10f64.to_radians().tan() * 50.0;
        assert!((blind_zone_radius(10.0, 50.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn radius_is_monotonic_in_angle_and_height() {
        let mut previous = 0.0;
        for angle in (0..90).map(f64::from) {
            let radius = blind_zone_radius(angle, 100.0);
            assert!(radius >= previous, "angle {angle}");
            previous = radius;
        }

        let mut previous = 0.0;
        for height in (0..50).map(|h| f64::from(h) * 10.0) {
            let radius = blind_zone_radius(20.0, height);
            assert!(radius >= previous, "height {height}");
            previous = radius;
        }
    }

    #[test]
    fn negative_height_clamps_to_zero() {
        assert_eq!(blind_zone_radius(20.0, -30.0), 0.0);
    }

    #[test]
    fn circle_uses_requested_tessellation() {
        let center = Coordinate::new(30.0, 59.0);
        let circle = blind_zone(center, 45.0, 200.0, 64);
        assert_eq!(circle.ring.len(), 65);
        assert!((haversine_distance(center, circle.ring[10]) - 200.0).abs() < 0.01);

        let coverage = coverage_circle(center, 1_000.0, 256);
        assert_eq!(coverage.ring.len(), 257);
        assert_eq!(coverage.radius_m, 1_000.0);
    }
}
