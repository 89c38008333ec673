//! GeoJSON export of a coverage result for map renderers.

use los_core::{Coordinate, CoverageResult};
use serde_json::{json, Value};

/// Rings are built with ascending bearings (clockwise); GeoJSON exterior
/// rings run counter-clockwise (RFC 7946 section 3.1.6).
fn ring_coordinates(ring: &[Coordinate]) -> Vec<[f64; 2]> {
    ring.iter().rev().map(|c| c.to_lon_lat()).collect()
}

fn polygon_feature(ring: &[Coordinate], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [ring_coordinates(ring)],
        },
        "properties": properties,
    })
}

/// Coverage circle, visibility polygon, blind zone and blocked samples, in
/// drawing order.
pub fn feature_collection(result: &CoverageResult) -> Value {
    let mut features = vec![polygon_feature(
        &result.coverage.ring,
        json!({ "kind": "coverage", "radius_m": result.coverage.radius_m }),
    )];

    if let Some(polygon) = &result.polygon {
        features.push(polygon_feature(
            &polygon.ring,
            json!({
                "kind": "visibility",
                "policy": result.config.policy,
                "vertices": polygon.vertex_count(),
                "area_m2": polygon.area_m2(),
            }),
        ));
    }

    if result.blind_zone.radius_m > 0.0 {
        features.push(polygon_feature(
            &result.blind_zone.ring,
            json!({
                "kind": "blind_zone",
                "radius_m": result.blind_zone.radius_m,
                "cone_angle_deg": result.config.cone_angle_deg,
            }),
        ));
    }

    features.extend(result.blocked_samples().map(|sample| {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": sample.coordinate.to_lon_lat(),
            },
            "properties": {
                "kind": "blocked",
                "elevation_m": sample.elevation_m,
                "bearing_deg": sample.bearing_deg,
                "distance_m": sample.distance_m,
            },
        })
    }));

    json!({
        "type": "FeatureCollection",
        "features": features,
        "properties": {
            "center": result.config.center.to_lon_lat(),
            "effective_height_m": result.effective_height_m,
            "receiver_ground_m": result.receiver_ground_m,
            "queries": result.stats.attempted,
            "failed_queries": result.stats.failed,
            "computed_at": result.computed_at,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use los_core::{calculate, BoundaryPolicy, ElevationError, ReceiverConfig};

    const CENTER: Coordinate = Coordinate::new(30.0, 59.0);

    fn receiver(cone_angle_deg: f64) -> ReceiverConfig {
        ReceiverConfig {
            center: CENTER,
            radius_m: 300.0,
            height_m: 50.0,
            ground_offset: false,
            cone_angle_deg,
            bearing_step_deg: 90.0,
            sample_step_m: 100.0,
            policy: BoundaryPolicy::Outer,
            min_vertices: 3,
            circle_steps: 32,
        }
    }

    /// Terrain above the receiver only north of it.
    fn ridge_north(at: Coordinate) -> Result<f64, ElevationError> {
        Ok(if at.lat > CENTER.lat + 0.0015 { 80.0 } else { 10.0 })
    }

    fn kinds(collection: &Value) -> Vec<String> {
        collection["features"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["properties"]["kind"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn exports_layers_in_drawing_order() {
        let result = calculate(&ridge_north, &receiver(10.0)).await.unwrap();
        let collection = feature_collection(&result);

        assert_eq!(collection["type"], "FeatureCollection");
        assert_eq!(
            kinds(&collection),
            vec!["coverage", "visibility", "blind_zone", "blocked"]
        );

        let visibility = &collection["features"][1];
        let ring = visibility["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(visibility["properties"]["policy"], "outer");

        let blocked = &collection["features"][3];
        assert_eq!(blocked["geometry"]["type"], "Point");
        assert_eq!(blocked["properties"]["elevation_m"], 80.0);
        assert_eq!(blocked["properties"]["distance_m"], 200.0);
        let lon = blocked["geometry"]["coordinates"][0].as_f64().unwrap();
        assert!((lon - CENTER.lon).abs() < 1e-9);
    }

    /// Shoelace sum over a closed `[lon, lat]` ring; positive when counter-clockwise.
    fn signed_area(ring: &Value) -> f64 {
        let points: Vec<(f64, f64)> = ring
            .as_array()
            .unwrap()
            .iter()
            .map(|p| (p[0].as_f64().unwrap(), p[1].as_f64().unwrap()))
            .collect();
        points
            .windows(2)
            .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
            .sum::<f64>()
            / 2.0
    }

    #[tokio::test]
    async fn polygon_rings_wind_counter_clockwise() {
        let result = calculate(&ridge_north, &receiver(10.0)).await.unwrap();
        let collection = feature_collection(&result);

        for feature in collection["features"].as_array().unwrap() {
            if feature["geometry"]["type"] != "Polygon" {
                continue;
            }
            let ring = &feature["geometry"]["coordinates"][0];
            assert!(
                signed_area(ring) > 0.0,
                "{} ring winds clockwise",
                feature["properties"]["kind"]
            );
            let points = ring.as_array().unwrap();
            assert_eq!(points.first(), points.last());
        }
    }

    #[tokio::test]
    async fn zero_radius_blind_zone_is_skipped() {
        let result = calculate(&ridge_north, &receiver(0.0)).await.unwrap();
        let collection = feature_collection(&result);
        assert!(!kinds(&collection).contains(&"blind_zone".to_string()));
    }
}
