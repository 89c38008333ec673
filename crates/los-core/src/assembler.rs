//! Boundary assembly: one point per bearing, closed into a ring.

use std::cmp::Ordering;

use crate::models::{BearingResult, BoundaryPolicy, Coordinate, VisibilityPolygon};
use crate::spatial::close_ring;

/// Build the visibility polygon from per-bearing results.
///
/// Returns `None` when fewer than `min_vertices` distinct boundary points
/// survive the policy.
pub fn assemble(
    results: &[BearingResult],
    policy: BoundaryPolicy,
    min_vertices: usize,
) -> Option<VisibilityPolygon> {
    let mut selected: Vec<(f64, Coordinate)> = results
        .iter()
        .filter_map(|result| {
            result
                .boundary(policy)
                .map(|sample| (result.bearing_deg, sample.coordinate))
        })
        .collect();
    selected.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut ring: Vec<Coordinate> = Vec::with_capacity(selected.len() + 1);
    for (_, point) in selected {
        if !ring.contains(&point) {
            ring.push(point);
        }
    }

    if ring.len() < min_vertices.max(3) {
        tracing::debug!(
            "Only {} distinct boundary point(s) under {:?}, no polygon",
            ring.len(),
            policy
        );
        return None;
    }

    close_ring(&mut ring);
    Some(VisibilityPolygon { ring })
}
