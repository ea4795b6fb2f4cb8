use super::Point3;

/// Returns the squared distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist_sq(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (px - ax).powi(2) + (py - ay).powi(2);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest_x = ax + t * dx;
    let closest_y = ay + t * dy;

    (px - closest_x).powi(2) + (py - closest_y).powi(2)
}

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    point_to_segment_dist_sq(px, py, ax, ay, bx, by).sqrt()
}

/// Returns the minimum XY distance from `(px, py)` to any segment of `points`.
///
/// A single point is treated as a degenerate segment; an empty slice gives
/// `f64::MAX`.
#[must_use]
pub fn point_to_polyline_dist(px: f64, py: f64, points: &[Point3]) -> f64 {
    match points {
        [] => f64::MAX,
        [only] => ((px - only.x).powi(2) + (py - only.y).powi(2)).sqrt(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist_sq(px, py, w[0].x, w[0].y, w[1].x, w[1].y))
            .fold(f64::MAX, f64::min)
            .sqrt(),
    }
}
