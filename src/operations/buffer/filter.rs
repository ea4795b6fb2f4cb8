use tracing::trace;

use super::report::{BufferReport, Diagnostic};
use crate::geometry::Ring;
use crate::math::distance_2d::point_to_segment_dist_sq;
use crate::math::ellipse_2d::EllipticMetric;
use crate::math::polygon_2d::interior_point;
use crate::math::{Point2, TOLERANCE};

/// Returns `true` when `p` lies within the distance ellipse of some point
/// of `ring`.
///
/// Circular metrics compare squared segment distances. Elliptical ones
/// project `p` onto each segment along the ellipse tangent point of the
/// segment direction, which is where the scaled ellipse first touches the
/// segment, and measure the offset in unit-circle space.
#[must_use]
pub fn point_in_buffer(ring: &Ring, p: &Point2, metric: &EllipticMetric) -> bool {
    match ring.points.as_slice() {
        [] => false,
        [only] => metric.inverse_transform(*p - only.xy()).norm_squared() <= 1.0,
        points if metric.is_circular() => {
            let d2 = metric.major() * metric.major();
            points.windows(2).any(|w| {
                point_to_segment_dist_sq(p.x, p.y, w[0].x, w[0].y, w[1].x, w[1].y) <= d2
            })
        }
        points => points.windows(2).any(|w| {
            let (a, b) = (w[0].xy(), w[1].xy());
            let m = b - a;
            let len = m.norm();
            let nearest = if len > 0.0 {
                let c = metric.tangent_point(m / len);
                let k = (*p - a).perp(&c) / m.perp(&c);
                a + m * k.clamp(0.0, 1.0)
            } else {
                a
            };
            metric.inverse_transform(*p - nearest).norm_squared() <= 1.0
        }),
    }
}

/// Checks the shape of a candidate contour and finds its interior sample
/// point. Failures are recorded in `report` and give `None`.
pub(crate) fn candidate_sample(ring: &Ring, report: &mut BufferReport) -> Option<Point2> {
    if ring.signed_area().abs() < TOLERANCE {
        trace!(points = ring.len(), "candidate rejected: zero area");
        report.record(Diagnostic::ZeroAreaCandidate);
        return None;
    }
    if !ring.is_closed() {
        trace!(points = ring.len(), "candidate rejected: not closed");
        report.record(Diagnostic::OpenCandidate);
        return None;
    }
    let sample = interior_point(&ring.points);
    if sample.is_none() {
        report.record(Diagnostic::NoInteriorPoint { points: ring.len() });
    }
    sample
}
