use tracing::{debug, trace};

use super::convolution::convolution_ring;
use super::filter::point_in_buffer;
use super::params::BufferParams;
use super::report::{BufferReport, Diagnostic};
use crate::error::{GeometryError, Result};
use crate::geometry::{Polygon, Ring};
use crate::math::ellipse_2d::EllipticMetric;
use crate::math::polygon_2d::{interior_point, point_in_ring, PointLocation};
use crate::math::{Point2, Vector2};
use crate::planar::{build_many, ContourExtractor, ContourKind, Side};

/// Largest share of an edge's length a face sample may lie away from it.
const SAMPLE_OFFSET_RATIO: f64 = 0.25;

/// Shrinks an area by the distance ellipse.
///
/// Every boundary ring is offset into the area and all curves are
/// arranged in one planar graph. A face survives when a sample just inside
/// it lies in the area and outside the buffer of every ring. Surviving
/// bounded faces become shells; surviving outer walks of nested components
/// become holes of the smallest shell around them.
///
/// The result may be empty or hold several polygons.
///
/// # Errors
///
/// Returns `GeometryError::TooFewPoints` when the outer ring has fewer than
/// 2 distinct points, or a `GraphError` from the contour walk.
pub fn erode(outer: &Ring, holes: &[Ring], params: &BufferParams, report: &mut BufferReport) -> Result<Vec<Polygon>> {
    let metric = params.metric();
    let outer = outer.pruned().oriented(true);

    let mut rings = vec![outer.clone()];
    for (index, hole) in holes.iter().enumerate() {
        let hole = hole.pruned().oriented(false);
        let found = hole.distinct_point_count();
        if found < 3 {
            report.record(Diagnostic::SkippedHole {
                index,
                reason: GeometryError::TooFewPoints { found, required: 3 }.to_string(),
            });
            continue;
        }
        rings.push(hole);
    }

    // Left of a counter-clockwise outer ring and of clockwise holes is the
    // inside of the area.
    let curves: Vec<Ring> = rings
        .iter()
        .map(|r| convolution_ring(r, params, Side::Left))
        .collect();
    if curves[0].is_empty() {
        return Err(GeometryError::TooFewPoints {
            found: outer.distinct_point_count(),
            required: 2,
        }
        .into());
    }

    let graph = build_many(&curves)?;
    let mut extractor = ContourExtractor::new(&graph, params.inconsistency_policy());
    let contours = extractor.extract_all()?;
    report
        .diagnostics
        .extend(extractor.truncations().iter().copied().map(Diagnostic::from));

    let mut shells = Vec::new();
    let mut inner = Vec::new();
    for contour in contours {
        let Some((sample, eps)) = face_sample(&contour.ring, &metric, params.tolerance()) else {
            report.record(Diagnostic::NoInteriorPoint {
                points: contour.ring.len(),
            });
            report.discard();
            continue;
        };
        let accepted = in_area(&sample, &rings) && {
            let filter = metric.shrunk(eps * 0.5);
            !rings.iter().any(|r| point_in_buffer(r, &sample, &filter))
        };
        trace!(kind = ?contour.kind, winding = contour.winding, accepted, "eroded face");
        if !accepted {
            report.discard();
            continue;
        }
        report.accept();
        match contour.kind {
            ContourKind::Inner => shells.push(contour.ring.reversed()),
            ContourKind::Outer => inner.push(contour.ring.reversed()),
        }
    }

    let polygons = assign_holes(shells, inner, report);
    debug!(
        rings = rings.len(),
        polygons = polygons.len(),
        candidates = report.candidates,
        discarded = report.discarded,
        "erosion done"
    );
    Ok(polygons)
}

/// A point just right of the midpoint of the longest edge of `ring`, with
/// its distance from that edge.
///
/// The distance follows the arc tolerance so that a chord, which runs up
/// to `tolerance` inside the true offset, still classifies like the arc.
fn face_sample(ring: &Ring, metric: &EllipticMetric, tolerance: f64) -> Option<(Point2, f64)> {
    let (a, b, len) = ring
        .segments()
        .map(|(a, b)| (a.xy(), b.xy(), (b.xy() - a.xy()).norm()))
        .max_by(|x, y| x.2.total_cmp(&y.2))?;
    if len <= 0.0 {
        return None;
    }
    let min_axis = metric.major().min(metric.minor());
    let eps = tolerance.min(SAMPLE_OFFSET_RATIO * len.min(min_axis));
    let dir = (b - a) / len;
    let right = Vector2::new(dir.y, -dir.x);
    Some((Point2::from((a.coords + b.coords) * 0.5) + right * eps, eps))
}

fn in_area(p: &Point2, rings: &[Ring]) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    point_in_ring(p, &outer.points) == PointLocation::Inside
        && holes
            .iter()
            .all(|h| point_in_ring(p, &h.points) == PointLocation::Outside)
}

/// Gives each hole to the smallest shell that contains it.
fn assign_holes(shells: Vec<Ring>, holes: Vec<Ring>, report: &mut BufferReport) -> Vec<Polygon> {
    let mut polygons: Vec<Polygon> = shells.into_iter().map(Polygon::from_outer).collect();
    for hole in holes {
        let Some(sample) = interior_point(&hole.points) else {
            report.record(Diagnostic::NoInteriorPoint { points: hole.len() });
            continue;
        };
        let owner = polygons
            .iter_mut()
            .filter(|p| point_in_ring(&sample, &p.outer.points) == PointLocation::Inside)
            .min_by(|a, b| {
                a.outer
                    .signed_area()
                    .abs()
                    .total_cmp(&b.outer.signed_area().abs())
            });
        match owner {
            Some(polygon) => polygon.holes.push(hole),
            None => report.record(Diagnostic::UnassignedHole { sample }),
        }
    }
    polygons
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::buffer::params::CornerStyle;
    use approx::assert_abs_diff_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        Ring::closed_from_xy(&[
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ])
    }

    #[test]
    fn square_shrinks_to_smaller_square() {
        let mut report = BufferReport::default();
        let polygons = erode(&square(0.0, 0.0, 10.0), &[], &BufferParams::circular(4.0).unwrap(), &mut report).unwrap();
        assert_eq!(polygons.len(), 1);
        let outer = &polygons[0].outer;
        assert!(!outer.is_clockwise());
        assert_abs_diff_eq!(outer.signed_area(), 4.0, epsilon = 1e-9);
        assert!(polygons[0].holes.is_empty());
        assert_eq!(report.kept(), 1);
    }

    #[test]
    fn eroding_past_half_width_leaves_nothing() {
        let mut report = BufferReport::default();
        let polygons = erode(&square(0.0, 0.0, 10.0), &[], &BufferParams::circular(6.0).unwrap(), &mut report).unwrap();
        assert!(polygons.is_empty());
        assert_eq!(report.kept(), 0);
    }

    #[test]
    fn annulus_keeps_its_hole() {
        let mut report = BufferReport::default();
        let params = BufferParams::circular(1.0)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp);
        let polygons = erode(&square(0.0, 0.0, 20.0), &[square(8.0, 8.0, 4.0)], &params, &mut report).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_abs_diff_eq!(polygons[0].outer.signed_area(), 324.0, epsilon = 1e-9);
        assert_eq!(polygons[0].holes.len(), 1);
        let hole = &polygons[0].holes[0];
        assert!(hole.is_clockwise());
        assert_abs_diff_eq!(hole.signed_area(), -36.0, epsilon = 1e-9);
    }

    #[test]
    fn dumbbell_splits_in_two() {
        // Two 10x10 squares joined by a 2 wide neck.
        let dumbbell = Ring::closed_from_xy(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (20.0, 4.0),
            (20.0, 0.0),
            (30.0, 0.0),
            (30.0, 10.0),
            (20.0, 10.0),
            (20.0, 6.0),
            (10.0, 6.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let params = BufferParams::circular(2.0)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp);
        let mut report = BufferReport::default();
        let polygons = erode(&dumbbell, &[], &params, &mut report).unwrap();
        assert_eq!(polygons.len(), 2);
        for p in &polygons {
            assert_abs_diff_eq!(p.outer.signed_area(), 36.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn face_sample_is_right_of_longest_edge() {
        let ring = Ring::closed_from_xy(&[(0.0, 0.0), (0.0, 4.0), (1.0, 3.0), (1.0, 1.0)]);
        let (p, eps) = face_sample(&ring, &EllipticMetric::circular(1.0), 0.01).unwrap();
        assert_abs_diff_eq!(eps, 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(p.x, 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-12);
    }
}
