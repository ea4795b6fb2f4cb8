use std::f64::consts::PI;

use tracing::trace;

use super::params::{BufferParams, CapStyle, CornerStyle};
use crate::geometry::Ring;
use crate::math::ellipse_2d::{norm_vector, EllipticMetric};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::{Point2, Point3, Vector2};
use crate::planar::Side;

/// `|cross|` below which two consecutive directions count as collinear.
const COLLINEAR_EPS: f64 = 1e-12;

/// Slack, relative to the segment length, when testing whether a concave
/// corner point lies on both offset segments.
const ON_SEGMENT_EPS: f64 = 1e-9;

/// A ring segment moved by the offset vector of its direction.
struct OffsetSegment {
    start: Point2,
    end: Point2,
    dir: Vector2,
    len: f64,
    /// Offset vector, relative to the original segment.
    offset: Vector2,
}

/// What to emit at a concave corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConcaveJoin {
    /// Offset-line intersection when it lies on both offset segments,
    /// otherwise a straight connection. Loops are left to the planar graph.
    Clipped,
    /// Offset-line intersection whenever the lines cross.
    Extended,
}

/// Corner joining rules shared by the convolution curve and the parallel
/// line.
struct Joiner {
    metric: EllipticMetric,
    sign: f64,
    corner: CornerStyle,
    cap: CapStyle,
    tolerance: f64,
    miter_limit: Option<f64>,
    concave: ConcaveJoin,
}

impl Joiner {
    fn new(params: &BufferParams, side: Side, concave: ConcaveJoin) -> Self {
        Self {
            metric: params.metric(),
            sign: side.sign(),
            corner: params.corner_style(),
            cap: params.cap_style(),
            tolerance: params.tolerance(),
            miter_limit: params.miter_limit(),
            concave,
        }
    }

    /// Phase A: offsets every non-degenerate segment of `points`.
    /// Returns the segments together with the index of their start point.
    fn offset_segments(&self, points: &[Point3]) -> Vec<(usize, OffsetSegment)> {
        points
            .windows(2)
            .enumerate()
            .filter_map(|(i, w)| {
                let dir = norm_vector(&w[0], &w[1])?;
                let offset = self.metric.tangent_point(dir * self.sign);
                let (a, b) = (w[0].xy(), w[1].xy());
                Some((
                    i,
                    OffsetSegment {
                        start: a + offset,
                        end: b + offset,
                        dir,
                        len: (b - a).norm(),
                        offset,
                    },
                ))
            })
            .collect()
    }

    /// Phase B: appends the points joining `prev` to `cur` around `vertex`,
    /// from `prev.end` (or its replacement) to `cur.start`.
    fn join(&self, prev: &OffsetSegment, cur: &OffsetSegment, vertex: &Point3, out: &mut Vec<Point3>) {
        let z = vertex.z;
        let push = |out: &mut Vec<Point3>, p: Point2| out.push(Point3::new(p.x, p.y, z));

        let cross = prev.dir.perp(&cur.dir);
        let dot = prev.dir.dot(&cur.dir);

        if cross.abs() <= COLLINEAR_EPS {
            if dot < 0.0 {
                self.turn_back(prev, cur, vertex, out);
            } else {
                push(out, prev.end);
                push(out, cur.start);
            }
            return;
        }

        let turn = cross.atan2(dot);
        if self.sign * turn <= 0.0 {
            // Concave corner: never rounded.
            let r = line_line_intersect_2d(&prev.start, &prev.dir, &cur.start, &cur.dir);
            match (self.concave, r) {
                (ConcaveJoin::Extended, Some((t, _))) => push(out, prev.start + prev.dir * t),
                (ConcaveJoin::Clipped, Some((t, u)))
                    if within(t, prev.len) && within(u, cur.len) =>
                {
                    push(out, prev.start + prev.dir * t);
                }
                _ => {
                    push(out, prev.end);
                    push(out, cur.start);
                }
            }
            return;
        }

        match self.corner {
            CornerStyle::Sharp => self.miter(prev, cur, vertex, out),
            CornerStyle::Round => self.arc(prev, cur, vertex, out),
        }
    }

    /// Joins a direction reversal according to the cap style.
    fn turn_back(&self, prev: &OffsetSegment, cur: &OffsetSegment, vertex: &Point3, out: &mut Vec<Point3>) {
        let z = vertex.z;
        match (self.cap, self.corner) {
            (CapStyle::Cap, CornerStyle::Round) => self.arc(prev, cur, vertex, out),
            (CapStyle::Cap, CornerStyle::Sharp) => {
                let along = cur
                    .offset
                    .try_normalize(0.0)
                    .map_or_else(Vector2::zeros, |n| self.metric.tangent_point(n * self.sign));
                for p in [prev.end, prev.end + along, cur.start + along, cur.start] {
                    out.push(Point3::new(p.x, p.y, z));
                }
            }
            (CapStyle::Butt, _) => {
                out.push(Point3::new(prev.end.x, prev.end.y, z));
                out.push(Point3::new(cur.start.x, cur.start.y, z));
            }
        }
    }

    /// Sharp convex corner: the offset-line intersection, or a bevel when
    /// the lines are parallel or the tip exceeds the miter limit.
    fn miter(&self, prev: &OffsetSegment, cur: &OffsetSegment, vertex: &Point3, out: &mut Vec<Point3>) {
        let z = vertex.z;
        let tip = line_line_intersect_2d(&prev.start, &prev.dir, &cur.start, &cur.dir)
            .map(|(t, _)| prev.start + prev.dir * t)
            .filter(|r| {
                self.miter_limit.is_none_or(|limit| {
                    (*r - vertex.xy()).norm() <= limit * self.metric.max_axis()
                })
            });
        match tip {
            Some(r) => out.push(Point3::new(r.x, r.y, z)),
            None => {
                out.push(Point3::new(prev.end.x, prev.end.y, z));
                out.push(Point3::new(cur.start.x, cur.start.y, z));
            }
        }
    }

    /// Round convex corner: a fan on the offset ellipse centred at `vertex`
    /// from the incoming to the outgoing offset vector.
    #[allow(clippy::cast_precision_loss)]
    fn arc(&self, prev: &OffsetSegment, cur: &OffsetSegment, vertex: &Point3, out: &mut Vec<Point3>) {
        let z = vertex.z;
        let center = vertex.xy();
        let phi1 = self.metric.parameter_of(prev.offset);
        let phi2 = self.metric.parameter_of(cur.offset);
        let mut sweep = self.sign * (phi2 - phi1);
        if sweep < 0.0 {
            sweep += 2.0 * PI;
        }
        let n = self.metric.arc_segment_count(sweep, self.tolerance);
        let step = self.sign * sweep / n as f64;

        out.push(Point3::new(prev.end.x, prev.end.y, z));
        for j in 1..n {
            let p = center + self.metric.point_at(phi1 + j as f64 * step);
            out.push(Point3::new(p.x, p.y, z));
        }
        out.push(Point3::new(cur.start.x, cur.start.y, z));
    }
}

fn within(t: f64, len: f64) -> bool {
    let eps = len * ON_SEGMENT_EPS;
    t >= -eps && t <= len + eps
}

/// Builds the convolution curve of a closed ring: every segment offset to
/// `side` by the distance ellipse, consecutive offsets joined around the
/// shared vertex.
///
/// The result is closed and pruned and may intersect itself. An open ring
/// is closed first. Fewer than 2 distinct points give an empty ring; zero
/// distance gives the pruned ring.
#[must_use]
pub fn convolution_ring(ring: &Ring, params: &BufferParams, side: Side) -> Ring {
    let mut ring = ring.pruned();
    ring.close();
    if ring.distinct_point_count() < 2 {
        return Ring::default();
    }
    if params.is_zero() {
        return ring;
    }

    let joiner = Joiner::new(params, side, ConcaveJoin::Clipped);
    let segments = joiner.offset_segments(&ring.points);
    let m = segments.len();
    let mut out = Vec::with_capacity(m * 4);
    for k in 0..m {
        let (i, cur) = &segments[k];
        let (_, prev) = &segments[(k + m - 1) % m];
        joiner.join(prev, cur, &ring.points[*i], &mut out);
    }

    let mut curve = Ring::new(out);
    curve.close();
    curve.prune();
    trace!(input = ring.len(), output = curve.len(), ?side, "convolution curve");
    curve
}

/// Builds the line parallel to `line` on `side`.
///
/// An open line gives an open result from the first to the last offset
/// point; a closed one gives a closed result. Self-intersection loops are
/// kept.
#[must_use]
pub fn parallel_line(line: &Ring, params: &BufferParams, side: Side) -> Ring {
    let line = line.pruned();
    if line.distinct_point_count() < 2 || params.is_zero() {
        return line;
    }

    let joiner = Joiner::new(params, side, ConcaveJoin::Extended);
    let segments = joiner.offset_segments(&line.points);
    let m = segments.len();
    let mut out = Vec::with_capacity(m * 4);

    if line.is_closed() {
        for k in 0..m {
            let (i, cur) = &segments[k];
            let (_, prev) = &segments[(k + m - 1) % m];
            joiner.join(prev, cur, &line.points[*i], &mut out);
        }
        let mut result = Ring::new(out);
        result.close();
        result.prune();
        return result;
    }

    let (first, seg) = &segments[0];
    out.push(Point3::new(seg.start.x, seg.start.y, line.points[*first].z));
    for k in 1..m {
        let (i, cur) = &segments[k];
        let (_, prev) = &segments[k - 1];
        joiner.join(prev, cur, &line.points[*i], &mut out);
    }
    let (last, seg) = &segments[m - 1];
    out.push(Point3::new(seg.end.x, seg.end.y, line.points[*last + 1].z));

    let mut result = Ring::new(out);
    result.prune();
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Ring {
        Ring::closed_from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn sharp(d: f64) -> BufferParams {
        BufferParams::circular(d)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp)
    }

    #[test]
    fn sharp_square_offset_is_larger_square() {
        let curve = convolution_ring(&square(), &sharp(2.0), Side::Right);
        assert!(curve.is_closed());
        assert_eq!(curve.len(), 5);
        assert_abs_diff_eq!(curve.signed_area(), 196.0, epsilon = 1e-9);
    }

    #[test]
    fn left_side_of_ccw_square_shrinks_it() {
        let curve = convolution_ring(&square(), &sharp(2.0), Side::Left);
        assert_eq!(curve.len(), 5);
        assert_abs_diff_eq!(curve.signed_area(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn round_corners_add_arc_points_on_the_circle() {
        let params = BufferParams::circular(2.0).unwrap().with_tolerance(0.01).unwrap();
        let curve = convolution_ring(&square(), &params, Side::Right);
        assert!(curve.len() > 5 + 4 * 4);
        // Every point lies 2 away from the square.
        for p in &curve.points {
            let d = crate::math::distance_2d::point_to_polyline_dist(p.x, p.y, &square().points);
            assert_abs_diff_eq!(d, 2.0, epsilon = 1e-9);
        }
        let area = curve.signed_area();
        assert!(area < 180.0 + 4.0 * PI);
        assert!(area > 180.0 + 4.0 * PI - 0.5);
    }

    #[test]
    fn single_segment_line_gets_round_caps() {
        let line = Ring::closed_from_xy(&[(0.0, 0.0), (10.0, 0.0)]);
        let curve = convolution_ring(&line, &BufferParams::circular(1.0).unwrap(), Side::Right);
        let min_x = curve.points.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        let max_x = curve.points.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert_abs_diff_eq!(min_x, -1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(max_x, 11.0, epsilon = 1e-3);
        assert!(!curve.is_clockwise());
    }

    #[test]
    fn square_caps_and_butt_ends() {
        let line = Ring::closed_from_xy(&[(0.0, 0.0), (10.0, 0.0)]);

        let square_cap = convolution_ring(&line, &sharp(1.0), Side::Right);
        assert_abs_diff_eq!(square_cap.signed_area(), 24.0, epsilon = 1e-9);

        let butt = BufferParams::circular(1.0)
            .unwrap()
            .with_cap_style(CapStyle::Butt);
        let curve = convolution_ring(&line, &butt, Side::Right);
        assert_eq!(curve.len(), 5);
        assert_abs_diff_eq!(curve.signed_area(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn concave_corner_is_clipped() {
        // An L: the reflex corner at (5, 5) is concave on the outside.
        let l_shape = Ring::closed_from_xy(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (5.0, 5.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ]);
        let curve = convolution_ring(&l_shape, &sharp(1.0), Side::Right);
        assert_eq!(curve.len(), 7);
        assert!(curve
            .points
            .iter()
            .any(|p| (p.x - 6.0).abs() < 1e-9 && (p.y - 6.0).abs() < 1e-9));
    }

    #[test]
    fn miter_limit_bevels_spikes() {
        let spike = Ring::closed_from_xy(&[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0)]);
        let unlimited = convolution_ring(&spike, &sharp(1.0), Side::Right);
        let limited = convolution_ring(&spike, &sharp(1.0).with_miter_limit(2.0), Side::Right);
        assert!(limited.len() > unlimited.len());
        let reach = |r: &Ring| r.points.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert!(reach(&limited) < reach(&unlimited));
    }

    #[test]
    fn elliptic_offset_reaches_the_axes() {
        let params = BufferParams::new(3.0, 1.0, 0.0).unwrap();
        let curve = convolution_ring(&square(), &params, Side::Right);
        let min_x = curve.points.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        let min_y = curve.points.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        assert_abs_diff_eq!(min_x, -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(min_y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn z_comes_from_the_corner_vertex() {
        let ring = Ring::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(4.0, 4.0, 3.0),
            Point3::new(0.0, 0.0, 1.0),
        ]);
        let curve = convolution_ring(&ring, &sharp(1.0), Side::Right);
        for p in &curve.points {
            assert!([1.0, 2.0, 3.0].iter().any(|z| (p.z - z).abs() < 1e-15));
        }
    }

    #[test]
    fn degenerate_and_zero_inputs() {
        let dot = Ring::from_xy(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(convolution_ring(&dot, &sharp(1.0), Side::Right).is_empty());
        let zero = BufferParams::circular(0.0).unwrap();
        assert_eq!(convolution_ring(&square(), &zero, Side::Right), square());
    }

    #[test]
    fn parallel_line_of_open_polyline() {
        let line = Ring::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let left = parallel_line(&line, &sharp(1.0), Side::Left);
        assert_eq!(left.len(), 3);
        assert_abs_diff_eq!(left.points[0].y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(left.points[1].x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(left.points[1].y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(left.points[2].x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(left.points[2].y, 10.0, epsilon = 1e-12);

        let right = parallel_line(&line, &BufferParams::circular(1.0).unwrap(), Side::Right);
        assert!(right.len() > 4);
        assert_abs_diff_eq!(right.points[0].y, -1.0, epsilon = 1e-12);
        assert!(!right.is_closed());
    }

    #[test]
    fn finer_tolerance_never_loses_arc_points() {
        let mut last = 0;
        for tol in [1.0, 0.1, 0.01, 0.001] {
            let params = BufferParams::circular(5.0).unwrap().with_tolerance(tol).unwrap();
            let n = convolution_ring(&square(), &params, Side::Right).len();
            assert!(n >= last);
            last = n;
        }
    }
}
