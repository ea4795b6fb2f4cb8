#![allow(clippy::unwrap_used)]

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use geobuffer::geometry::{Polygon, Ring};
use geobuffer::math::distance_2d::point_to_polyline_dist;
use geobuffer::math::intersect_2d::segment_intersection_2d;
use geobuffer::math::polygon_2d::point_in_ring;
use geobuffer::math::Point2;
use geobuffer::operations::buffer::{
    AreaBuffer2D, BufferOutput, BufferParams, CornerStyle, LineBuffer2D,
};
use tracing_subscriber::EnvFilter;

/// Set `RUST_LOG=geobuffer=debug` to see the pipeline milestones.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn square(x0: f64, y0: f64, size: f64) -> Ring {
    Ring::closed_from_xy(&[
        (x0, y0),
        (x0 + size, y0),
        (x0 + size, y0 + size),
        (x0, y0 + size),
    ])
}

fn l_shape() -> Ring {
    Ring::closed_from_xy(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 5.0),
        (5.0, 5.0),
        (5.0, 10.0),
        (0.0, 10.0),
    ])
}

fn area_buffer(area: Polygon, params: BufferParams) -> BufferOutput {
    AreaBuffer2D::new(area, params).execute().unwrap()
}

/// No two non-adjacent edges of the closed ring touch.
fn assert_simple(ring: &Ring) {
    let pts = &ring.points;
    let n = pts.len() - 1;
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let hit = segment_intersection_2d(&pts[i].xy(), &pts[i + 1].xy(), &pts[j].xy(), &pts[j + 1].xy());
            assert!(hit.is_none(), "edges {i} and {j} meet: {hit:?}");
        }
    }
}

fn assert_well_formed(output: &BufferOutput) {
    for polygon in &output.polygons {
        assert!(polygon.outer.is_closed());
        assert!(!polygon.outer.is_clockwise());
        for hole in &polygon.holes {
            assert!(hole.is_closed());
            assert!(hole.is_clockwise());
            let p = &hole.points[0];
            assert!(point_in_ring(&Point2::new(p.x, p.y), &polygon.outer.points).is_covered());
        }
    }
}

#[test]
fn pruning_is_idempotent() {
    let ring = Ring::from_xy(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let once = ring.pruned();
    assert_eq!(once.len(), 4);
    assert_eq!(once.pruned(), once);
}

#[test]
fn sharp_square_buffer() {
    init_tracing();
    let params = BufferParams::circular(2.0)
        .unwrap()
        .with_corner_style(CornerStyle::Sharp);
    let out = area_buffer(Polygon::from_outer(square(0.0, 0.0, 10.0)), params);
    assert_eq!(out.polygons.len(), 1);
    assert!(out.holes().is_empty());
    let outer = out.outer().unwrap();
    assert_eq!(outer.len(), 5);
    assert_abs_diff_eq!(outer.signed_area(), 196.0, epsilon = 1e-9);
    assert_well_formed(&out);
}

#[test]
fn round_square_buffer() {
    init_tracing();
    let out = area_buffer(
        Polygon::from_outer(square(0.0, 0.0, 10.0)),
        BufferParams::circular(2.0).unwrap(),
    );
    assert!(out.holes().is_empty());
    let outer = out.outer().unwrap();
    let exact = 100.0 + 80.0 + 4.0 * PI;
    let area = outer.signed_area();
    assert!(area < exact);
    assert!(area > exact - 0.2);

    // Arc points lie on the circle around each corner.
    for (cx, cy) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
        let on_arc = outer
            .points
            .iter()
            .filter(|p| {
                let off_axis = (p.x - cx).abs() > 1e-6 && (p.y - cy).abs() > 1e-6;
                let r = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();
                off_axis && (r - 2.0).abs() < 1e-9
            })
            .count();
        assert!(on_arc >= 3, "corner ({cx}, {cy}) has {on_arc} arc points");
    }
    assert_well_formed(&out);
}

#[test]
fn inward_beyond_half_width_is_empty() {
    init_tracing();
    let params = BufferParams::circular(-6.0).unwrap();
    let out = area_buffer(Polygon::from_outer(square(0.0, 0.0, 10.0)), params);
    assert!(out.is_empty());
    assert!(out.outer().is_none());
}

#[test]
fn circular_buffer_ignores_axis_angle() {
    let area = Polygon::from_outer(l_shape());
    let a = area_buffer(area.clone(), BufferParams::new(1.5, 1.5, 0.0).unwrap());
    let b = area_buffer(area, BufferParams::new(1.5, 1.5, 63.0).unwrap());
    let (ra, rb) = (a.outer().unwrap(), b.outer().unwrap());
    assert_eq!(ra.len(), rb.len());
    assert_abs_diff_eq!(ra.signed_area(), rb.signed_area(), epsilon = 1e-9);
    // Same points, possibly from a different start vertex.
    for p in &ra.points {
        assert!(rb
            .points
            .iter()
            .any(|q| (p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9));
    }
}

#[test]
fn elliptic_buffer_reaches_both_axes() {
    let params = BufferParams::new(3.0, 1.0, 0.0).unwrap();
    let out = area_buffer(Polygon::from_outer(square(0.0, 0.0, 10.0)), params);
    let outer = out.outer().unwrap();
    let xs = outer.points.iter().map(|p| p.x);
    let ys = outer.points.iter().map(|p| p.y);
    assert_abs_diff_eq!(xs.clone().fold(f64::MAX, f64::min), -3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(xs.fold(f64::MIN, f64::max), 13.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ys.clone().fold(f64::MAX, f64::min), -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ys.fold(f64::MIN, f64::max), 11.0, epsilon = 1e-9);
}

#[test]
fn l_shape_buffer_is_simple() {
    init_tracing();
    for params in [
        BufferParams::circular(3.0).unwrap(),
        BufferParams::circular(3.0)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp),
        BufferParams::new(3.0, 1.0, 30.0).unwrap(),
    ] {
        let out = area_buffer(Polygon::from_outer(l_shape()), params);
        assert_simple(out.outer().unwrap());
        assert_well_formed(&out);
    }
}

#[test]
fn annulus_hole_is_swallowed_when_growing() {
    init_tracing();
    let annulus = Polygon::new(square(0.0, 0.0, 20.0), vec![square(8.0, 8.0, 4.0)]);
    let out = area_buffer(annulus, BufferParams::circular(3.0).unwrap());
    assert_eq!(out.polygons.len(), 1);
    assert!(out.holes().is_empty());
    assert!(out.report.discarded >= 1);
}

#[test]
fn annulus_keeps_a_smaller_hole_when_growing() {
    let annulus = Polygon::new(square(0.0, 0.0, 20.0), vec![square(5.0, 5.0, 10.0)]);
    let params = BufferParams::circular(1.0)
        .unwrap()
        .with_corner_style(CornerStyle::Sharp);
    let out = area_buffer(annulus, params);
    assert_eq!(out.holes().len(), 1);
    assert_abs_diff_eq!(out.holes()[0].signed_area(), -64.0, epsilon = 1e-9);
    assert_well_formed(&out);
}

#[test]
fn annulus_eroded_until_offsets_meet_is_empty() {
    init_tracing();
    let annulus = Polygon::new(square(0.0, 0.0, 20.0), vec![square(8.0, 8.0, 4.0)]);
    let out = area_buffer(annulus, BufferParams::circular(-5.0).unwrap());
    assert!(out.is_empty());
}

#[test]
fn annulus_eroded_a_little_stays_an_annulus() {
    let annulus = Polygon::new(square(0.0, 0.0, 20.0), vec![square(8.0, 8.0, 4.0)]);
    let out = area_buffer(annulus, BufferParams::circular(-1.0).unwrap());
    assert_eq!(out.polygons.len(), 1);
    assert_eq!(out.holes().len(), 1);
    assert_abs_diff_eq!(out.outer().unwrap().signed_area(), 324.0, epsilon = 1e-9);
    // The grown hole has rounded corners: between the sharp 36 and the bare 16 + 16 + π.
    let hole = out.holes()[0].signed_area().abs();
    assert!(hole < 36.0 && hole > 32.0 + PI - 0.1);
    assert_well_formed(&out);
}

#[test]
fn finer_tolerance_never_reduces_points() {
    let mut last = 0;
    for tol in [0.5, 0.1, 0.05, 0.01, 0.001] {
        let params = BufferParams::circular(2.0).unwrap().with_tolerance(tol).unwrap();
        let n = area_buffer(Polygon::from_outer(l_shape()), params)
            .outer()
            .unwrap()
            .len();
        assert!(n >= last, "tolerance {tol}: {n} < {last}");
        last = n;
    }
}

#[test]
fn self_crossing_line_encloses_a_hole() {
    init_tracing();
    let line = Ring::from_xy(&[(-2.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, -2.0)]);
    let out = LineBuffer2D::new(line, BufferParams::circular(1.0).unwrap())
        .execute()
        .unwrap();
    assert_eq!(out.holes().len(), 1);
    assert_abs_diff_eq!(out.holes()[0].signed_area(), -64.0, epsilon = 1e-9);
    assert!(out.outer().unwrap().signed_area() > 144.0);
    assert_well_formed(&out);
}

#[test]
fn parallel_line_and_buffer_agree_on_a_straight_line() {
    use geobuffer::operations::offset::ParallelLine2D;
    use geobuffer::planar::Side;

    let line = Ring::from_xy(&[(0.0, 0.0), (10.0, 0.0)]);
    let params = BufferParams::circular(1.0).unwrap();
    let left = ParallelLine2D::new(line.clone(), params, Side::Left)
        .execute()
        .unwrap();
    let out = LineBuffer2D::new(line, params).execute().unwrap();
    let outer = out.outer().unwrap();
    assert_eq!(left.len(), 2);
    for p in &left.points {
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-9);
        assert!(point_to_polyline_dist(p.x, p.y, &outer.points) < 1e-9);
    }
}
