use tracing::debug;

use super::{PlanarGraph, VertexId};
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::math::intersect_2d::segment_intersection_2d;
use crate::math::{Point2, Point3, GROUPING_SCALE};

/// A curve segment taking part in the arrangement.
struct Segment {
    start: Point3,
    end: Point3,
}

/// A point where the arrangement must be split, owned by one segment.
struct SplitPoint {
    point: Point2,
    z: f64,
    segment: usize,
    /// Distance from the owning segment's start.
    distance: f64,
}

impl SplitPoint {
    fn on(segments: &[Segment], segment: usize, point: Point2) -> Self {
        let seg = &segments[segment];
        let distance = (point - seg.start.xy()).norm();
        let len = (seg.end.xy() - seg.start.xy()).norm();
        let t = if len > 0.0 { distance / len } else { 0.0 };
        Self {
            point,
            z: seg.start.z + t * (seg.end.z - seg.start.z),
            segment,
            distance,
        }
    }
}

/// Builds the planar graph of a single, possibly self-intersecting ring.
///
/// # Errors
///
/// Returns `GeometryError::TooFewPoints` when the pruned ring has fewer than
/// 2 points, or `GeometryError::IsolatedVertex` when grouping leaves a vertex
/// without edges.
pub fn build(ring: &Ring) -> Result<PlanarGraph> {
    build_many(std::slice::from_ref(ring))
}

/// Builds one planar graph from the segments of several rings, splitting
/// every segment at its intersections with all others.
///
/// Each segment pair is tested once, so the cost is quadratic in the total
/// segment count.
///
/// # Errors
///
/// Same as [`build`]; any ring with fewer than 2 points fails the whole build.
pub fn build_many(rings: &[Ring]) -> Result<PlanarGraph> {
    if rings.is_empty() {
        return Err(GeometryError::Invalid("no rings to build a planar graph from".to_owned()).into());
    }

    // Step 1: Collect segments; open rings contribute their endpoints.
    let mut segments = Vec::new();
    let mut points = Vec::new();
    let mut min_len = f64::INFINITY;

    for ring in rings {
        let ring = ring.pruned();
        if ring.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                found: ring.len(),
                required: 2,
            }
            .into());
        }
        let first = segments.len();
        segments.extend(ring.segments().map(|(a, b)| Segment { start: *a, end: *b }));
        let last = segments.len() - 1;
        if let Some(len) = ring.min_segment_length() {
            min_len = min_len.min(len);
        }
        if !ring.is_closed() {
            points.push(SplitPoint::on(&segments, first, segments[first].start.xy()));
            points.push(SplitPoint::on(&segments, last, segments[last].end.xy()));
        }
    }

    // Step 2: Pairwise intersections.
    for i in 0..segments.len() {
        let a1 = segments[i].start.xy();
        let a2 = segments[i].end.xy();
        for j in (i + 1)..segments.len() {
            let b1 = segments[j].start.xy();
            let b2 = segments[j].end.xy();
            for p in segment_intersection_2d(&a1, &a2, &b1, &b2).points() {
                points.push(SplitPoint::on(&segments, i, p));
                points.push(SplitPoint::on(&segments, j, p));
            }
        }
    }

    // Step 3: Group coincident points into vertices.
    let tolerance = if min_len.is_finite() {
        min_len * GROUPING_SCALE
    } else {
        0.0
    };
    let mut graph = PlanarGraph::new();
    let vertex_of = group_points(&points, tolerance, &mut graph);

    // Step 4: Split each segment at its points, in order along the segment.
    let mut by_segment: Vec<Vec<usize>> = vec![Vec::new(); segments.len()];
    for (i, p) in points.iter().enumerate() {
        by_segment[p.segment].push(i);
    }
    for owned in &mut by_segment {
        owned.sort_by(|&a, &b| points[a].distance.total_cmp(&points[b].distance));
        for pair in owned.windows(2) {
            let (va, vb) = (vertex_of[pair[0]], vertex_of[pair[1]]);
            if va != vb {
                graph.add_edge(va, vb);
            }
        }
    }

    // Step 5: Freeze angular order.
    graph.sort_incidences();

    if let Some((vertex, _)) = graph.vertices().find(|(_, v)| v.degree() == 0) {
        return Err(GeometryError::IsolatedVertex { vertex }.into());
    }

    debug!(
        segments = segments.len(),
        split_points = points.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "planar graph built"
    );
    Ok(graph)
}

/// Sorts points by (x, y) and merges each one into the group of an earlier
/// point within `tolerance` on both axes. Returns the vertex of every point.
fn group_points(points: &[SplitPoint], tolerance: f64, graph: &mut PlanarGraph) -> Vec<VertexId> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (p, q) = (&points[a].point, &points[b].point);
        p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y))
    });

    let mut vertex_of: Vec<Option<VertexId>> = vec![None; points.len()];
    for (k, &i) in order.iter().enumerate() {
        let p = points[i].point;
        let mut found = None;
        for &j in order[..k].iter().rev() {
            let q = points[j].point;
            if (p.x - q.x).abs() > tolerance {
                break;
            }
            if (p.y - q.y).abs() <= tolerance {
                found = vertex_of[j];
                break;
            }
        }
        let vertex = found.unwrap_or_else(|| graph.add_vertex(Point3::new(p.x, p.y, points[i].z)));
        vertex_of[i] = Some(vertex);
    }

    // Every slot was assigned in the loop above.
    vertex_of.into_iter().flatten().collect()
}
