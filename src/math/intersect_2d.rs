use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let w = p2 - p1;
    let t = cross(&w, d2) / denom;
    let u = cross(&w, d1) / denom;
    Some((t, u))
}

/// How two collinear segments overlap.
///
/// Head and tail refer to the endpoints of segment A after its endpoints
/// are put in increasing (x, y) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// B lies strictly inside A.
    BInsideA,
    /// A lies strictly inside B.
    AInsideB,
    /// B covers A's head; the overlap runs from B's start to A's head.
    PartialAtHead,
    /// B covers A's tail; the overlap runs from B's end to A's tail.
    PartialAtTail,
}

/// Outcome of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// A single crossing or touching point away from shared endpoints.
    Point(Point2),
    /// The segments share an endpoint.
    SharedEndpoint(Point2),
    /// Collinear segments overlapping between `first` and `second`.
    Overlap {
        first: Point2,
        second: Point2,
        kind: OverlapKind,
    },
    /// Both segments have the same endpoints.
    Identical { first: Point2, second: Point2 },
}

impl SegmentIntersection {
    /// Returns the zero, one or two points this outcome reports.
    pub fn points(&self) -> impl Iterator<Item = Point2> {
        let pair = match *self {
            Self::None => [None, None],
            Self::Point(p) | Self::SharedEndpoint(p) => [Some(p), None],
            Self::Overlap { first, second, .. } | Self::Identical { first, second } => {
                [Some(first), Some(second)]
            }
        };
        pair.into_iter().flatten()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Exact intersection of segments `a1-a2` and `b1-b2`.
///
/// Shared endpoints are detected by exact coordinate comparison before any
/// arithmetic. Endpoints are put in increasing (x, y) order first, so the
/// result does not depend on the direction either segment is given in.
/// Zero-length segments must be filtered by the caller.
#[must_use]
#[allow(clippy::float_cmp, clippy::many_single_char_names)]
pub fn segment_intersection_2d(
    a1: &Point2,
    a2: &Point2,
    b1: &Point2,
    b2: &Point2,
) -> SegmentIntersection {
    if (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1) {
        let (first, second) = ordered(a1, a2);
        return SegmentIntersection::Identical { first, second };
    }
    if a1 == b1 || a1 == b2 {
        return SegmentIntersection::SharedEndpoint(*a1);
    }
    if a2 == b1 || a2 == b2 {
        return SegmentIntersection::SharedEndpoint(*a2);
    }

    if boxes_disjoint(a1, a2, b1, b2, 0.0) {
        return SegmentIntersection::None;
    }

    let (a1, a2) = ordered(a1, a2);
    let (b1, b2) = ordered(b1, b2);
    let r = a2 - a1;
    let s = b2 - b1;
    let w = b1 - a1;

    let d = cross(&r, &s);
    let da = cross(&w, &s);
    let db = cross(&w, &r);

    if d != 0.0 {
        let inside = if d > 0.0 {
            (0.0..=d).contains(&da) && (0.0..=d).contains(&db)
        } else {
            (d..=0.0).contains(&da) && (d..=0.0).contains(&db)
        };
        if !inside {
            return SegmentIntersection::None;
        }
        return SegmentIntersection::Point(a1 + r * (da / d));
    }

    if da != 0.0 || db != 0.0 {
        // Parallel, not collinear.
        return SegmentIntersection::None;
    }

    let vertical = a1.x == a2.x;
    let key = |p: &Point2| if vertical { p.y } else { p.x };
    let (ka1, ka2, kb1, kb2) = (key(&a1), key(&a2), key(&b1), key(&b2));

    if kb2 < ka1 || kb1 > ka2 {
        return SegmentIntersection::None;
    }
    collinear_overlap(
        [a1, a2, b1, b2],
        [ka1, ka2, kb1, kb2],
        |x, y| x < y,
    )
}

/// Tolerance-aware variant of [`segment_intersection_2d`].
///
/// Coordinates closer than `tol` compare equal, near-parallel segments whose
/// deviation over their length stays below `tol` are treated as parallel, and
/// crossing ratios within `tol` of a segment end are clamped onto it.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn segment_intersection_2d_tol(
    a1: &Point2,
    a2: &Point2,
    b1: &Point2,
    b2: &Point2,
    tol: f64,
) -> SegmentIntersection {
    let near = |p: &Point2, q: &Point2| (p.x - q.x).abs() < tol && (p.y - q.y).abs() < tol;

    if (near(a1, b1) && near(a2, b2)) || (near(a1, b2) && near(a2, b1)) {
        let (first, second) = ordered(a1, a2);
        return SegmentIntersection::Identical { first, second };
    }
    if near(a1, b1) || near(a1, b2) {
        return SegmentIntersection::SharedEndpoint(*a1);
    }
    if near(a2, b1) || near(a2, b2) {
        return SegmentIntersection::SharedEndpoint(*a2);
    }

    if boxes_disjoint(a1, a2, b1, b2, tol) {
        return SegmentIntersection::None;
    }

    let (a1, a2) = ordered(a1, a2);
    let (b1, b2) = ordered(b1, b2);
    let r = a2 - a1;
    let s = b2 - b1;
    let w = b1 - a1;
    let len_a = r.norm();
    let len_b = s.norm();
    if len_a < tol || len_b < tol {
        return SegmentIntersection::None;
    }

    let d = cross(&r, &s);
    if (d / len_b).abs() >= tol {
        let t = cross(&w, &s) / d;
        let u = cross(&w, &r) / d;
        let tol_a = tol / len_a;
        let tol_b = tol / len_b;
        if t < -tol_a || t > 1.0 + tol_a || u < -tol_b || u > 1.0 + tol_b {
            return SegmentIntersection::None;
        }
        return SegmentIntersection::Point(a1 + r * t.clamp(0.0, 1.0));
    }

    if (cross(&w, &s) / len_b).abs() >= tol {
        return SegmentIntersection::None;
    }

    let vertical = r.x.abs() < r.y.abs();
    let key = |p: &Point2| if vertical { p.y } else { p.x };
    let (ka1, ka2, kb1, kb2) = (key(&a1), key(&a2), key(&b1), key(&b2));

    if kb2 < ka1 - tol || kb1 > ka2 + tol {
        return SegmentIntersection::None;
    }
    match collinear_overlap([a1, a2, b1, b2], [ka1, ka2, kb1, kb2], |x, y| {
        x < y - tol
    }) {
        SegmentIntersection::None => {}
        found => return found,
    }

    // One end coincides within tolerance: the shorter interval lies inside
    // the longer one.
    if kb2 - kb1 <= ka2 - ka1 {
        SegmentIntersection::Overlap {
            first: b1,
            second: b2,
            kind: OverlapKind::BInsideA,
        }
    } else {
        SegmentIntersection::Overlap {
            first: a1,
            second: a2,
            kind: OverlapKind::AInsideB,
        }
    }
}

/// Resolves the overlap of two collinear, ordered segments from their keys on
/// the dominant axis. `lt` is the strict comparison to use.
fn collinear_overlap(
    [a1, a2, b1, b2]: [Point2; 4],
    [ka1, ka2, kb1, kb2]: [f64; 4],
    lt: impl Fn(f64, f64) -> bool,
) -> SegmentIntersection {
    let overlap = |first, second, kind| SegmentIntersection::Overlap {
        first,
        second,
        kind,
    };

    if lt(ka1, kb1) && lt(kb2, ka2) {
        return overlap(b1, b2, OverlapKind::BInsideA);
    }
    if lt(kb1, ka1) && lt(ka2, kb2) {
        return overlap(a1, a2, OverlapKind::AInsideB);
    }
    if lt(ka1, kb1) && lt(kb1, ka2) {
        return overlap(b1, a2, OverlapKind::PartialAtHead);
    }
    if lt(ka1, kb2) && lt(kb2, ka2) {
        return overlap(b2, a1, OverlapKind::PartialAtTail);
    }
    tracing::trace!(?a1, ?a2, ?b1, ?b2, "collinear segments touch without overlap");
    SegmentIntersection::None
}

/// Orders two points by x, then y.
#[allow(clippy::float_cmp)]
fn ordered(p: &Point2, q: &Point2) -> (Point2, Point2) {
    if p.x < q.x || (p.x == q.x && p.y <= q.y) {
        (*p, *q)
    } else {
        (*q, *p)
    }
}

fn boxes_disjoint(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2, tol: f64) -> bool {
    a1.x.max(a2.x) + tol < b1.x.min(b2.x)
        || b1.x.max(b2.x) + tol < a1.x.min(a2.x)
        || a1.y.max(a2.y) + tol < b1.y.min(b2.y)
        || b1.y.max(b2.y) + tol < a1.y.min(a2.y)
}

fn cross(u: &Vector2, v: &Vector2) -> f64 {
    u.x * v.y - u.y * v.x
}
