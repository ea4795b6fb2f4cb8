use super::{Point2, Point3, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A repeated closing
/// point contributes nothing, so open and closed rings give the same result.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` when the ring runs clockwise.
#[must_use]
pub fn is_clockwise(points: &[Point3]) -> bool {
    signed_area_2d(points) < 0.0
}

/// Where a point lies relative to a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Inside,
    Boundary,
}

impl PointLocation {
    /// `Inside` or `Boundary`.
    #[must_use]
    pub fn is_covered(self) -> bool {
        self != Self::Outside
    }
}

/// Locates `p` against a closed ring with a ray cast towards +x.
///
/// Points on an edge or vertex are reported as [`PointLocation::Boundary`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn point_in_ring(p: &Point2, ring: &[Point3]) -> PointLocation {
    let n = ring.len();
    if n < 2 {
        return PointLocation::Outside;
    }
    let mut crossings = 0usize;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];

        if on_segment(p, a, b) {
            return PointLocation::Boundary;
        }
        // Half-open rule on y avoids counting a vertex twice.
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x > p.x {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

#[allow(clippy::float_cmp)]
fn on_segment(p: &Point2, a: &Point3, b: &Point3) -> bool {
    if p.x == a.x && p.y == a.y {
        return true;
    }
    if p.x < a.x.min(b.x) || p.x > a.x.max(b.x) || p.y < a.y.min(b.y) || p.y > a.y.max(b.y) {
        return false;
    }
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross == 0.0
}

/// Area centroid of a ring, or `None` when the ring encloses no area.
#[must_use]
pub fn centroid_2d(points: &[Point3]) -> Option<Point2> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let f = a.x * b.y - b.x * a.y;
        area2 += f;
        cx += (a.x + b.x) * f;
        cy += (a.y + b.y) * f;
    }
    if area2.abs() < TOLERANCE {
        return None;
    }
    Some(Point2::new(cx / (3.0 * area2), cy / (3.0 * area2)))
}

/// Finds a point strictly inside the ring.
///
/// Tries the area centroid first; otherwise scans the horizontal line through
/// the centroid and takes the middle of its widest inside interval. Returns
/// `None` when no definitive interior point exists (degenerate rings).
#[must_use]
pub fn interior_point(points: &[Point3]) -> Option<Point2> {
    let c = centroid_2d(points)?;
    if point_in_ring(&c, points) == PointLocation::Inside {
        return Some(c);
    }

    let xs = horizontal_crossings(points, c.y);
    let best = xs
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(x0, x1)| x1 - x0 > TOLERANCE)
        .max_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)))?;

    let candidate = Point2::new((best.0 + best.1) * 0.5, c.y);
    (point_in_ring(&candidate, points) == PointLocation::Inside).then_some(candidate)
}

/// Sorted x coordinates where the ring crosses the line `y = y0`.
fn horizontal_crossings(points: &[Point3], y0: f64) -> Vec<f64> {
    let n = points.len();
    let mut xs = Vec::new();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        if (a.y > y0) != (b.y > y0) {
            xs.push(a.x + (y0 - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
    xs.sort_by(f64::total_cmp);
    xs
}
