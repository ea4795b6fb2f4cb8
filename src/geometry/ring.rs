use crate::math::polygon_2d::{is_clockwise, signed_area_2d};
use crate::math::Point3;

/// An ordered point sequence: a polyline, or a closed boundary when the last
/// point repeats the first.
///
/// Buffering works in XY. The z coordinate of every point is carried
/// through to derived points and never used in decisions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    pub points: Vec<Point3>,
}

impl Ring {
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Creates an open ring from XY coordinates (z = 0).
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect(),
        }
    }

    /// Creates a closed ring from XY coordinates, repeating the first point
    /// at the end when the input does not already do so.
    #[must_use]
    pub fn closed_from_xy(coords: &[(f64, f64)]) -> Self {
        let mut ring = Self::from_xy(coords);
        ring.close();
        ring
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` when the ring has at least two points and the last one
    /// repeats the first in XY.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() > 1 => a.x == b.x && a.y == b.y,
            _ => false,
        }
    }

    /// Appends the first point when the ring is not closed yet.
    pub fn close(&mut self) {
        if !self.is_closed() {
            if let Some(&first) = self.points.first() {
                self.points.push(first);
            }
        }
    }

    /// Removes consecutive points that coincide in XY.
    #[allow(clippy::float_cmp)]
    pub fn prune(&mut self) {
        self.points.dedup_by(|b, a| a.x == b.x && a.y == b.y);
    }

    /// Returns a pruned copy.
    #[must_use]
    pub fn pruned(&self) -> Self {
        let mut ring = self.clone();
        ring.prune();
        ring
    }

    /// Number of distinct vertices after pruning, not counting the closing
    /// repeat.
    #[must_use]
    pub fn distinct_point_count(&self) -> usize {
        let pruned = self.pruned();
        if pruned.is_closed() {
            pruned.len() - 1
        } else {
            pruned.len()
        }
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Iterates over consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3, &Point3)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Length of the shortest segment longer than zero.
    #[must_use]
    pub fn min_segment_length(&self) -> Option<f64> {
        self.segments()
            .map(|(a, b)| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt())
            .filter(|len| *len > 0.0)
            .min_by(f64::total_cmp)
    }

    /// Returns the ring traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Signed XY area, positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        is_clockwise(&self.points)
    }

    /// Returns the ring oriented counter-clockwise (`ccw = true`) or clockwise.
    #[must_use]
    pub fn oriented(self, ccw: bool) -> Self {
        if self.is_clockwise() == ccw {
            self.reversed()
        } else {
            self
        }
    }
}

impl From<Vec<Point3>> for Ring {
    fn from(points: Vec<Point3>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn closed_from_xy_repeats_first_point() {
        let ring = Ring::closed_from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(ring.len(), 4);
        assert!(ring.is_closed());
        assert_eq!(ring.distinct_point_count(), 3);

        let again = Ring::closed_from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(again.len(), 3);
    }

    #[test]
    fn single_point_is_not_closed() {
        assert!(!Ring::from_xy(&[(1.0, 1.0)]).is_closed());
        assert!(!Ring::default().is_closed());
    }

    #[test]
    fn prune_removes_consecutive_duplicates_only() {
        let mut ring = Ring::from_xy(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        ring.prune();
        assert_eq!(ring, Ring::from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]));
    }

    #[test]
    fn prune_ignores_z() {
        let mut ring = Ring::new(vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 2.0)]);
        ring.prune();
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn prune_is_idempotent() {
        let ring = Ring::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 0.0), (2.0, 3.0), (0.0, 0.0)]);
        let once = ring.pruned();
        let twice = once.pruned();
        assert_eq!(once, twice);

        let clean = Ring::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 3.0)]);
        assert_eq!(clean.pruned(), clean);
    }

    #[test]
    fn min_segment_length_skips_zero_segments() {
        let ring = Ring::from_xy(&[(0.0, 0.0), (0.0, 0.0), (3.0, 0.0), (3.0, 0.5)]);
        assert!((ring.min_segment_length().unwrap() - 0.5).abs() < TOLERANCE);
        assert!(Ring::from_xy(&[(1.0, 1.0)]).min_segment_length().is_none());
    }

    #[test]
    fn orientation_helpers() {
        let ccw = Ring::closed_from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert!(!ccw.is_clockwise());
        assert!((ccw.signed_area() - 4.0).abs() < TOLERANCE);
        let cw = ccw.clone().oriented(false);
        assert!(cw.is_clockwise());
        assert_eq!(cw.oriented(true), ccw);
    }
}
