use super::ring::Ring;

/// An area: one outer boundary and zero or more holes.
///
/// Buffering results are oriented with the outer ring counter-clockwise and
/// holes clockwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    /// Creates a polygon without holes.
    #[must_use]
    pub fn from_outer(outer: Ring) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Enclosed XY area: outer area minus hole areas, orientation ignored.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        self.outer.signed_area().abs() - holes
    }
}
