use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a planar graph.
    pub struct EdgeId;
}

/// Side of a directed edge or of a direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `+1.0` for right, `-1.0` for left.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// An undirected planar graph edge.
///
/// `v1` and `v2` keep the direction in which the source curve first ran
/// along the edge; the right side is the right of `v1 -> v2`.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub v1: VertexId,
    pub v2: VertexId,
}

impl EdgeData {
    /// Returns the endpoint opposite to `v`.
    #[must_use]
    pub fn other(&self, v: VertexId) -> VertexId {
        if self.v1 == v {
            self.v2
        } else {
            self.v1
        }
    }

    /// Side of the edge that lies on the right when walking away from `v`.
    #[must_use]
    pub fn side_leaving(&self, v: VertexId) -> Side {
        if self.v1 == v {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Returns `true` when the edge joins `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.v1 == a && self.v2 == b) || (self.v1 == b && self.v2 == a)
    }
}
