use crate::math::Point3;

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a planar graph.
    pub struct VertexId;
}

/// An edge incident to a vertex, with the cached direction (radians in
/// `(-π, π]`) from the vertex towards the edge's far endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Incidence {
    pub edge: EdgeId,
    pub angle: f64,
}

/// A planar graph vertex: one group of coincident intersection points.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Location of the vertex; z is taken from the first grouped point.
    pub point: Point3,
    incidences: Vec<Incidence>,
}

impl VertexData {
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            incidences: Vec::new(),
        }
    }

    /// Incident edges sorted by increasing angle.
    #[must_use]
    pub fn incidences(&self) -> &[Incidence] {
        &self.incidences
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.incidences.len()
    }

    /// Cached angle of `edge` seen from this vertex.
    #[must_use]
    pub fn angle_of(&self, edge: EdgeId) -> Option<f64> {
        self.incidences
            .iter()
            .find(|inc| inc.edge == edge)
            .map(|inc| inc.angle)
    }

    pub(super) fn push_incidence(&mut self, incidence: Incidence) {
        self.incidences.push(incidence);
    }

    pub(super) fn sort_incidences(&mut self) {
        self.incidences.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    }
}
