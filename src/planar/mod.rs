pub mod build;
pub mod contour;
pub mod edge;
pub mod vertex;

pub use build::{build, build_many};
pub use contour::{Contour, ContourExtractor, ContourKind, InconsistencyPolicy, Truncation};
pub use edge::{EdgeData, EdgeId, Side};
pub use vertex::{Incidence, VertexData, VertexId};

use crate::error::GraphError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Planar graph of a self-intersecting curve.
///
/// Vertices are the curve's self-intersections (and its vertices), edges the
/// pieces of curve between them. The graph is an arena: entities reference
/// each other through typed keys. Geometry, adjacency and cached angles are
/// fixed once [`build`] returns; traversal state lives in the
/// [`ContourExtractor`].
#[derive(Debug, Default)]
pub struct PlanarGraph {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
}

impl PlanarGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Inserts an edge from `v1` to `v2` unless it would be a loop or the
    /// pair is already connected. Returns the new edge's ID.
    pub(crate) fn add_edge(&mut self, v1: VertexId, v2: VertexId) -> Option<EdgeId> {
        if v1 == v2 || self.find_edge(v1, v2).is_some() {
            return None;
        }
        let (p1, p2) = match (self.vertices.get(v1), self.vertices.get(v2)) {
            (Some(a), Some(b)) => (a.point, b.point),
            _ => return None,
        };
        let id = self.edges.insert(EdgeData { v1, v2 });
        let forward = direction(&p1, &p2);
        let backward = direction(&p2, &p1);
        if let Some(v) = self.vertices.get_mut(v1) {
            v.push_incidence(Incidence {
                edge: id,
                angle: forward,
            });
        }
        if let Some(v) = self.vertices.get_mut(v2) {
            v.push_incidence(Incidence {
                edge: id,
                angle: backward,
            });
        }
        Some(id)
    }

    /// Sorts every vertex's incidences by angle. Called once by the builder.
    pub(crate) fn sort_incidences(&mut self) {
        for (_, v) in &mut self.vertices {
            v.sort_incidences();
        }
    }

    /// Returns the edge joining `a` and `b` in either direction.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let vertex = self.vertices.get(a)?;
        vertex
            .incidences()
            .iter()
            .map(|inc| inc.edge)
            .find(|&e| self.edges.get(e).is_some_and(|data| data.connects(a, b)))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not in the graph.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, GraphError> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("vertex".into()))
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not in the graph.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, GraphError> {
        self.edges
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("edge".into()))
    }

    /// Cached direction of `edge` leaving `vertex`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or `edge` is not incident to it.
    pub fn angle_at(&self, vertex: VertexId, edge: EdgeId) -> Result<f64, GraphError> {
        self.vertex(vertex)?
            .angle_of(edge)
            .ok_or_else(|| GraphError::EntityNotFound("incidence".into()))
    }

    /// Iterates over vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Direction from `from` to `to` in `(-π, π]`.
fn direction(from: &Point3, to: &Point3) -> f64 {
    let a = (to.y - from.y).atan2(to.x - from.x);
    if a <= -std::f64::consts::PI {
        a + 2.0 * std::f64::consts::PI
    } else {
        a
    }
}
