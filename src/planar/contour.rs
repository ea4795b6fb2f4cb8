use std::f64::consts::PI;

use slotmap::SecondaryMap;
use tracing::{trace, warn};

use super::{EdgeId, PlanarGraph, Side, VertexId};
use crate::error::{GeometryError, GraphError, Result};
use crate::geometry::Ring;

/// What to do when a contour walk runs into an (edge, side) it has already
/// visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InconsistencyPolicy {
    /// Fail with `GraphError::ConstructionInconsistency`.
    #[default]
    Reject,
    /// Stop the walk, keep the partial contour and record a [`Truncation`].
    Truncate,
}

/// Whether a contour bounds a component from outside or a bounded face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    /// Walked counter-clockwise with the unbounded side on its right.
    Outer,
    /// Walked clockwise around a bounded face.
    Inner,
}

/// A closed loop peeled off a planar graph. The face it bounds lies on the
/// right of its point order.
#[derive(Debug, Clone)]
pub struct Contour {
    pub ring: Ring,
    pub winding: i32,
    pub kind: ContourKind,
}

/// A walk that stopped early under [`InconsistencyPolicy::Truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub vertex: VertexId,
    pub edge: EdgeId,
    pub side: Side,
}

/// Winding recorded for each visited side of an edge.
#[derive(Debug, Clone, Copy, Default)]
struct SideState {
    left: Option<i32>,
    right: Option<i32>,
}

impl SideState {
    fn get(self, side: Side) -> Option<i32> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn set(&mut self, side: Side, winding: i32) {
        match side {
            Side::Left => self.left = Some(winding),
            Side::Right => self.right = Some(winding),
        }
    }
}

/// Decomposes a planar graph into closed contours by always taking the
/// tightest right turn.
///
/// Each (edge, side) is walked at most once; the winding number of a face is
/// derived from its neighbour across an edge (left = right + 1).
#[derive(Debug)]
pub struct ContourExtractor<'g> {
    graph: &'g PlanarGraph,
    state: SecondaryMap<EdgeId, SideState>,
    policy: InconsistencyPolicy,
    truncations: Vec<Truncation>,
}

impl<'g> ContourExtractor<'g> {
    #[must_use]
    pub fn new(graph: &'g PlanarGraph, policy: InconsistencyPolicy) -> Self {
        let mut state = SecondaryMap::with_capacity(graph.edge_count());
        for (id, _) in graph.edges() {
            state.insert(id, SideState::default());
        }
        Self {
            graph,
            state,
            policy,
            truncations: Vec::new(),
        }
    }

    /// Walks the outer contour from the leftmost (then lowest) vertex along
    /// its lowest-angle edge.
    ///
    /// Ties on x go to the lowest vertex rather than to the smallest edge
    /// angle; both pick a vertex on the unbounded face.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Invalid` for an empty graph, or a `GraphError`
    /// if the walk is inconsistent.
    pub fn extract_outer(&mut self) -> Result<Contour> {
        let start = self
            .graph
            .vertices()
            .min_by(|(_, a), (_, b)| {
                a.point
                    .x
                    .total_cmp(&b.point.x)
                    .then(a.point.y.total_cmp(&b.point.y))
            })
            .map(|(id, _)| id)
            .ok_or_else(|| GeometryError::Invalid("empty planar graph".to_owned()))?;
        let edge = self
            .graph
            .vertex(start)?
            .incidences()
            .first()
            .map(|inc| inc.edge)
            .ok_or(GeometryError::IsolatedVertex { vertex: start })?;
        self.outer_from(start, edge)
    }

    /// Walks the next inner contour: the unvisited side of the first edge
    /// that has exactly one side visited. Returns `None` when there is none.
    ///
    /// # Errors
    ///
    /// Returns a `GraphError` if the walk is inconsistent.
    pub fn extract_inner(&mut self) -> Result<Option<Contour>> {
        let next = self.graph.edges().find_map(|(id, _)| {
            let s = self.state.get(id).copied().unwrap_or_default();
            match (s.left, s.right) {
                (Some(w), None) => Some((id, Side::Right, w - 1)),
                (None, Some(w)) => Some((id, Side::Left, w + 1)),
                _ => None,
            }
        });
        let Some((edge, side, winding)) = next else {
            return Ok(None);
        };
        let ring = self.walk(edge, side, winding)?;
        Ok(Some(Contour {
            ring,
            winding,
            kind: ContourKind::Inner,
        }))
    }

    /// Walks every remaining inner contour.
    ///
    /// # Errors
    ///
    /// Returns a `GraphError` if a walk is inconsistent.
    pub fn extract_inner_all(&mut self) -> Result<Vec<Contour>> {
        let mut contours = Vec::new();
        while let Some(c) = self.extract_inner()? {
            contours.push(c);
        }
        Ok(contours)
    }

    /// Walks every face of a graph that may have several connected
    /// components. Each component contributes one `Outer` contour.
    ///
    /// Windings of components after the first are relative to their own
    /// outside and carry no nesting information.
    ///
    /// # Errors
    ///
    /// Same as [`Self::extract_outer`].
    pub fn extract_all(&mut self) -> Result<Vec<Contour>> {
        let mut contours = vec![self.extract_outer()?];
        loop {
            contours.extend(self.extract_inner_all()?);
            match self.unvisited_component_start() {
                Some((v, edge)) => contours.push(self.outer_from(v, edge)?),
                None => break,
            }
        }
        Ok(contours)
    }

    /// Walks recorded as truncated under [`InconsistencyPolicy::Truncate`].
    #[must_use]
    pub fn truncations(&self) -> &[Truncation] {
        &self.truncations
    }

    /// Returns `true` once both sides of every edge have been walked.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state
            .values()
            .all(|s| s.left.is_some() && s.right.is_some())
    }

    fn outer_from(&mut self, start: VertexId, edge: EdgeId) -> Result<Contour> {
        let side = self.graph.edge(edge)?.side_leaving(start);
        let ring = self.walk(edge, side, 0)?;
        Ok(Contour {
            ring,
            winding: 0,
            kind: ContourKind::Outer,
        })
    }

    /// Leftmost endpoint of an edge that has not been walked on either side,
    /// with its lowest-angle such edge.
    fn unvisited_component_start(&self) -> Option<(VertexId, EdgeId)> {
        let fresh = |id: EdgeId| {
            self.state
                .get(id)
                .is_some_and(|s| s.left.is_none() && s.right.is_none())
        };
        let start = self
            .graph
            .edges()
            .filter(|(id, _)| fresh(*id))
            .flat_map(|(_, e)| [e.v1, e.v2])
            .filter_map(|v| self.graph.vertex(v).ok().map(|data| (v, data.point)))
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
            .map(|(v, _)| v)?;
        let edge = self
            .graph
            .vertex(start)
            .ok()?
            .incidences()
            .iter()
            .map(|inc| inc.edge)
            .find(|&e| fresh(e))?;
        Some((start, edge))
    }

    fn is_visited(&self, edge: EdgeId, side: Side) -> bool {
        self.state
            .get(edge)
            .is_some_and(|s| s.get(side).is_some())
    }

    fn mark(&mut self, edge: EdgeId, side: Side, winding: i32) {
        if let Some(s) = self.state.get_mut(edge) {
            s.set(side, winding);
        }
    }

    /// Walks from `first` on `side` until the walk returns to that pair.
    fn walk(&mut self, first: EdgeId, side: Side, winding: i32) -> Result<Ring> {
        let graph = self.graph;
        let e = graph.edge(first)?;
        let (mut from, mut at) = match side {
            Side::Right => (e.v1, e.v2),
            Side::Left => (e.v2, e.v1),
        };
        let mut edge = first;
        let mut edge_side = side;
        let mut arrival = graph.angle_at(from, edge)?;
        let limit = 2 * graph.edge_count() + 2;
        let mut points = Vec::new();
        let mut steps = 0usize;

        loop {
            points.push(graph.vertex(from)?.point);
            self.mark(edge, edge_side, winding);

            // Tightest right turn relative to the arrival direction.
            let turn = graph
                .vertex(at)?
                .incidences()
                .iter()
                .filter(|inc| inc.edge != edge)
                .map(|inc| (inc.edge, wrap_angle(inc.angle - arrival)))
                .min_by(|a, b| a.1.total_cmp(&b.1));

            let (next_edge, next_side) = match turn {
                Some((id, _)) => (id, graph.edge(id)?.side_leaving(at)),
                // Dead end: come back along the other side.
                None => (edge, edge_side.opposite()),
            };

            if next_edge == first && next_side == side {
                break;
            }
            if self.is_visited(next_edge, next_side) {
                match self.policy {
                    InconsistencyPolicy::Reject => {
                        return Err(GraphError::ConstructionInconsistency {
                            vertex: at,
                            edge: next_edge,
                            side: next_side,
                        }
                        .into());
                    }
                    InconsistencyPolicy::Truncate => {
                        warn!(?at, ?next_edge, ?next_side, "contour walk truncated");
                        self.truncations.push(Truncation {
                            vertex: at,
                            edge: next_edge,
                            side: next_side,
                        });
                        break;
                    }
                }
            }

            steps += 1;
            if steps > limit {
                return Err(GraphError::WalkLimitExceeded { limit }.into());
            }

            arrival = graph.angle_at(at, next_edge)?;
            from = at;
            at = graph.edge(next_edge)?.other(at);
            edge = next_edge;
            edge_side = next_side;
        }

        points.push(graph.vertex(at)?.point);
        let mut ring = Ring::new(points);
        ring.prune();
        trace!(points = ring.len(), winding, "contour extracted");
        Ok(ring)
    }
}

/// Wraps an angle difference into `(-π, π]`.
fn wrap_angle(mut a: f64) -> f64 {
    while a <= -PI {
        a += 2.0 * PI;
    }
    while a > PI {
        a -= 2.0 * PI;
    }
    a
}
