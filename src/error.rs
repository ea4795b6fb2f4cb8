use thiserror::Error;

use crate::planar::{EdgeId, Side, VertexId};

/// Top-level error type for buffering operations.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Broad category of a [`BufferError`], used by callers that skip failing features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Degenerate or too-short input, or a graph vertex left without edges.
    InvalidGeometry,
    /// The contour walk hit an (edge, side) it had already visited.
    ConstructionInconsistency,
    /// No definitive interior sample point could be found for a contour.
    PointInPolygonFailure,
    /// Buffer parameters were rejected.
    InvalidParameters,
}

/// Errors related to input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid geometry: {0}")]
    Invalid(String),

    #[error("ring has {found} distinct points, at least {required} required")]
    TooFewPoints { found: usize, required: usize },

    #[error("planar graph vertex {vertex:?} has no incident edges")]
    IsolatedVertex { vertex: VertexId },

    #[error("no interior point found for contour with {points} points")]
    NoInteriorPoint { points: usize },
}

/// Errors raised while walking the planar graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("contour walk returned to visited {side:?} side of edge {edge:?} at vertex {vertex:?}")]
    ConstructionInconsistency {
        vertex: VertexId,
        edge: EdgeId,
        side: Side,
    },

    #[error("contour walk exceeded {limit} steps")]
    WalkLimitExceeded { limit: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to buffer parameters.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("invalid buffer parameters: {0}")]
    Invalid(String),
}

impl BufferError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry(GeometryError::NoInteriorPoint { .. }) => ErrorKind::PointInPolygonFailure,
            Self::Geometry(_) => ErrorKind::InvalidGeometry,
            Self::Graph(_) => ErrorKind::ConstructionInconsistency,
            Self::Parameter(_) => ErrorKind::InvalidParameters,
        }
    }

    /// Returns `true` when the input geometry itself was rejected.
    #[must_use]
    pub fn is_invalid_geometry(&self) -> bool {
        self.kind() == ErrorKind::InvalidGeometry
    }
}

/// Convenience type alias for results using [`BufferError`].
pub type Result<T> = std::result::Result<T, BufferError>;
