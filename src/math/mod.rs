pub mod distance_2d;
pub mod ellipse_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. Buffering works in XY; z is carried through.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Scale applied to the shortest non-zero segment length to obtain the
/// distance below which intersection points are treated as one vertex.
pub const GROUPING_SCALE: f64 = 1e-6;
