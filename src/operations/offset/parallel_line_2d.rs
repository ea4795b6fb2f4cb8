use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::operations::buffer::{parallel_line, BufferParams};
use crate::planar::Side;

/// Offsets a polyline to one side under the distance ellipse.
///
/// Unlike a buffer this keeps self-intersection loops: the result is the
/// raw parallel line. Concave and sharp corners join at the offset-line
/// intersection, round convex corners follow the ellipse.
///
/// An open line gives an open line; a closed one stays closed.
#[derive(Debug)]
pub struct ParallelLine2D {
    line: Ring,
    params: BufferParams,
    side: Side,
}

impl ParallelLine2D {
    #[must_use]
    pub fn new(line: Ring, params: BufferParams, side: Side) -> Self {
        Self { line, params, side }
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if the line has fewer than 2
    /// distinct points.
    pub fn execute(&self) -> Result<Ring> {
        let found = self.line.distinct_point_count();
        if found < 2 {
            return Err(GeometryError::TooFewPoints { found, required: 2 }.into());
        }
        Ok(parallel_line(&self.line, &self.params, self.side))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::buffer::CornerStyle;
    use approx::assert_abs_diff_eq;

    fn sharp(d: f64) -> BufferParams {
        BufferParams::circular(d)
            .unwrap()
            .with_corner_style(CornerStyle::Sharp)
    }

    #[test]
    fn closed_square_offsets_stay_closed() {
        let square = Ring::closed_from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let out = ParallelLine2D::new(square.clone(), sharp(1.0), Side::Right)
            .execute()
            .unwrap();
        assert!(out.is_closed());
        assert_abs_diff_eq!(out.signed_area(), 36.0, epsilon = 1e-9);

        let inside = ParallelLine2D::new(square, sharp(1.0), Side::Left)
            .execute()
            .unwrap();
        assert_abs_diff_eq!(inside.signed_area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn loops_are_kept() {
        // A tight zig-zag: the left offset of the middle leg folds over.
        let zigzag = Ring::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        let out = ParallelLine2D::new(zigzag, sharp(2.0), Side::Left)
            .execute()
            .unwrap();
        assert_eq!(out.len(), 4);
        // The offset of the last leg runs below the offset of the first.
        assert_abs_diff_eq!(out.points[0].y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.points[3].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn too_short_line_is_rejected() {
        let dot = Ring::from_xy(&[(1.0, 1.0), (1.0, 1.0)]);
        let err = ParallelLine2D::new(dot, BufferParams::default(), Side::Left)
            .execute()
            .unwrap_err();
        assert!(err.is_invalid_geometry());
    }
}
