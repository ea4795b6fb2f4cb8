mod buffer_lines;
mod convolution;
mod erode;
mod filter;
mod params;
mod report;

pub use buffer_lines::buffer_lines;
pub use convolution::{convolution_ring, parallel_line};
pub use erode::erode;
pub use filter::point_in_buffer;
pub use params::{BufferParams, CapStyle, CornerStyle};
pub use report::{BufferReport, Diagnostic};

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{Polygon, Ring};
use crate::math::Point3;
use crate::planar::{build, ContourExtractor};

/// Result of a buffer operation.
///
/// Every buffer follows the same pipeline: offset each boundary ring into a
/// convolution curve under the elliptical distance metric, arrange the curve
/// in a planar graph, walk its contours and keep the ones the filters accept.
#[derive(Debug, Clone, Default)]
pub struct BufferOutput {
    /// Outer rings counter-clockwise, holes clockwise. Outward buffers give
    /// exactly one polygon; inward ones any number.
    pub polygons: Vec<Polygon>,
    pub report: BufferReport,
}

impl BufferOutput {
    fn single(polygon: Polygon, report: BufferReport) -> Self {
        Self {
            polygons: vec![polygon],
            report,
        }
    }

    /// Outer ring of the first polygon.
    #[must_use]
    pub fn outer(&self) -> Option<&Ring> {
        self.polygons.first().map(|p| &p.outer)
    }

    /// Holes of the first polygon.
    #[must_use]
    pub fn holes(&self) -> &[Ring] {
        self.polygons.first().map_or(&[], |p| p.holes.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Buffers an area (outer ring plus holes).
///
/// A positive distance grows the area, a negative one shrinks it.
#[derive(Debug)]
pub struct AreaBuffer2D {
    area: Polygon,
    params: BufferParams,
}

impl AreaBuffer2D {
    #[must_use]
    pub fn new(area: Polygon, params: BufferParams) -> Self {
        Self { area, params }
    }

    /// Executes the buffer.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if the outer ring has fewer than
    /// 3 distinct points, or a `GraphError` if the contour walk is
    /// inconsistent. Invalid holes are skipped and reported instead.
    pub fn execute(&self) -> Result<BufferOutput> {
        let mut outer = self.area.outer.pruned();
        outer.close();
        let found = outer.distinct_point_count();
        if found < 3 {
            return Err(GeometryError::TooFewPoints { found, required: 3 }.into());
        }

        let mut report = BufferReport::default();
        if self.params.is_zero() {
            let holes = self
                .area
                .holes
                .iter()
                .map(|h| {
                    let mut h = h.pruned();
                    h.close();
                    h.oriented(false)
                })
                .collect();
            return Ok(BufferOutput::single(
                Polygon::new(outer.oriented(true), holes),
                report,
            ));
        }

        let output = if self.params.is_negative() {
            let polygons = erode(&outer, &self.area.holes, &self.params, &mut report)?;
            BufferOutput { polygons, report }
        } else {
            let (outline, holes) = buffer_lines(&outer, &self.area.holes, &self.params, &mut report)?;
            BufferOutput::single(Polygon::new(outline, holes), report)
        };
        debug!(
            polygons = output.polygons.len(),
            diagnostics = output.report.diagnostics.len(),
            "area buffer done"
        );
        Ok(output)
    }
}

/// Buffers a polyline. The sign of the distance is ignored.
#[derive(Debug)]
pub struct LineBuffer2D {
    line: Ring,
    params: BufferParams,
}

impl LineBuffer2D {
    #[must_use]
    pub fn new(line: Ring, params: BufferParams) -> Self {
        Self { line, params }
    }

    /// Executes the buffer.
    ///
    /// The line's own planar graph gives the outer contour to grow and the
    /// loops it closes, which are buffered as holes.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for an empty line, or a
    /// `GraphError` if a contour walk is inconsistent.
    pub fn execute(&self) -> Result<BufferOutput> {
        let line = self.line.pruned();
        match line.distinct_point_count() {
            0 => {
                return Err(GeometryError::TooFewPoints {
                    found: 0,
                    required: 1,
                }
                .into())
            }
            1 => return PointBuffer2D::new(line.points[0], self.params).execute(),
            _ => {}
        }
        if self.params.is_zero() {
            return Ok(BufferOutput::single(
                Polygon::from_outer(line),
                BufferReport::default(),
            ));
        }

        let graph = build(&line)?;
        let mut extractor = ContourExtractor::new(&graph, self.params.inconsistency_policy());
        let outer = extractor.extract_outer()?.ring;
        let isles: Vec<Ring> = extractor
            .extract_inner_all()?
            .into_iter()
            .map(|c| c.ring)
            .collect();

        let mut report = BufferReport::default();
        report
            .diagnostics
            .extend(extractor.truncations().iter().copied().map(Diagnostic::from));
        let (outline, holes) = buffer_lines(&outer, &isles, &self.params, &mut report)?;
        debug!(
            isles = isles.len(),
            holes = holes.len(),
            "line buffer done"
        );
        Ok(BufferOutput::single(Polygon::new(outline, holes), report))
    }
}

/// Buffers a single point: the distance ellipse around it.
#[derive(Debug)]
pub struct PointBuffer2D {
    center: Point3,
    params: BufferParams,
}

impl PointBuffer2D {
    #[must_use]
    pub fn new(center: Point3, params: BufferParams) -> Self {
        Self { center, params }
    }

    /// Executes the buffer. Zero distance gives the point itself.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` keeps the signature in line with the
    /// other buffers.
    #[allow(clippy::cast_precision_loss, clippy::unnecessary_wraps)]
    pub fn execute(&self) -> Result<BufferOutput> {
        if self.params.is_zero() {
            return Ok(BufferOutput::single(
                Polygon::from_outer(Ring::new(vec![self.center])),
                BufferReport::default(),
            ));
        }
        let metric = self.params.metric();
        let n = metric.full_turn_segments(self.params.tolerance());
        let step = 2.0 * PI / n as f64;
        let c = self.center;
        let mut ring: Ring = (0..n)
            .map(|j| {
                let v = metric.point_at(j as f64 * step);
                Point3::new(c.x + v.x, c.y + v.y, c.z)
            })
            .collect::<Vec<_>>()
            .into();
        ring.close();
        Ok(BufferOutput::single(
            Polygon::from_outer(ring),
            BufferReport::default(),
        ))
    }
}
