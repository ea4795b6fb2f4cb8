use tracing::{debug, warn};

use crate::error::{BufferError, Result};
use crate::geometry::{Polygon, Ring};
use crate::math::Point3;
use crate::operations::buffer::{
    AreaBuffer2D, BufferOutput, BufferParams, BufferReport, LineBuffer2D, PointBuffer2D,
};

/// Identifier of a feature in an external store.
pub type FeatureId = u64;

/// A feature geometry to buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Point(Point3),
    Line(Ring),
    Area(Polygon),
}

impl Feature {
    /// Buffers this feature.
    ///
    /// # Errors
    ///
    /// Propagates the error of the matching buffer operation.
    pub fn buffer(&self, params: BufferParams) -> Result<BufferOutput> {
        match self {
            Self::Point(p) => PointBuffer2D::new(*p, params).execute(),
            Self::Line(line) => LineBuffer2D::new(line.clone(), params).execute(),
            Self::Area(area) => AreaBuffer2D::new(area.clone(), params).execute(),
        }
    }
}

/// Where features are read from.
pub trait FeatureSource {
    /// Reads one feature.
    ///
    /// # Errors
    ///
    /// Implementations report a missing feature as
    /// `GraphError::EntityNotFound`.
    fn read_feature(&self, id: FeatureId) -> Result<Feature>;
}

/// Where buffer polygons are written to.
pub trait PolygonSink {
    /// Stores one polygon and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns an error when the polygon cannot be stored.
    fn write_polygon(&mut self, outer: &Ring, holes: &[Ring]) -> Result<FeatureId>;
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ids of the written polygons.
    pub written: Vec<FeatureId>,
    /// Features that could not be buffered or stored.
    pub failed: Vec<(FeatureId, BufferError)>,
    /// Counters and diagnostics of all successful features.
    pub report: BufferReport,
}

/// Buffers a sequence of features read from an external store and writes
/// the polygons to another, all with the same parameters. Features that
/// fail are skipped.
#[derive(Debug)]
pub struct BatchBuffer {
    params: BufferParams,
}

impl BatchBuffer {
    #[must_use]
    pub fn new(params: BufferParams) -> Self {
        Self { params }
    }

    /// Reads, buffers and writes every feature of `ids`.
    ///
    /// A failing feature logs one warning and is recorded in
    /// [`BatchReport::failed`]; the run goes on with the next one.
    pub fn run<I, S, K>(&self, ids: I, source: &S, sink: &mut K) -> BatchReport
    where
        I: IntoIterator<Item = FeatureId>,
        S: FeatureSource + ?Sized,
        K: PolygonSink + ?Sized,
    {
        let mut batch = BatchReport::default();
        for id in ids {
            let output = match source
                .read_feature(id)
                .and_then(|f| f.buffer(self.params))
            {
                Ok(output) => output,
                Err(e) => {
                    warn!(id, kind = ?e.kind(), error = %e, "feature skipped");
                    batch.failed.push((id, e));
                    continue;
                }
            };

            let written: Result<Vec<FeatureId>> = output
                .polygons
                .iter()
                .map(|p| sink.write_polygon(&p.outer, &p.holes))
                .collect();
            match written {
                Ok(ids) => {
                    batch.written.extend(ids);
                    batch.report.merge(output.report);
                }
                Err(e) => {
                    warn!(id, error = %e, "feature not written");
                    batch.failed.push((id, e));
                }
            }
        }
        debug!(
            written = batch.written.len(),
            failed = batch.failed.len(),
            "batch done"
        );
        batch
    }
}
