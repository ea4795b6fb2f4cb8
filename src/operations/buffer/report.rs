use crate::math::Point2;
use crate::planar::{EdgeId, Side, Truncation, VertexId};

/// A recoverable event observed while buffering one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A hole ring was invalid and left out of the buffer.
    SkippedHole { index: usize, reason: String },
    /// A candidate contour enclosed no area.
    ZeroAreaCandidate,
    /// A candidate contour did not return to its first point.
    OpenCandidate,
    /// No interior sample point could be found for a candidate.
    NoInteriorPoint { points: usize },
    /// A contour walk stopped early.
    TruncatedWalk {
        vertex: VertexId,
        edge: EdgeId,
        side: Side,
    },
    /// An inward-buffer hole lay in no shell and was dropped.
    UnassignedHole { sample: Point2 },
}

impl From<Truncation> for Diagnostic {
    fn from(t: Truncation) -> Self {
        Self::TruncatedWalk {
            vertex: t.vertex,
            edge: t.edge,
            side: t.side,
        }
    }
}

/// Counters and diagnostics of one buffer run, returned by value next to
/// the geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferReport {
    /// Contours considered as holes (or, inward, as faces).
    pub candidates: usize,
    /// Candidates rejected by the filters.
    pub discarded: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BufferReport {
    pub(crate) fn accept(&mut self) {
        self.candidates += 1;
    }

    pub(crate) fn discard(&mut self) {
        self.candidates += 1;
        self.discarded += 1;
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Moves the counters and diagnostics of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.discarded += other.discarded;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Number of candidates kept.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.candidates - self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_merge() {
        let mut a = BufferReport::default();
        a.accept();
        a.discard();
        a.record(Diagnostic::ZeroAreaCandidate);

        let mut b = BufferReport::default();
        b.discard();
        b.record(Diagnostic::OpenCandidate);

        a.merge(b);
        assert_eq!(a.candidates, 3);
        assert_eq!(a.discarded, 2);
        assert_eq!(a.kept(), 1);
        assert_eq!(
            a.diagnostics,
            vec![Diagnostic::ZeroAreaCandidate, Diagnostic::OpenCandidate]
        );
    }
}
