use tracing::{debug, trace};

use super::convolution::convolution_ring;
use super::filter::{candidate_sample, point_in_buffer};
use super::params::BufferParams;
use super::report::{BufferReport, Diagnostic};
use crate::error::{GeometryError, Result};
use crate::geometry::Ring;
use crate::math::polygon_2d::{point_in_ring, PointLocation};
use crate::planar::{build, ContourExtractor, Side};

/// Buffers a closed outer boundary and its holes outward.
///
/// The outer ring is offset away from the area (its curve's outer contour
/// is the buffer outline) and each hole towards its own inside. Face
/// contours that survive the filters become the holes of the result.
///
/// Ring orientation is normalized first: the outer ring counter-clockwise
/// and holes clockwise, so all offsets go to the right of travel.
///
/// # Errors
///
/// Returns `GeometryError::TooFewPoints` when the outer ring has fewer than
/// 2 distinct points, or a `GraphError` from the outer contour walk. Hole
/// rings failing with invalid geometry are skipped and reported.
pub fn buffer_lines(
    outer: &Ring,
    holes: &[Ring],
    params: &BufferParams,
    report: &mut BufferReport,
) -> Result<(Ring, Vec<Ring>)> {
    let metric = params.metric();
    let outer = outer.pruned().oriented(true);

    let curve = convolution_ring(&outer, params, Side::Right);
    if curve.is_empty() {
        return Err(GeometryError::TooFewPoints {
            found: outer.distinct_point_count(),
            required: 2,
        }
        .into());
    }

    let graph = build(&curve)?;
    let mut extractor = ContourExtractor::new(&graph, params.inconsistency_policy());
    let outline = extractor.extract_outer()?.ring;

    let mut kept = Vec::new();
    for contour in extractor.extract_inner_all()? {
        if contour.winding != 0 {
            continue;
        }
        let accepted = candidate_sample(&contour.ring, report).is_some_and(|p| {
            point_in_ring(&p, &outer.points) == PointLocation::Outside
                && !point_in_buffer(&outer, &p, &metric)
        });
        trace!(points = contour.ring.len(), accepted, "outer curve candidate");
        if accepted {
            report.accept();
            kept.push(contour.ring);
        } else {
            report.discard();
        }
    }
    report
        .diagnostics
        .extend(extractor.truncations().iter().copied().map(Diagnostic::from));

    for (index, hole) in holes.iter().enumerate() {
        match hole_contours(hole, params, report) {
            Ok(rings) => kept.extend(rings),
            Err(e) if e.is_invalid_geometry() => {
                debug!(index, error = %e, "hole skipped");
                report.record(Diagnostic::SkippedHole {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        outline = outline.len(),
        holes = kept.len(),
        candidates = report.candidates,
        discarded = report.discarded,
        "buffer lines done"
    );
    Ok((outline, kept))
}

/// Offsets one hole ring into its inside and returns the faces left
/// uncovered by the buffer.
fn hole_contours(hole: &Ring, params: &BufferParams, report: &mut BufferReport) -> Result<Vec<Ring>> {
    let metric = params.metric();
    let hole = hole.pruned().oriented(false);
    let found = hole.distinct_point_count();
    if found < 3 {
        return Err(GeometryError::TooFewPoints { found, required: 3 }.into());
    }

    let curve = convolution_ring(&hole, params, Side::Right);
    let graph = build(&curve)?;
    let mut extractor = ContourExtractor::new(&graph, params.inconsistency_policy());
    extractor.extract_outer()?;

    let mut kept = Vec::new();
    for contour in extractor.extract_inner_all()? {
        if contour.winding != -1 {
            continue;
        }
        let accepted = candidate_sample(&contour.ring, report).is_some_and(|p| {
            point_in_ring(&p, &hole.points) == PointLocation::Inside
                && !point_in_buffer(&hole, &p, &metric)
        });
        trace!(points = contour.ring.len(), accepted, "hole curve candidate");
        if accepted {
            report.accept();
            kept.push(contour.ring);
        } else {
            report.discard();
        }
    }
    report
        .diagnostics
        .extend(extractor.truncations().iter().copied().map(Diagnostic::from));
    Ok(kept)
}
