use tracing::{debug, instrument};

use crate::error::Result;
use crate::geometry::SegmentProxy;
use crate::hull::SegmentHull;
use crate::math::TOLERANCE;
use crate::operations::buffer::GeometryKernel;

/// Intervals of the hull segment inside the neighbor's buffer of `radius`,
/// as fractions of the hull segment.
///
/// A zero radius has no area to intersect; the segments then either
/// coincide completely or not at all, compared within `tolerance` (at least
/// [`TOLERANCE`]).
#[instrument(skip_all, fields(radius = radius, tolerance = tolerance))]
pub(crate) fn cut_buffer<K: GeometryKernel + ?Sized>(
    hull: &SegmentHull,
    neighbor: &SegmentHull,
    radius: f64,
    tolerance: f64,
    kernel: &K,
) -> Result<Vec<[f64; 2]>> {
    let hull_line = hull.segment().polyline(false);
    let neighbor_line = neighbor.segment().polyline(false);

    if radius <= 0.0 {
        let tolerance = tolerance.max(TOLERANCE);
        let same = kernel.equals(&hull_line, &neighbor_line, tolerance)
            || kernel.equals(&hull_line, &neighbor_line.reversed(), tolerance);
        debug!(same, "zero radius, checked for equal curves");
        return Ok(if same { vec![[0.0, 1.0]] } else { Vec::new() });
    }

    let polygon = kernel.create_buffer(&neighbor_line, radius)?;
    if kernel.is_disjoint(&hull_line, &polygon) {
        debug!("hull curve misses the buffer");
        return Ok(Vec::new());
    }
    let intervals = kernel.intersect(&hull_line, &polygon)?;
    debug!(count = intervals.len(), "hull curve cut with buffer");
    Ok(intervals)
}
