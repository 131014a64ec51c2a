use crate::geometry::{Segment, SegmentProxy};
use crate::math::distance_2d::project_param;
use crate::math::Point2;

/// Where a point lies relative to a segment's `[0, 1]` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NearSegment {
    /// Before the start, farther than the tolerance.
    PreStart,
    /// Within the tolerance of the start.
    NearStart,
    /// Between start and end.
    NearLine,
    /// Within the tolerance of the end.
    NearEnd,
    /// After the end, farther than the tolerance.
    PostEnd,
}

/// Classifies `point` by its projection onto the chord of `segment`.
///
/// `tolerance` is a length and is compared with the along-distance of the
/// projection from either end.
#[must_use]
pub fn classify(point: &Point2, segment: &Segment, tolerance: f64) -> NearSegment {
    let (b0, b1) = segment.endpoints_2d();
    let len = (b1 - b0).norm();
    if len <= f64::EPSILON {
        return if (point - b0).norm() <= tolerance {
            NearSegment::NearStart
        } else {
            NearSegment::PreStart
        };
    }
    let s = project_param(point, &b0, &b1);
    if (s * len).abs() <= tolerance {
        NearSegment::NearStart
    } else if ((1.0 - s) * len).abs() <= tolerance {
        NearSegment::NearEnd
    } else if s < 0.0 {
        NearSegment::PreStart
    } else if s > 1.0 {
        NearSegment::PostEnd
    } else {
        NearSegment::NearLine
    }
}

/// Whether both segments share their endpoints within `tolerance`, in
/// either orientation. Curved segments must also share their midpoint.
#[must_use]
pub fn is_coincident(a: &Segment, b: &Segment, tolerance: f64, as_3d: bool) -> bool {
    let close = |p: f64, q: f64| (a.point_at(p, as_3d) - b.point_at(q, as_3d)).norm() <= tolerance;
    let forward = close(0.0, 0.0) && close(1.0, 1.0);
    let backward = close(0.0, 1.0) && close(1.0, 0.0);
    if !(forward || backward) {
        return false;
    }
    if a.is_linear() && b.is_linear() {
        return true;
    }
    close(0.5, 0.5)
}
