mod arc;
mod linear;

pub use arc::ArcSegment;
pub use linear::LinearSegment;

use std::borrow::Cow;

use crate::error::{GeometryError, Result};
use crate::geometry::{Aabb, Pline};
use crate::math::{Point2, Point3};

/// One primitive segment of a multi-part curve, identified by its part and
/// segment index.
///
/// Fractions run from `0` at the start to `1` at the end and are clamped
/// to that range.
pub trait SegmentProxy {
    /// Index of the curve part this segment belongs to.
    fn part_index(&self) -> usize;

    /// Index of the segment within its part.
    fn segment_index(&self) -> usize;

    /// Start point; `z` is zero unless `as_3d`.
    fn start(&self, as_3d: bool) -> Point3 {
        self.point_at(0.0, as_3d)
    }

    /// End point; `z` is zero unless `as_3d`.
    fn end(&self, as_3d: bool) -> Point3 {
        self.point_at(1.0, as_3d)
    }

    /// Point at `fraction`; `z` is zero unless `as_3d`.
    fn point_at(&self, fraction: f64, as_3d: bool) -> Point3;

    /// Tangent direction angle (radians) at `fraction`.
    fn direction_at(&self, fraction: f64) -> f64;

    /// The part of this segment between `from` and `to`, tagged with the
    /// same part and segment index.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidFractionRange`] if `from > to`.
    fn sub_curve(&self, from: f64, to: f64) -> Result<Segment>;

    /// Length in the XY plane.
    fn length(&self) -> f64;

    /// Whether the segment is a straight line.
    fn is_linear(&self) -> bool;

    /// Bounding box of the segment in the XY plane.
    fn extent(&self) -> Aabb;

    /// A one-segment [`Pline`] with the segment's geometry.
    ///
    /// Implementations may cache the polyline; `force_creation` always
    /// builds a fresh one.
    fn polyline(&self, force_creation: bool) -> Cow<'_, Pline>;

    /// Signed lateral offset of `point` (positive on the left) and the
    /// unclamped fraction of its projection onto the segment.
    fn query_offset(&self, point: &Point2) -> (f64, f64);

    /// Bounding box of the part between `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidFractionRange`] if `from > to`.
    fn sub_curve_extent(&self, from: f64, to: f64) -> Result<Aabb> {
        Ok(self.sub_curve(from, to)?.extent())
    }
}

/// A segment proxy: either an array-backed straight line or a circular arc
/// owning its geometry.
#[derive(Debug, Clone)]
pub enum Segment {
    Linear(LinearSegment),
    Arc(ArcSegment),
}

impl Segment {
    /// The start and end point in the XY plane.
    #[must_use]
    pub fn endpoints_2d(&self) -> (Point2, Point2) {
        let s = self.start(false);
        let e = self.end(false);
        (Point2::new(s.x, s.y), Point2::new(e.x, e.y))
    }

    /// Bulge of the segment; zero for straight segments.
    #[must_use]
    pub fn bulge(&self) -> f64 {
        match self {
            Self::Linear(_) => 0.0,
            Self::Arc(arc) => arc.bulge(),
        }
    }
}

impl From<LinearSegment> for Segment {
    fn from(segment: LinearSegment) -> Self {
        Self::Linear(segment)
    }
}

impl From<ArcSegment> for Segment {
    fn from(segment: ArcSegment) -> Self {
        Self::Arc(segment)
    }
}

macro_rules! delegate {
    ($self:ident, $s:ident => $call:expr) => {
        match $self {
            Segment::Linear($s) => $call,
            Segment::Arc($s) => $call,
        }
    };
}

impl SegmentProxy for Segment {
    fn part_index(&self) -> usize {
        delegate!(self, s => s.part_index())
    }

    fn segment_index(&self) -> usize {
        delegate!(self, s => s.segment_index())
    }

    fn start(&self, as_3d: bool) -> Point3 {
        delegate!(self, s => s.start(as_3d))
    }

    fn end(&self, as_3d: bool) -> Point3 {
        delegate!(self, s => s.end(as_3d))
    }

    fn point_at(&self, fraction: f64, as_3d: bool) -> Point3 {
        delegate!(self, s => s.point_at(fraction, as_3d))
    }

    fn direction_at(&self, fraction: f64) -> f64 {
        delegate!(self, s => s.direction_at(fraction))
    }

    fn sub_curve(&self, from: f64, to: f64) -> Result<Segment> {
        delegate!(self, s => s.sub_curve(from, to))
    }

    fn length(&self) -> f64 {
        delegate!(self, s => s.length())
    }

    fn is_linear(&self) -> bool {
        matches!(self, Segment::Linear(_))
    }

    fn extent(&self) -> Aabb {
        delegate!(self, s => s.extent())
    }

    fn polyline(&self, force_creation: bool) -> Cow<'_, Pline> {
        delegate!(self, s => s.polyline(force_creation))
    }

    fn query_offset(&self, point: &Point2) -> (f64, f64) {
        delegate!(self, s => s.query_offset(point))
    }
}

/// Drops `z` unless `as_3d`.
pub(crate) fn flatten(p: Point3, as_3d: bool) -> Point3 {
    if as_3d {
        p
    } else {
        Point3::new(p.x, p.y, 0.0)
    }
}

/// Validates a sub-curve fraction range and clamps it to `[0, 1]`.
pub(crate) fn checked_fraction_range(from: f64, to: f64) -> Result<(f64, f64)> {
    if from > to || from.is_nan() || to.is_nan() {
        return Err(GeometryError::InvalidFractionRange { from, to }.into());
    }
    Ok((from.clamp(0.0, 1.0), to.clamp(0.0, 1.0)))
}
