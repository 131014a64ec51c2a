use std::borrow::Cow;

use super::{checked_fraction_range, flatten, Segment, SegmentProxy};
use crate::error::Result;
use crate::geometry::{Aabb, Pline};
use crate::math::distance_2d::{project_param, signed_line_dist};
use crate::math::{xy, Point2, Point3};

/// A straight segment holding copies of its two vertices.
///
/// Creation reads six values out of a flat `xyz` coordinate array and does
/// not allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegment {
    part_index: usize,
    segment_index: usize,
    start: Point3,
    end: Point3,
}

impl LinearSegment {
    #[must_use]
    pub fn new(part_index: usize, segment_index: usize, start: Point3, end: Point3) -> Self {
        Self {
            part_index,
            segment_index,
            start,
            end,
        }
    }

    /// Reads vertices `i` and `j` from an interleaved `x, y, z` array, or
    /// `None` if either lies outside `coords`.
    #[must_use]
    pub(crate) fn from_coords(
        part_index: usize,
        segment_index: usize,
        coords: &[f64],
        i: usize,
        j: usize,
    ) -> Option<Self> {
        let at = |k: usize| match coords.get(3 * k..3 * k + 3)? {
            &[x, y, z] => Some(Point3::new(x, y, z)),
            _ => None,
        };
        Some(Self::new(part_index, segment_index, at(i)?, at(j)?))
    }
}

impl SegmentProxy for LinearSegment {
    fn part_index(&self) -> usize {
        self.part_index
    }

    fn segment_index(&self) -> usize {
        self.segment_index
    }

    fn start(&self, as_3d: bool) -> Point3 {
        flatten(self.start, as_3d)
    }

    fn end(&self, as_3d: bool) -> Point3 {
        flatten(self.end, as_3d)
    }

    fn point_at(&self, fraction: f64, as_3d: bool) -> Point3 {
        let f = fraction.clamp(0.0, 1.0);
        flatten(self.start + (self.end - self.start) * f, as_3d)
    }

    fn direction_at(&self, _fraction: f64) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    fn sub_curve(&self, from: f64, to: f64) -> Result<Segment> {
        let (from, to) = checked_fraction_range(from, to)?;
        Ok(Segment::Linear(Self::new(
            self.part_index,
            self.segment_index,
            self.point_at(from, true),
            self.point_at(to, true),
        )))
    }

    fn length(&self) -> f64 {
        (xy(&self.end) - xy(&self.start)).norm()
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn extent(&self) -> Aabb {
        Aabb::new(xy(&self.start), xy(&self.end))
    }

    fn polyline(&self, _force_creation: bool) -> Cow<'_, Pline> {
        Cow::Owned(Pline::from_points(&[xy(&self.start), xy(&self.end)], false))
    }

    fn query_offset(&self, point: &Point2) -> (f64, f64) {
        let a = xy(&self.start);
        let b = xy(&self.end);
        (signed_line_dist(point, &a, &b), project_param(point, &a, &b))
    }
}
