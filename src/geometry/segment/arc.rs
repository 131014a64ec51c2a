use std::borrow::Cow;
use std::sync::OnceLock;

use super::{checked_fraction_range, flatten, LinearSegment, Segment, SegmentProxy};
use crate::error::Result;
use crate::geometry::{Aabb, Pline, PlineVertex};
use crate::math::arc_2d::{sub_arc_bulge, BulgeArc, MIN_BULGE};
use crate::math::{xy, Point2, Point3};

/// A circular-arc segment owning a private copy of its geometry.
///
/// The source curve may change after creation without affecting the
/// segment. `z` is interpolated linearly along the arc.
#[derive(Debug, Clone)]
pub struct ArcSegment {
    part_index: usize,
    segment_index: usize,
    start: Point3,
    end: Point3,
    bulge: f64,
    arc: BulgeArc,
    polyline: OnceLock<Pline>,
}

impl ArcSegment {
    /// Creates an arc from `start` to `end` with the given bulge.
    ///
    /// Returns `None` if the bulge or the chord is too small to define an
    /// arc.
    #[must_use]
    pub fn new(
        part_index: usize,
        segment_index: usize,
        start: Point3,
        end: Point3,
        bulge: f64,
    ) -> Option<Self> {
        let arc = BulgeArc::from_bulge(&xy(&start), &xy(&end), bulge)?;
        Some(Self {
            part_index,
            segment_index,
            start,
            end,
            bulge,
            arc,
            polyline: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn bulge(&self) -> f64 {
        self.bulge
    }

    /// Center/radius/angle form of the arc.
    #[must_use]
    pub fn arc(&self) -> &BulgeArc {
        &self.arc
    }

    fn build_polyline(&self) -> Pline {
        Pline::new(
            vec![
                PlineVertex::new(self.start.x, self.start.y, self.bulge),
                PlineVertex::line(self.end.x, self.end.y),
            ],
            false,
        )
    }
}

impl SegmentProxy for ArcSegment {
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
        let p = self.arc.point_at(f);
        let z = if as_3d {
            self.start.z + (self.end.z - self.start.z) * f
        } else {
            0.0
        };
        Point3::new(p.x, p.y, z)
    }

    fn direction_at(&self, fraction: f64) -> f64 {
        let t = self.arc.tangent_at(fraction.clamp(0.0, 1.0));
        t.y.atan2(t.x)
    }

    fn sub_curve(&self, from: f64, to: f64) -> Result<Segment> {
        let (from, to) = checked_fraction_range(from, to)?;
        let start = self.point_at(from, true);
        let end = self.point_at(to, true);
        let bulge = sub_arc_bulge(self.bulge, from, to);
        if bulge.abs() < MIN_BULGE {
            return Ok(LinearSegment::new(self.part_index, self.segment_index, start, end).into());
        }
        Ok(
            match Self::new(self.part_index, self.segment_index, start, end, bulge) {
                Some(arc) => arc.into(),
                None => LinearSegment::new(self.part_index, self.segment_index, start, end).into(),
            },
        )
    }

    fn length(&self) -> f64 {
        self.arc.length()
    }

    fn is_linear(&self) -> bool {
        false
    }

    fn extent(&self) -> Aabb {
        let (min, max) = self.arc.extent();
        Aabb { min, max }
    }

    fn polyline(&self, force_creation: bool) -> Cow<'_, Pline> {
        if force_creation {
            Cow::Owned(self.build_polyline())
        } else {
            Cow::Borrowed(self.polyline.get_or_init(|| self.build_polyline()))
        }
    }

    fn query_offset(&self, point: &Point2) -> (f64, f64) {
        let v = point - self.arc.center;
        let dist = v.norm();
        let along = self.arc.unbounded_param_of_angle(v.y.atan2(v.x));
        // Left of a counter-clockwise arc is towards the center.
        let offset = if self.arc.is_ccw() {
            self.arc.radius - dist
        } else {
            dist - self.arc.radius
        };
        (offset, along)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    /// Upper half circle of radius 1 around the origin, clockwise.
    fn upper() -> ArcSegment {
        ArcSegment::new(3, 4, Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 2.0), -1.0)
            .unwrap()
    }

    #[test]
    fn straight_bulge_is_rejected() {
        let seg = ArcSegment::new(0, 0, Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.0);
        assert!(seg.is_none());
    }

    #[test]
    fn point_and_direction_at_apex() {
        let seg = upper();
        let p = seg.point_at(0.5, true);
        assert!(p.x.abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12, "p={p:?}");
        assert!((p.z - 1.0).abs() < 1e-12);
        // Clockwise over the top runs towards +x.
        assert!(seg.direction_at(0.5).abs() < 1e-12);
        assert!((seg.length() - PI).abs() < 1e-12);
    }

    #[test]
    fn extent_reaches_apex() {
        let b = upper().extent();
        assert!((b.max.y - 1.0).abs() < 1e-12);
        assert!(b.min.y.abs() < 1e-12);
    }

    #[test]
    fn sub_curve_is_quarter_arc() {
        let sub = upper().sub_curve(0.0, 0.5).unwrap();
        assert!(!sub.is_linear());
        assert_eq!(sub.part_index(), 3);
        let e = sub.end(false);
        assert!(e.x.abs() < 1e-12 && (e.y - 1.0).abs() < 1e-12, "e={e:?}");
        assert!((sub.length() - PI * 0.5).abs() < 1e-12);
        assert!(upper().sub_curve(0.5, 0.0).is_err());
    }

    #[test]
    fn empty_sub_curve_degrades_to_line() {
        let sub = upper().sub_curve(0.3, 0.3).unwrap();
        assert!(sub.is_linear());
    }

    #[test]
    fn polyline_is_cached_unless_forced() {
        let seg = upper();
        assert!(matches!(seg.polyline(false), Cow::Borrowed(_)));
        assert!(matches!(seg.polyline(true), Cow::Owned(_)));
        assert!((seg.polyline(false).vertices[0].bulge + 1.0).abs() < 1e-12);
    }

    #[test]
    fn query_offset_outside_clockwise_arc_is_left() {
        // Travelling clockwise over the top, the outside lies to the left.
        let (offset, along) = upper().query_offset(&Point2::new(0.0, 3.0));
        assert!((offset - 2.0).abs() < 1e-12, "offset={offset}");
        assert!((along - 0.5).abs() < 1e-12, "along={along}");
    }
}
