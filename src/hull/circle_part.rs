use std::f64::consts::TAU;

use super::hull_line::{EndPart, HullLine};
use super::sweep::{
    center_track_at_distance, point_track_vs_arc, point_track_vs_point, point_vs_arc_track,
    point_vs_segment_track, widen, EPS,
};
use super::CutPart;
use crate::math::arc_2d::angle_in_sweep;
use crate::math::{perp, unit_at, Lin2D, Point2, Vector2};

/// A circular boundary arc of the neighbor hull.
///
/// A zero radius denotes a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleHullPart {
    pub center: Point2,
    pub radius: f64,
    pub start_direction: f64,
    pub angle: f64,
    pub part: CutPart,
}

impl CircleHullPart {
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_direction: f64, angle: f64, part: CutPart) -> Self {
        Self {
            center,
            radius,
            start_direction,
            angle,
            part,
        }
    }

    /// A single point.
    #[must_use]
    pub fn point(center: Point2, part: CutPart) -> Self {
        Self::new(center, 0.0, 0.0, TAU, part)
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        self.radius <= EPS
    }

    fn contains_direction(&self, v: &Vector2) -> bool {
        angle_in_sweep(v.y.atan2(v.x), self.start_direction, self.angle)
    }

    fn endpoints(&self) -> [Point2; 2] {
        [
            self.center + unit_at(self.start_direction) * self.radius,
            self.center + unit_at(self.start_direction + self.angle) * self.radius,
        ]
    }

    /// Cut with an offset line.
    pub(crate) fn cut_simple(&self, lin: &Lin2D, t_min: &mut f64, t_max: &mut f64) -> bool {
        let mut ts = Vec::new();
        self.point_track(lin, &Vector2::zeros(), &mut ts);
        widen(&ts, t_min, t_max)
    }

    /// Cut with a segment swept along `lin`.
    pub(crate) fn cut_line(
        &self,
        lin: &Lin2D,
        end_part: &EndPart,
        t_min: &mut f64,
        t_max: &mut f64,
    ) -> bool {
        let mut ts = Vec::new();
        if self.is_point() {
            point_vs_segment_track(lin, &end_part.ps, &end_part.pe, &self.center, &mut ts);
            return widen(&ts, t_min, t_max);
        }
        self.point_track(lin, &end_part.ps, &mut ts);
        self.point_track(lin, &end_part.pe, &mut ts);
        for q in self.endpoints() {
            point_vs_segment_track(lin, &end_part.ps, &end_part.pe, &q, &mut ts);
        }
        // Tangency: the arc point whose normal is perpendicular to the segment.
        if let Some(n) = perp(&(end_part.pe - end_part.ps)).try_normalize(0.0) {
            for n in [n, -n] {
                if self.contains_direction(&n) {
                    let q = self.center + n * self.radius;
                    point_vs_segment_track(lin, &end_part.ps, &end_part.pe, &q, &mut ts);
                }
            }
        }
        widen(&ts, t_min, t_max)
    }

    /// Cut with an arc swept along `lin`.
    pub(crate) fn cut_arc(
        &self,
        lin: &Lin2D,
        radius: f64,
        start_direction: f64,
        angle: f64,
        t_min: &mut f64,
        t_max: &mut f64,
    ) -> bool {
        let mut ts = Vec::new();
        if self.is_point() {
            point_vs_arc_track(lin, radius, start_direction, angle, &self.center, &mut ts);
            return widen(&ts, t_min, t_max);
        }
        let own_contains = |v: &Vector2| angle_in_sweep(v.y.atan2(v.x), start_direction, angle);

        for a in [start_direction, start_direction + angle] {
            self.point_track(lin, &(unit_at(a) * radius), &mut ts);
        }
        for q in self.endpoints() {
            point_vs_arc_track(lin, radius, start_direction, angle, &q, &mut ts);
        }

        // External tangency: the contact direction seen from this part's
        // center is u, seen from the moving center it is -u.
        for t in center_track_at_distance(lin, &self.center, self.radius + radius) {
            let u = lin.point_at(t) - self.center;
            if self.contains_direction(&u) && own_contains(&-u) {
                ts.push(t);
            }
        }

        // Internal tangency: both arcs touch in the same direction.
        let gap = (self.radius - radius).abs();
        if gap > EPS {
            for t in center_track_at_distance(lin, &self.center, gap) {
                let p = lin.point_at(t);
                let u = if self.radius > radius {
                    p - self.center
                } else {
                    self.center - p
                };
                if self.contains_direction(&u) && own_contains(&u) {
                    ts.push(t);
                }
            }
        } else {
            // Equal radii: the circles coincide when the centers meet.
            let mut meet = Vec::new();
            point_track_vs_point(lin, &Vector2::zeros(), &self.center, &mut meet);
            let overlap = [start_direction, start_direction + angle]
                .iter()
                .any(|a| self.contains_direction(&unit_at(*a)))
                || [self.start_direction, self.start_direction + self.angle]
                    .iter()
                    .any(|a| own_contains(&unit_at(*a)));
            if overlap {
                ts.extend(meet);
            }
        }
        widen(&ts, t_min, t_max)
    }

    fn point_track(&self, lin: &Lin2D, offset: &Vector2, out: &mut Vec<f64>) {
        point_track_vs_arc(
            lin,
            offset,
            &self.center,
            self.radius,
            self.start_direction,
            self.angle,
            out,
        );
    }

    pub(crate) fn cut(&self, line: &HullLine, t_min: &mut f64, t_max: &mut f64) -> bool {
        match line {
            HullLine::Simple { lin, .. } => self.cut_simple(lin, t_min, t_max),
            HullLine::Line { lin, end_part, .. } => self.cut_line(lin, end_part, t_min, t_max),
            HullLine::Arc {
                lin,
                radius,
                start_direction,
                angle,
                ..
            } => self.cut_arc(lin, *radius, *start_direction, *angle, t_min, t_max),
        }
    }
}
