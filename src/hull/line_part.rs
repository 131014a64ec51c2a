use super::hull_line::{EndPart, HullLine};
use super::sweep::{point_track_vs_segment, point_vs_arc_track, point_vs_segment_track, widen};
use super::CutPart;
use crate::math::arc_2d::angle_in_sweep;
use crate::math::{perp, unit_at, Lin2D, Point2, Vector2};

/// A straight boundary segment of the neighbor hull.
#[derive(Debug, Clone, PartialEq)]
pub struct LineHullPart {
    pub p0: Point2,
    pub p1: Point2,
    pub part: CutPart,
}

impl LineHullPart {
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, part: CutPart) -> Self {
        Self { p0, p1, part }
    }

    /// Unit normals on both sides, or `None` for a zero-length part.
    fn normals(&self) -> Option<[Vector2; 2]> {
        let n = perp(&(self.p1 - self.p0)).try_normalize(0.0)?;
        Some([n, -n])
    }

    /// Cut with an offset line.
    pub(crate) fn cut_simple(&self, lin: &Lin2D, t_min: &mut f64, t_max: &mut f64) -> bool {
        let mut ts = Vec::new();
        point_track_vs_segment(lin, &Vector2::zeros(), &self.p0, &self.p1, &mut ts);
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
        // Moving segment ends against this part.
        point_track_vs_segment(lin, &end_part.ps, &self.p0, &self.p1, &mut ts);
        point_track_vs_segment(lin, &end_part.pe, &self.p0, &self.p1, &mut ts);
        // This part's ends against the moving segment.
        point_vs_segment_track(lin, &end_part.ps, &end_part.pe, &self.p0, &mut ts);
        point_vs_segment_track(lin, &end_part.ps, &end_part.pe, &self.p1, &mut ts);
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
        for a in [start_direction, start_direction + angle] {
            point_track_vs_segment(lin, &(unit_at(a) * radius), &self.p0, &self.p1, &mut ts);
        }
        for q in [&self.p0, &self.p1] {
            point_vs_arc_track(lin, radius, start_direction, angle, q, &mut ts);
        }
        // Tangency: the arc point whose normal is perpendicular to this part.
        if let Some(normals) = self.normals() {
            for n in normals {
                if angle_in_sweep(n.y.atan2(n.x), start_direction, angle) {
                    point_track_vs_segment(lin, &(n * radius), &self.p0, &self.p1, &mut ts);
                }
            }
        }
        widen(&ts, t_min, t_max)
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
