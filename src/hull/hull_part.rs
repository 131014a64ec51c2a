use super::circle_part::CircleHullPart;
use super::hull_line::HullLine;
use super::line_part::LineHullPart;
use super::sweep::EPS;
use super::CutPart;
use crate::math::Point2;

/// A boundary primitive of the neighbor hull, fixed in space.
#[derive(Debug, Clone, PartialEq)]
pub enum HullPart {
    Line(LineHullPart),
    Circle(CircleHullPart),
}

impl HullPart {
    /// A straight part; zero-length parts become points.
    #[must_use]
    pub fn line(p0: Point2, p1: Point2, part: CutPart) -> Self {
        if (p1 - p0).norm() <= EPS {
            Self::Circle(CircleHullPart::point(p0, part))
        } else {
            Self::Line(LineHullPart::new(p0, p1, part))
        }
    }

    /// A circular part; a vanishing radius becomes a point.
    #[must_use]
    pub fn circle(center: Point2, radius: f64, start_direction: f64, angle: f64, part: CutPart) -> Self {
        if radius <= EPS {
            Self::Circle(CircleHullPart::point(center, part))
        } else {
            Self::Circle(CircleHullPart::new(center, radius, start_direction, angle, part))
        }
    }

    #[must_use]
    pub fn part(&self) -> CutPart {
        match self {
            Self::Line(l) => l.part,
            Self::Circle(c) => c.part,
        }
    }

    /// Cuts `hull_line` against this part.
    ///
    /// Widens `[t_min, t_max]` by the range of `hull_line` parameters at
    /// which the swept shape touches this part and returns whether it does.
    pub fn cut(&self, hull_line: &HullLine, t_min: &mut f64, t_max: &mut f64) -> bool {
        match self {
            Self::Line(l) => l.cut(hull_line, t_min, t_max),
            Self::Circle(c) => c.cut(hull_line, t_min, t_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Lin2D;

    #[test]
    fn zero_length_line_is_a_point() {
        let p = Point2::new(1.0, 1.0);
        let part = HullPart::line(p, p, CutPart::LeftSide);
        assert!(matches!(part, HullPart::Circle(ref c) if c.is_point()));
        assert_eq!(part.part(), CutPart::LeftSide);
    }

    #[test]
    fn cut_accumulates_across_parts() {
        let lin = Lin2D::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let line = HullLine::Simple {
            lin,
            part: CutPart::LeftSide,
        };
        let a = HullPart::line(Point2::new(2.0, -1.0), Point2::new(2.0, 1.0), CutPart::StartCap);
        let b = HullPart::circle(Point2::new(7.0, 0.0), 1.0, 0.0, std::f64::consts::TAU, CutPart::EndCap);
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        assert!(a.cut(&line, &mut lo, &mut hi));
        assert!(b.cut(&line, &mut lo, &mut hi));
        assert!((lo - 0.2).abs() < 1e-12 && (hi - 0.8).abs() < 1e-12, "[{lo}, {hi}]");
    }
}
