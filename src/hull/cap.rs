use std::f64::consts::{FRAC_PI_2, PI};

use super::hull_line::{EndPart, HullLine};
use super::hull_part::HullPart;
use super::sweep::EPS;
use super::CutPart;
use crate::error::{HullError, Result};
use crate::math::{Lin2D, Point2, Vector2};

/// End cap of a segment hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentCap {
    /// Half circle spanning the full hull width.
    Round,
    /// Rectangle extending `length` beyond the segment end.
    Rect { length: f64 },
}

/// Frame of a cap: the segment end, the outward direction and the lateral
/// extents to the left (`wpos`) and right (`wneg`) of that direction.
struct CapFrame {
    at: Point2,
    out: Vector2,
    side: Vector2,
    wpos: f64,
    wneg: f64,
    part: CutPart,
}

impl CapFrame {
    fn new(centerline: &Lin2D, left: f64, right: f64, at_end: bool) -> Self {
        let d = centerline.l() / centerline.length();
        let n = centerline.left_normal();
        if at_end {
            Self {
                at: centerline.pe(),
                out: d,
                side: n,
                wpos: left,
                wneg: right,
                part: CutPart::EndCap,
            }
        } else {
            Self {
                at: centerline.ps(),
                out: -d,
                side: -n,
                wpos: right,
                wneg: left,
                part: CutPart::StartCap,
            }
        }
    }

    fn angle(v: &Vector2) -> f64 {
        v.y.atan2(v.x)
    }
}

impl SegmentCap {
    /// A rectangular cap.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is negative.
    pub fn rect(length: f64) -> Result<Self> {
        if length < 0.0 || length.is_nan() {
            return Err(HullError::NegativeCapLength(length).into());
        }
        Ok(Self::Rect { length })
    }

    /// Whether a hull with this cap can be shrunk to its centerline while
    /// the neighbor grows by the same amount (a Minkowski identity that
    /// holds for round caps only).
    #[must_use]
    pub fn is_full_deflatable(&self) -> bool {
        matches!(self, Self::Round)
    }

    /// How far a hull with this cap and the given offset may be deflated.
    #[must_use]
    pub fn deflate_radius(&self, offset: f64) -> f64 {
        match self {
            Self::Round => offset,
            Self::Rect { .. } => 0.0,
        }
    }

    /// Boundary lines of the cap, swept along `centerline`.
    pub(crate) fn hull_lines(
        &self,
        centerline: &Lin2D,
        left: f64,
        right: f64,
        at_end: bool,
        out: &mut Vec<HullLine>,
    ) {
        let f = CapFrame::new(centerline, left, right, at_end);
        match *self {
            Self::Round => {
                let radius = (f.wpos + f.wneg) * 0.5;
                let mean = centerline.translated(&(f.side * ((f.wpos - f.wneg) * 0.5)));
                out.push(HullLine::arc(&mean, radius, CapFrame::angle(&-f.side), PI, f.part));
            }
            Self::Rect { length } => {
                let edge = EndPart::new(
                    f.out * length - f.side * f.wneg,
                    f.out * length + f.side * f.wpos,
                );
                out.push(HullLine::line(centerline, edge, f.part));
                if length > EPS {
                    for lateral in [f.side * f.wpos, -f.side * f.wneg] {
                        let connector = EndPart::new(lateral, lateral + f.out * length);
                        out.push(HullLine::line(centerline, connector, f.part));
                    }
                }
            }
        }
    }

    /// Boundary parts of the cap grown by `inflate`.
    pub(crate) fn inflated_hull_parts(
        &self,
        centerline: &Lin2D,
        left: f64,
        right: f64,
        inflate: f64,
        at_end: bool,
        out: &mut Vec<HullPart>,
    ) {
        let f = CapFrame::new(centerline, left, right, at_end);
        match *self {
            Self::Round => {
                // The outward half circle never reaches into the opposite
                // cap, so it is kept at π even for very short segments.
                let center = f.at + f.side * ((f.wpos - f.wneg) * 0.5);
                let radius = (f.wpos + f.wneg) * 0.5 + inflate;
                out.push(HullPart::circle(center, radius, CapFrame::angle(&-f.side), PI, f.part));
            }
            Self::Rect { length } => {
                let reach = f.at + f.out * (length + inflate);
                out.push(HullPart::line(
                    reach - f.side * f.wneg,
                    reach + f.side * f.wpos,
                    f.part,
                ));
                if length > EPS {
                    for lateral in [f.side * (f.wpos + inflate), -f.side * (f.wneg + inflate)] {
                        out.push(HullPart::line(
                            f.at + lateral,
                            f.at + lateral + f.out * length,
                            f.part,
                        ));
                    }
                }
                if inflate > EPS {
                    let corner = f.at + f.out * length;
                    out.push(HullPart::circle(
                        corner + f.side * f.wpos,
                        inflate,
                        CapFrame::angle(&f.out),
                        FRAC_PI_2,
                        f.part,
                    ));
                    out.push(HullPart::circle(
                        corner - f.side * f.wneg,
                        inflate,
                        CapFrame::angle(&-f.side),
                        FRAC_PI_2,
                        f.part,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn centerline() -> Lin2D {
        Lin2D::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
    }

    #[test]
    fn only_round_caps_deflate() {
        assert!(SegmentCap::Round.is_full_deflatable());
        assert!(!SegmentCap::rect(1.0).unwrap().is_full_deflatable());
        assert!((SegmentCap::Round.deflate_radius(2.5) - 2.5).abs() < 1e-12);
        assert!(SegmentCap::rect(1.0).unwrap().deflate_radius(2.5).abs() < 1e-12);
        assert!(SegmentCap::rect(-1.0).is_err());
    }

    #[test]
    fn round_end_cap_is_forward_half_circle() {
        let mut lines = Vec::new();
        SegmentCap::Round.hull_lines(&centerline(), 3.0, 1.0, true, &mut lines);
        match &lines[0] {
            HullLine::Arc {
                lin,
                radius,
                start_direction,
                angle,
                part,
            } => {
                assert!((lin.ps().y - 1.0).abs() < 1e-12, "mean line y={}", lin.ps().y);
                assert!((radius - 2.0).abs() < 1e-12);
                assert!((start_direction + FRAC_PI_2).abs() < 1e-12);
                assert!((angle - PI).abs() < 1e-12);
                assert_eq!(*part, CutPart::EndCap);
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn round_start_cap_is_backward_half_circle() {
        let mut parts = Vec::new();
        SegmentCap::Round.inflated_hull_parts(&centerline(), 1.0, 1.0, 0.5, false, &mut parts);
        match &parts[0] {
            HullPart::Circle(c) => {
                assert!(c.center.x.abs() < 1e-12 && c.center.y.abs() < 1e-12);
                assert!((c.radius - 1.5).abs() < 1e-12);
                assert!((c.start_direction - FRAC_PI_2).abs() < 1e-12);
                assert_eq!(c.part, CutPart::StartCap);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn rect_cap_lines_have_edge_and_connectors() {
        let mut lines = Vec::new();
        SegmentCap::rect(2.0).unwrap().hull_lines(&centerline(), 1.0, 1.0, true, &mut lines);
        assert_eq!(lines.len(), 3);
        match &lines[0] {
            HullLine::Line { end_part, .. } => {
                assert!((end_part.ps - Vector2::new(2.0, -1.0)).norm() < 1e-12);
                assert!((end_part.pe - Vector2::new(2.0, 1.0)).norm() < 1e-12);
            }
            other => panic!("expected swept segment, got {other:?}"),
        }
    }

    #[test]
    fn zero_length_rect_cap_is_single_edge() {
        let mut lines = Vec::new();
        SegmentCap::rect(0.0).unwrap().hull_lines(&centerline(), 1.0, 1.0, false, &mut lines);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].part(), CutPart::StartCap);
    }

    #[test]
    fn inflated_rect_cap_has_rounded_corners() {
        let mut parts = Vec::new();
        SegmentCap::rect(2.0)
            .unwrap()
            .inflated_hull_parts(&centerline(), 1.0, 1.0, 0.5, true, &mut parts);
        // Edge, two connectors, two corners.
        assert_eq!(parts.len(), 5);
        let corners: Vec<_> = parts
            .iter()
            .filter_map(|p| match p {
                HullPart::Circle(c) => Some(c),
                HullPart::Line(_) => None,
            })
            .collect();
        assert_eq!(corners.len(), 2);
        assert!((corners[0].center - Point2::new(12.0, 1.0)).norm() < 1e-12);
        assert!((corners[1].center - Point2::new(12.0, -1.0)).norm() < 1e-12);
    }
}
