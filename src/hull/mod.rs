//! Tolerance hulls around segments and closed-form cuts between them.
//!
//! A [`SegmentHull`] is the region within `left_offset` to the left and
//! `right_offset` to the right of a segment, closed by two [`SegmentCap`]s.
//! The boundary of the hull being cut is described by [`HullLine`]s swept
//! along the segment; the boundary of the neighbor is described by fixed
//! [`HullPart`]s.

mod cap;
mod circle_part;
mod hull_line;
mod hull_part;
mod line_part;
pub(crate) mod sweep;

pub use cap::SegmentCap;
pub use circle_part::CircleHullPart;
pub use hull_line::{EndPart, HullLine};
pub use hull_part::HullPart;
pub use line_part::LineHullPart;

use std::f64::consts::TAU;

use crate::error::{GeometryError, HullError, Result};
use crate::geometry::{Segment, SegmentProxy};
use crate::math::{xy, Lin2D};

/// Which boundary piece of a hull produced a cut bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutPart {
    LeftSide,
    RightSide,
    StartCap,
    EndCap,
}

/// A segment with lateral tolerance offsets and end caps.
#[derive(Debug, Clone)]
pub struct SegmentHull {
    segment: Segment,
    left_offset: f64,
    right_offset: f64,
    start_cap: SegmentCap,
    end_cap: SegmentCap,
}

impl SegmentHull {
    /// Creates a hull.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::NegativeOffset`] if an offset is negative or NaN.
    pub fn new(
        segment: impl Into<Segment>,
        left_offset: f64,
        right_offset: f64,
        start_cap: SegmentCap,
        end_cap: SegmentCap,
    ) -> Result<Self> {
        for (side, value) in [("left", left_offset), ("right", right_offset)] {
            if value < 0.0 || value.is_nan() {
                return Err(HullError::NegativeOffset { side, value }.into());
            }
        }
        Ok(Self {
            segment: segment.into(),
            left_offset,
            right_offset,
            start_cap,
            end_cap,
        })
    }

    /// A symmetric hull with round caps (a capsule around the segment).
    ///
    /// # Errors
    ///
    /// Returns [`HullError::NegativeOffset`] if `offset` is negative.
    pub fn round(segment: impl Into<Segment>, offset: f64) -> Result<Self> {
        Self::new(segment, offset, offset, SegmentCap::Round, SegmentCap::Round)
    }

    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    #[must_use]
    pub fn left_offset(&self) -> f64 {
        self.left_offset
    }

    #[must_use]
    pub fn right_offset(&self) -> f64 {
        self.right_offset
    }

    #[must_use]
    pub fn start_cap(&self) -> SegmentCap {
        self.start_cap
    }

    #[must_use]
    pub fn end_cap(&self) -> SegmentCap {
        self.end_cap
    }

    /// Whether both caps are round.
    #[must_use]
    pub fn is_full_deflatable(&self) -> bool {
        self.start_cap.is_full_deflatable() && self.end_cap.is_full_deflatable()
    }

    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.left_offset.max(self.right_offset)
    }

    #[must_use]
    pub fn min_offset(&self) -> f64 {
        self.left_offset.min(self.right_offset)
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.left_offset == self.right_offset
    }

    /// How far the hull can be shrunk towards its centerline while the
    /// neighbor grows by the same amount without changing the cut.
    #[must_use]
    pub fn deflate_radius(&self) -> f64 {
        let offset = self.min_offset();
        self.start_cap
            .deflate_radius(offset)
            .min(self.end_cap.deflate_radius(offset))
    }

    /// The centerline in the XY plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a zero-length segment.
    pub fn centerline(&self) -> Result<Lin2D> {
        let ps = xy(&self.segment.start(false));
        let pe = xy(&self.segment.end(false));
        if (pe - ps).norm() <= sweep::EPS {
            return Err(GeometryError::Degenerate(format!(
                "segment {} of part {} has no length",
                self.segment.segment_index(),
                self.segment.part_index()
            ))
            .into());
        }
        Ok(Lin2D::new(ps, pe))
    }

    /// Boundary lines of this hull shrunk by `deflate`, swept along the
    /// centerline.
    ///
    /// The lines are ordered left side, right side, start cap, end cap.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for a zero-length segment.
    pub fn hull_lines(&self, deflate: f64) -> Result<Vec<HullLine>> {
        let centerline = self.centerline()?;
        let left = (self.left_offset - deflate).max(0.0);
        let right = (self.right_offset - deflate).max(0.0);
        let mut lines = vec![
            HullLine::Simple {
                lin: centerline.shifted(left),
                part: CutPart::LeftSide,
            },
            HullLine::Simple {
                lin: centerline.shifted(-right),
                part: CutPart::RightSide,
            },
        ];
        self.start_cap
            .hull_lines(&centerline, left, right, false, &mut lines);
        self.end_cap.hull_lines(&centerline, left, right, true, &mut lines);
        Ok(lines)
    }

    /// Boundary parts of this hull grown by `inflate`.
    ///
    /// A zero-length segment yields a single full circle.
    #[must_use]
    pub fn hull_parts(&self, inflate: f64) -> Vec<HullPart> {
        let Ok(centerline) = self.centerline() else {
            return vec![HullPart::circle(
                xy(&self.segment.start(false)),
                self.max_offset() + inflate,
                0.0,
                TAU,
                CutPart::StartCap,
            )];
        };
        let n = centerline.left_normal();
        let left = n * (self.left_offset + inflate);
        let right = -n * (self.right_offset + inflate);
        let (ps, pe) = (centerline.ps(), centerline.pe());
        let mut parts = vec![
            HullPart::line(ps + left, pe + left, CutPart::LeftSide),
            HullPart::line(ps + right, pe + right, CutPart::RightSide),
        ];
        self.start_cap.inflated_hull_parts(
            &centerline,
            self.left_offset,
            self.right_offset,
            inflate,
            false,
            &mut parts,
        );
        self.end_cap.inflated_hull_parts(
            &centerline,
            self.left_offset,
            self.right_offset,
            inflate,
            true,
            &mut parts,
        );
        parts
    }
}
