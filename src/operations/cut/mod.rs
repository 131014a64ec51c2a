//! Cutting one segment's hull against a neighbor's hull.
//!
//! The result is the set of parameter intervals on the hull segment's
//! carrier line for which the hull, swept along the segment, touches the
//! neighbor's hull. Round symmetric hulls of linear segments are solved in
//! closed form, round symmetric hulls of curved segments go through a
//! [`GeometryKernel`] buffer, and everything else is cut boundary part by
//! boundary part.

mod detailed;
mod fallback;
mod near;
mod segment_pair_2d;
mod segment_pair_3d;

pub use near::{classify, is_coincident, NearSegment};
pub use segment_pair_2d::SegmentPair2D;
pub use segment_pair_3d::SegmentPair3D;

use tracing::{debug, trace, warn};

use crate::error::{GeometryError, HullError, Result};
use crate::geometry::SegmentProxy;
use crate::hull::sweep::EPS;
use crate::hull::{CutPart, SegmentHull};
use crate::math::TOLERANCE;
use crate::operations::buffer::{GeometryKernel, TessellatingKernel};

use detailed::DetailedCut;

/// Outcome of cutting a hull against a neighbor.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveHullCut {
    /// Parameter intervals on the hull segment, each with `lo <= hi`.
    ///
    /// Intervals from the closed-form and detailed cuts are not clamped to
    /// `[0, 1]`; see [`CurveHullCut::clamped`].
    pub intervals: Vec<[f64; 2]>,
    /// Position of the hull's start point relative to the neighbor.
    pub hull_start_near: NearSegment,
    /// Position of the hull's end point relative to the neighbor.
    pub hull_end_near: NearSegment,
    /// Both segments share their end points within the tolerance.
    pub coincident: bool,
    pub intersects: bool,
    /// Neighbor boundary part producing the lower bound (detailed cut only).
    pub t_min_part: Option<CutPart>,
    /// Neighbor boundary part producing the upper bound (detailed cut only).
    pub t_max_part: Option<CutPart>,
}

impl CurveHullCut {
    /// The intervals restricted to the hull segment's own domain.
    #[must_use]
    pub fn clamped(&self) -> Vec<[f64; 2]> {
        self.intervals
            .iter()
            .filter(|[lo, hi]| *hi >= 0.0 && *lo <= 1.0)
            .map(|[lo, hi]| [lo.clamp(0.0, 1.0), hi.clamp(0.0, 1.0)])
            .collect()
    }

    /// Overall `[min, max]` over all intervals.
    #[must_use]
    pub fn range(&self) -> Option<[f64; 2]> {
        let lo = self.intervals.iter().map(|i| i[0]).reduce(f64::min)?;
        let hi = self.intervals.iter().map(|i| i[1]).reduce(f64::max)?;
        Some([lo, hi])
    }

    fn push(&mut self, lo: f64, hi: f64) {
        self.intervals.push(ordered(lo, hi));
        self.intersects = true;
    }

    fn push_detailed(&mut self, cut: DetailedCut) {
        self.push(cut.t_min, cut.t_max);
        self.t_min_part = Some(cut.min_part);
        self.t_max_part = Some(cut.max_part);
    }
}

/// A hull and a neighbor hull, compared either in the XY plane or in 3D.
#[derive(Debug)]
pub enum SegmentPair<'a> {
    TwoD(SegmentPair2D<'a>),
    ThreeD(SegmentPair3D<'a>),
}

impl<'a> SegmentPair<'a> {
    #[must_use]
    pub fn create(hull: &'a SegmentHull, neighbor: &'a SegmentHull, is_3d: bool) -> Self {
        if is_3d {
            Self::ThreeD(SegmentPair3D::new(hull, neighbor))
        } else {
            Self::TwoD(SegmentPair2D::new(hull, neighbor))
        }
    }

    #[must_use]
    pub fn hull(&self) -> &'a SegmentHull {
        match self {
            Self::TwoD(p) => p.hull(),
            Self::ThreeD(p) => p.hull(),
        }
    }

    #[must_use]
    pub fn neighbor(&self) -> &'a SegmentHull {
        match self {
            Self::TwoD(p) => p.neighbor(),
            Self::ThreeD(p) => p.neighbor(),
        }
    }

    #[must_use]
    pub fn is_3d(&self) -> bool {
        matches!(self, Self::ThreeD(_))
    }

    /// Cuts the hull against the neighbor, using a [`TessellatingKernel`]
    /// with default options where a buffer is needed.
    ///
    /// # Errors
    ///
    /// See [`SegmentPair::cut_curve_hull_with`].
    pub fn cut_curve_hull(&self, tolerance: f64) -> Result<CurveHullCut> {
        self.cut_curve_hull_with(tolerance, &TessellatingKernel::default())
    }

    /// Cuts the hull against the neighbor.
    ///
    /// `tolerance` only drives the near classification and the coincidence
    /// test; the hull widths come from the offsets.
    ///
    /// # Errors
    ///
    /// - `GeometryError::ParameterOutOfRange` for a negative tolerance.
    /// - `GeometryError::Degenerate` if the hull segment has no length.
    /// - `HullError::UnsupportedCurvedHull` for a curved segment whose hulls
    ///   are not both round and symmetric.
    /// - `HullError::NonPlanarCut` in 3D, when the pair needs a planar cut
    ///   (curved segments, asymmetric or rectangular hulls) and does not lie
    ///   at one height.
    /// - Any error of `kernel`.
    pub fn cut_curve_hull_with<K: GeometryKernel + ?Sized>(
        &self,
        tolerance: f64,
        kernel: &K,
    ) -> Result<CurveHullCut> {
        let mut cut = self.classified(tolerance)?;
        let (hull, neighbor) = (self.hull(), self.neighbor());

        let round = hull.is_full_deflatable()
            && neighbor.is_full_deflatable()
            && hull.is_symmetric()
            && neighbor.is_symmetric();
        let linear = hull.segment().is_linear() && neighbor.segment().is_linear();

        if round {
            let radius = hull.max_offset() + neighbor.max_offset();
            if linear {
                debug!(radius, is_3d = self.is_3d(), "closed form capsule cut");
                let range = match self {
                    Self::TwoD(p) => p.cut_capsule(radius)?,
                    Self::ThreeD(p) => p.cut_capsule(radius)?,
                };
                if let Some([lo, hi]) = range {
                    cut.push(lo, hi);
                }
            } else {
                self.require_planar()?;
                debug!(radius, "curved segment, cutting with buffer");
                for [lo, hi] in fallback::cut_buffer(hull, neighbor, radius, tolerance, kernel)? {
                    cut.push(lo, hi);
                }
            }
            return Ok(cut);
        }

        self.require_linear()?;
        self.require_planar()?;
        debug!(
            deflate = hull.deflate_radius(),
            "detailed cut of hull boundaries"
        );
        if let Some(detailed) = detailed::cut_hulls(hull, neighbor)? {
            cut.push_detailed(detailed);
        }
        Ok(cut)
    }

    /// Cuts a band of width `|offset|` on one side of the hull segment
    /// (left for positive offsets) against the neighbor's hull. The hull's
    /// own offsets and caps are ignored.
    ///
    /// # Errors
    ///
    /// - `GeometryError::ParameterOutOfRange` for a negative tolerance.
    /// - `GeometryError::Degenerate` if the hull segment has no length.
    /// - `HullError::UnsupportedCurvedHull` if either segment is curved.
    /// - `HullError::NonPlanarCut` in 3D, unless both segments lie at one
    ///   height.
    pub fn cut_line_offset_hull(&self, offset: f64, tolerance: f64) -> Result<CurveHullCut> {
        let mut cut = self.classified(tolerance)?;
        self.require_linear()?;
        self.require_planar()?;
        debug!(offset, "one sided band cut");
        if let Some(detailed) = detailed::cut_offset_band(self.hull(), offset, self.neighbor())? {
            cut.push_detailed(detailed);
        }
        Ok(cut)
    }

    fn classified(&self, tolerance: f64) -> Result<CurveHullCut> {
        if tolerance < 0.0 || tolerance.is_nan() {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "tolerance",
                value: tolerance,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        let (hull, neighbor) = (self.hull().segment(), self.neighbor().segment());
        let (start, end) = hull.endpoints_2d();
        Ok(CurveHullCut {
            intervals: Vec::new(),
            hull_start_near: classify(&start, neighbor, tolerance),
            hull_end_near: classify(&end, neighbor, tolerance),
            coincident: is_coincident(hull, neighbor, tolerance, self.is_3d()),
            intersects: false,
            t_min_part: None,
            t_max_part: None,
        })
    }

    fn require_linear(&self) -> Result<()> {
        let curved = [self.hull().segment(), self.neighbor().segment()]
            .into_iter()
            .find(|s| !s.is_linear());
        match curved {
            None => Ok(()),
            Some(segment) => {
                warn!(
                    part = segment.part_index(),
                    segment = segment.segment_index(),
                    "curved segment needs round symmetric hulls"
                );
                Err(HullError::UnsupportedCurvedHull {
                    part_index: segment.part_index(),
                    segment_index: segment.segment_index(),
                }
                .into())
            }
        }
    }

    /// The buffer and detailed cuts work in the XY plane. In 3D they are
    /// exact only if all end points share the hull's start height.
    fn require_planar(&self) -> Result<()> {
        if !self.is_3d() {
            return Ok(());
        }
        let height = self.hull().segment().start(true).z;
        let off_plane = |z: f64| (z - height).abs() > TOLERANCE;
        let sloped = [self.hull().segment(), self.neighbor().segment()]
            .into_iter()
            .find(|s| off_plane(s.start(true).z) || off_plane(s.end(true).z));
        match sloped {
            None => Ok(()),
            Some(segment) => {
                warn!(
                    part = segment.part_index(),
                    segment = segment.segment_index(),
                    "planar cut requested for segments at different heights"
                );
                Err(HullError::NonPlanarCut {
                    part_index: segment.part_index(),
                    segment_index: segment.segment_index(),
                }
                .into())
            }
        }
    }
}

/// Range of `t` with `lo <= c0 + c1 * t <= hi`. A constant expression gives
/// the whole line or nothing.
pub(crate) fn linear_range(c0: f64, c1: f64, lo: f64, hi: f64) -> Option<[f64; 2]> {
    if c1.abs() <= EPS {
        return (c0 >= lo - EPS && c0 <= hi + EPS).then_some([f64::NEG_INFINITY, f64::INFINITY]);
    }
    let a = (lo - c0) / c1;
    let b = (hi - c0) / c1;
    Some([a.min(b), a.max(b)])
}

pub(crate) fn overlap(a: Option<[f64; 2]>, b: Option<[f64; 2]>) -> Option<[f64; 2]> {
    let ([a0, a1], [b0, b1]) = (a?, b?);
    let lo = a0.max(b0);
    let hi = a1.min(b1);
    (lo <= hi).then_some([lo, hi])
}

/// Smallest range containing all finite `ts`.
pub(crate) fn bounds(ts: &[f64]) -> Option<[f64; 2]> {
    ts.iter()
        .filter(|t| t.is_finite())
        .fold(None, |acc: Option<[f64; 2]>, &t| match acc {
            None => Some([t, t]),
            Some([lo, hi]) => Some([lo.min(t), hi.max(t)]),
        })
}

fn ordered(lo: f64, hi: f64) -> [f64; 2] {
    if lo > hi {
        trace!(lo, hi, "swapped inverted bounds");
        [hi, lo]
    } else {
        [lo, hi]
    }
}
