use std::cell::OnceCell;

use super::{bounds, linear_range, overlap};
use crate::error::Result;
use crate::hull::sweep::EPS;
use crate::hull::SegmentHull;
use crate::math::intersect_2d::line_circle_params;
use crate::math::{Lin2D, LinPair2D};

/// A hull and a neighbor compared in the XY plane.
#[derive(Debug)]
pub struct SegmentPair2D<'a> {
    hull: &'a SegmentHull,
    neighbor: &'a SegmentHull,
    lin_pair: OnceCell<Option<LinPair2D>>,
}

impl<'a> SegmentPair2D<'a> {
    #[must_use]
    pub fn new(hull: &'a SegmentHull, neighbor: &'a SegmentHull) -> Self {
        Self {
            hull,
            neighbor,
            lin_pair: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn hull(&self) -> &'a SegmentHull {
        self.hull
    }

    #[must_use]
    pub fn neighbor(&self) -> &'a SegmentHull {
        self.neighbor
    }

    /// The chords of both segments, or `None` if either has no length.
    #[must_use]
    pub fn lin_pair(&self) -> Option<&LinPair2D> {
        self.lin_pair
            .get_or_init(|| {
                let (a0, a1) = self.hull.segment().endpoints_2d();
                let (b0, b1) = self.neighbor.segment().endpoints_2d();
                if (a1 - a0).norm() <= EPS || (b1 - b0).norm() <= EPS {
                    return None;
                }
                Some(LinPair2D::new(Lin2D::new(a0, a1), Lin2D::new(b0, b1)))
            })
            .as_ref()
    }

    /// Parameter range on the hull's carrier line within `radius` of the
    /// neighbor segment.
    ///
    /// The range is the carrier line cut with the capsule of `radius`
    /// around the neighbor: two discs at its ends and the band between.
    pub(crate) fn cut_capsule(&self, radius: f64) -> Result<Option<[f64; 2]>> {
        let lin = self.hull.centerline()?;
        if let Some(pair) = self.lin_pair() {
            if pair.segment_distance() - radius > EPS {
                return Ok(None);
            }
        }
        let (b0, b1) = self.neighbor.segment().endpoints_2d();
        let (ps, l) = (lin.ps(), lin.l());
        let mut ts = line_circle_params(&ps, &l, &b0, radius);
        ts.extend(line_circle_params(&ps, &l, &b1, radius));

        if (b1 - b0).norm() > EPS {
            let neighbor = Lin2D::new(b0, b1);
            let normal = neighbor.left_normal();
            let across = linear_range(neighbor.signed_distance(&ps), l.dot(&normal), -radius, radius);
            let along = linear_range(neighbor.project(&ps), l.dot(&neighbor.l()) / neighbor.l2(), 0.0, 1.0);
            if let Some([lo, hi]) = overlap(across, along) {
                ts.extend([lo, hi]);
            }
        }
        Ok(bounds(&ts))
    }
}
