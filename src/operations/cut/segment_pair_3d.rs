use std::cell::OnceCell;

use super::{bounds, linear_range, overlap};
use crate::error::{GeometryError, Result};
use crate::geometry::SegmentProxy;
use crate::hull::sweep::EPS;
use crate::hull::SegmentHull;
use crate::math::{solve_quadratic, Lin3D, LinPair3D, Point3};

/// A hull and a neighbor compared in 3D.
///
/// The capsule solution runs in 3D; cuts that need the hull boundary run
/// on the XY projection.
#[derive(Debug)]
pub struct SegmentPair3D<'a> {
    hull: &'a SegmentHull,
    neighbor: &'a SegmentHull,
    lin_pair: OnceCell<Option<LinPair3D>>,
}

fn endpoints(hull: &SegmentHull) -> (Point3, Point3) {
    (hull.segment().start(true), hull.segment().end(true))
}

impl<'a> SegmentPair3D<'a> {
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
    pub fn lin_pair(&self) -> Option<&LinPair3D> {
        self.lin_pair
            .get_or_init(|| {
                let (a0, a1) = endpoints(self.hull);
                let (b0, b1) = endpoints(self.neighbor);
                if (a1 - a0).norm() <= EPS || (b1 - b0).norm() <= EPS {
                    return None;
                }
                Some(LinPair3D::new(Lin3D::new(a0, a1), Lin3D::new(b0, b1)))
            })
            .as_ref()
    }

    /// Parameter range on the hull's carrier line within `radius` of the
    /// neighbor segment: two spheres at its ends and the cylinder between.
    pub(crate) fn cut_capsule(&self, radius: f64) -> Result<Option<[f64; 2]>> {
        let (a0, a1) = endpoints(self.hull);
        if (a1 - a0).norm() <= EPS {
            return Err(GeometryError::Degenerate(format!(
                "segment {} of part {} has no length",
                self.hull.segment().segment_index(),
                self.hull.segment().part_index()
            ))
            .into());
        }
        let pair = self.lin_pair();
        if let Some(pair) = pair {
            if pair.segment_distance() - radius > EPS {
                return Ok(None);
            }
        }
        let lin = Lin3D::new(a0, a1);
        let (b0, b1) = endpoints(self.neighbor);
        let (ps, l) = (lin.ps(), lin.l());

        let mut ts = Vec::new();
        for c in [b0, b1] {
            let f = ps - c;
            ts.extend(solve_quadratic(lin.l2(), 2.0 * l.dot(&f), f.norm_squared() - radius * radius));
        }

        if let Some(pair) = pair {
            let lb = pair.l1().l();
            let lb2 = pair.l1().l2();
            let f = ps - b0;
            // Distance to the axis: |c0 + t * c1| = radius * |lb|.
            let c0 = f.cross(&lb);
            let c1 = pair.cross();
            let rr = radius * radius * lb2;
            let across = if pair.is_parallel() {
                (c0.norm_squared() <= rr).then_some([f64::NEG_INFINITY, f64::INFINITY])
            } else {
                let roots = solve_quadratic(pair.cross_length2(), 2.0 * c0.dot(&c1), c0.norm_squared() - rr);
                match (roots.first(), roots.last()) {
                    (Some(&lo), Some(&hi)) => Some([lo, hi]),
                    _ => None,
                }
            };
            let along = linear_range(f.dot(&lb) / lb2, l.dot(&lb) / lb2, 0.0, 1.0);
            if let Some([lo, hi]) = overlap(across, along) {
                ts.extend([lo, hi]);
            }
        }
        Ok(bounds(&ts))
    }
}
