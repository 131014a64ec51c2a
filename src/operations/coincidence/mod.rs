//! Collecting which parts of a curve's segments lie near another curve.

mod segment_part;

pub use segment_part::{SegmentPart, SegmentParts};

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{GeometryError, Result};
use crate::geometry::{Segment, SegmentProxy};
use crate::hull::SegmentHull;
use crate::math::TOLERANCE;
use crate::operations::cut::SegmentPair;
use crate::operations::index::{IndexedCurve, SegmentKey};

/// Hull widths around source and neighbor segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearDistances {
    source: f64,
    neighbor: f64,
}

impl NearDistances {
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if a distance is
    /// negative or not finite.
    pub fn new(source: f64, neighbor: f64) -> Result<Self> {
        for (parameter, value) in [("source", source), ("neighbor", neighbor)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                }
                .into());
            }
        }
        Ok(Self { source, neighbor })
    }

    #[must_use]
    pub fn source(&self) -> f64 {
        self.source
    }

    #[must_use]
    pub fn neighbor(&self) -> f64 {
        self.neighbor
    }

    /// Largest distance at which hulls can touch.
    #[must_use]
    pub fn max_near(&self) -> f64 {
        self.source + self.neighbor
    }
}

/// Covered parts per source segment.
pub type CoveredParts = BTreeMap<SegmentKey, SegmentParts>;

/// Finds the parts of a source curve's segments covered by round hulls
/// around a neighbor curve.
#[derive(Debug)]
pub struct NeighborhoodFinder<'a> {
    source: &'a IndexedCurve,
    neighbor: &'a IndexedCurve,
    distances: NearDistances,
    tolerance: f64,
    is_3d: bool,
}

impl<'a> NeighborhoodFinder<'a> {
    #[must_use]
    pub fn new(source: &'a IndexedCurve, neighbor: &'a IndexedCurve, distances: NearDistances) -> Self {
        Self {
            source,
            neighbor,
            distances,
            tolerance: 0.0,
            is_3d: false,
        }
    }

    /// Searches the source curve against itself.
    #[must_use]
    pub fn new_self(curve: &'a IndexedCurve, distances: NearDistances) -> Self {
        Self::new(curve, curve, distances)
    }

    /// Tolerance for the coincidence test of segment pairs.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn in_3d(mut self, is_3d: bool) -> Self {
        self.is_3d = is_3d;
        self
    }

    /// Covered parts of every source segment near the neighbor curve.
    ///
    /// A segment stops collecting parts once it is completely covered.
    ///
    /// # Errors
    ///
    /// Returns any error of the index queries or the hull cuts.
    pub fn find(&self) -> Result<CoveredParts> {
        let max_near = self.distances.max_near();
        let common = self
            .source
            .envelope()
            .expanded(max_near)
            .intersection(&self.neighbor.envelope().expanded(max_near));
        let mut covered = CoveredParts::new();
        let Some(common) = common else {
            return Ok(covered);
        };
        for hood in self.source.try_segment_neighborhoods(self.neighbor, &common, max_near)? {
            self.cover(hood.segment, hood.neighbors, &mut covered, false)?;
        }
        finish(&mut covered);
        Ok(covered)
    }

    /// Covered parts of every source segment near other segments of the
    /// same curve. The segment itself and its direct neighbors in the part
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns any error of the index queries or the hull cuts.
    pub fn find_self(&self) -> Result<CoveredParts> {
        let max_near = self.distances.max_near();
        let mut covered = CoveredParts::new();
        for segment in self.source.segments() {
            let mut candidates = Vec::new();
            for other in self.source.segments_in(&segment.extent().expanded(max_near)) {
                if !self.is_direct_neighbor(segment, other)? {
                    candidates.push(other);
                }
            }
            self.cover(segment, candidates, &mut covered, true)?;
        }
        finish(&mut covered);
        Ok(covered)
    }

    fn cover(
        &self,
        segment: &Segment,
        neighbors: Vec<&Segment>,
        covered: &mut CoveredParts,
        near_self: bool,
    ) -> Result<()> {
        let key = SegmentKey::of(segment);
        if segment.length() <= TOLERANCE {
            trace!(?key, "skipped segment without length");
            return Ok(());
        }
        let parts = covered.entry(key).or_default();
        if parts.is_complete() {
            return Ok(());
        }
        let hull = SegmentHull::round(segment.clone(), self.distances.source())?;
        let search = segment.extent().expanded(self.distances.max_near());
        for other in neighbors {
            if !search.intersects(&other.extent()) {
                continue;
            }
            let neighbor = SegmentHull::round(other.clone(), self.distances.neighbor())?;
            let cut = SegmentPair::create(&hull, &neighbor, self.is_3d).cut_curve_hull(self.tolerance)?;
            for [lo, hi] in cut.clamped() {
                let part = SegmentPart::new(key, lo, hi, cut.coincident)?;
                parts.push(if near_self {
                    part.with_near_self(SegmentKey::of(other))
                } else {
                    part
                });
            }
            if parts.update_complete() {
                debug!(?key, "segment completely covered");
                break;
            }
        }
        Ok(())
    }

    fn is_direct_neighbor(&self, segment: &Segment, other: &Segment) -> Result<bool> {
        if segment.part_index() != other.part_index() {
            return Ok(false);
        }
        let (a, b) = (segment.segment_index(), other.segment_index());
        if a.abs_diff(b) <= 1 {
            return Ok(true);
        }
        let part = segment.part_index();
        if !self.source.is_part_closed(part)? {
            return Ok(false);
        }
        let last = self.source.part_segment_count(part)?.saturating_sub(1);
        Ok(a.min(b) == 0 && a.max(b) == last)
    }
}

fn finish(covered: &mut CoveredParts) {
    covered.retain(|_, parts| {
        parts.drop_zero_length_parts();
        parts.sort();
        !parts.is_empty()
    });
}
