use std::cmp::Ordering;

use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;
use crate::operations::index::SegmentKey;

/// A fraction range of one segment covered by a neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPart {
    pub part_index: usize,
    pub segment_index: usize,
    pub min_fraction: f64,
    pub max_fraction: f64,
    /// The covering neighbor coincides with the segment.
    pub complete: bool,
    /// Source segment of the same curve that produced this part.
    pub near_self: Option<SegmentKey>,
}

impl SegmentPart {
    /// # Errors
    ///
    /// - `GeometryError::ParameterOutOfRange` for fractions outside `[0, 1]`.
    /// - `GeometryError::InvalidFractionRange` if `min > max`.
    pub fn new(key: SegmentKey, min_fraction: f64, max_fraction: f64, complete: bool) -> Result<Self> {
        for (parameter, value) in [("min_fraction", min_fraction), ("max_fraction", max_fraction)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: 1.0,
                }
                .into());
            }
        }
        if min_fraction > max_fraction {
            return Err(GeometryError::InvalidFractionRange {
                from: min_fraction,
                to: max_fraction,
            }
            .into());
        }
        Ok(Self {
            part_index: key.part,
            segment_index: key.segment,
            min_fraction,
            max_fraction,
            complete,
            near_self: None,
        })
    }

    #[must_use]
    pub fn with_near_self(mut self, source: SegmentKey) -> Self {
        self.near_self = Some(source);
        self
    }

    #[must_use]
    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(self.part_index, self.segment_index)
    }

    /// Segment index plus the lower fraction: a position along the part.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn full_min(&self) -> f64 {
        self.segment_index as f64 + self.min_fraction
    }

    /// Segment index plus the upper fraction.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn full_max(&self) -> f64 {
        self.segment_index as f64 + self.max_fraction
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.max_fraction - self.min_fraction
    }

    /// Order by part, segment and lower fraction.
    #[must_use]
    pub fn cmp_position(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then(self.min_fraction.total_cmp(&other.min_fraction))
    }
}

/// Parts of one segment covered by neighbors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentParts {
    parts: Vec<SegmentPart>,
    complete: bool,
}

impl SegmentParts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: SegmentPart) {
        self.parts.push(part);
    }

    #[must_use]
    pub fn parts(&self) -> &[SegmentPart] {
        &self.parts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether the segment was found fully covered by the last
    /// [`SegmentParts::update_complete`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn update_complete(&mut self) -> bool {
        self.complete = Self::verify_complete(&self.parts);
        self.complete
    }

    /// Whether the merged fraction ranges of `parts` cover `[0, 1]` without
    /// a gap.
    #[must_use]
    pub fn verify_complete(parts: &[SegmentPart]) -> bool {
        let mut ranges: Vec<(f64, f64)> = parts.iter().map(|p| (p.min_fraction, p.max_fraction)).collect();
        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut covered = 0.0;
        for (lo, hi) in ranges {
            if lo > covered + TOLERANCE {
                return false;
            }
            covered = f64::max(covered, hi);
        }
        covered >= 1.0 - TOLERANCE
    }

    pub fn drop_zero_length_parts(&mut self) {
        self.parts.retain(|p| p.length() > TOLERANCE);
    }

    /// Sorts the parts by [`SegmentPart::cmp_position`].
    pub fn sort(&mut self) {
        self.parts.sort_by(SegmentPart::cmp_position);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn part(min: f64, max: f64) -> SegmentPart {
        SegmentPart::new(SegmentKey::new(0, 2), min, max, false).unwrap()
    }

    #[test]
    fn new_validates_fractions() {
        assert!(SegmentPart::new(SegmentKey::new(0, 0), -0.1, 0.5, false).is_err());
        assert!(SegmentPart::new(SegmentKey::new(0, 0), 0.6, 0.5, false).is_err());
        let p = part(0.25, 0.5);
        assert!((p.full_min() - 2.25).abs() < 1e-12);
        assert!((p.full_max() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn completeness_needs_gapless_cover() {
        assert!(SegmentParts::verify_complete(&[part(0.4, 1.0), part(0.0, 0.5)]));
        assert!(SegmentParts::verify_complete(&[part(0.0, 1.0)]));
        assert!(!SegmentParts::verify_complete(&[part(0.0, 0.4), part(0.5, 1.0)]));
        assert!(!SegmentParts::verify_complete(&[part(0.1, 1.0)]));
        assert!(!SegmentParts::verify_complete(&[part(0.0, 0.9)]));
        assert!(!SegmentParts::verify_complete(&[]));
    }

    #[test]
    fn parts_track_completeness() {
        let mut parts = SegmentParts::new();
        parts.push(part(0.5, 1.0));
        assert!(!parts.update_complete());
        parts.push(part(0.0, 0.5));
        parts.push(part(0.3, 0.3));
        assert!(parts.update_complete());
        parts.drop_zero_length_parts();
        assert_eq!(parts.len(), 2);
        parts.sort();
        assert!(parts.parts()[0].min_fraction < parts.parts()[1].min_fraction);
    }

    #[test]
    fn position_order() {
        let a = SegmentPart::new(SegmentKey::new(0, 1), 0.9, 1.0, false).unwrap();
        let b = SegmentPart::new(SegmentKey::new(0, 2), 0.0, 0.1, false).unwrap();
        let c = SegmentPart::new(SegmentKey::new(1, 0), 0.0, 0.1, false).unwrap();
        assert_eq!(a.cmp_position(&b), Ordering::Less);
        assert_eq!(c.cmp_position(&b), Ordering::Greater);
    }
}
