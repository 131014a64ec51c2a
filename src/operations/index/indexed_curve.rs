use tracing::{debug, instrument};

use super::box_tree::{BoxTree, BoxTreeConfig};
use crate::error::{GeometryError, IndexError, Result};
use crate::geometry::{Aabb, Pline, PlineVertex, Polycurve, Segment, SegmentProxy};

/// Position of a segment within its curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub part: usize,
    pub segment: usize,
}

impl SegmentKey {
    #[must_use]
    pub fn new(part: usize, segment: usize) -> Self {
        Self { part, segment }
    }

    #[must_use]
    pub fn of(segment: &Segment) -> Self {
        Self::new(segment.part_index(), segment.segment_index())
    }
}

/// A local segment and the segments of another curve near it.
#[derive(Debug)]
pub struct SegmentNeighborhood<'a> {
    pub segment: &'a Segment,
    pub neighbors: Vec<&'a Segment>,
}

/// A curve with a box tree over the extents of its segments.
#[derive(Debug)]
pub struct IndexedCurve {
    curve: Polycurve,
    segments: Vec<Segment>,
    part_starts: Vec<usize>,
    envelope: Aabb,
    tree: BoxTree<usize>,
}

impl IndexedCurve {
    /// Indexes `curve` with the default tree configuration.
    ///
    /// # Errors
    ///
    /// See [`IndexedCurve::with_config`].
    pub fn new(curve: Polycurve, tolerance: f64) -> Result<Self> {
        Self::with_config(curve, tolerance, BoxTreeConfig::default())
    }

    /// Indexes every segment of `curve` by its extent. The tree covers the
    /// curve's envelope grown by `tolerance`.
    ///
    /// # Errors
    ///
    /// - [`IndexError::EmptyCurve`] if the curve has no segments.
    /// - `GeometryError::ParameterOutOfRange` for a negative tolerance.
    #[instrument(skip_all, fields(tolerance = tolerance, segments = curve.segment_count()))]
    pub fn with_config(curve: Polycurve, tolerance: f64, config: BoxTreeConfig) -> Result<Self> {
        check_distance("tolerance", tolerance)?;
        let envelope = curve.envelope().ok_or(IndexError::EmptyCurve)?;
        let mut tree = BoxTree::new(envelope.expanded(tolerance), config);
        let mut part_starts = Vec::with_capacity(curve.part_count());
        let mut segments = Vec::with_capacity(curve.segment_count());
        for (p, part) in curve.parts().iter().enumerate() {
            part_starts.push(segments.len());
            for s in 0..part.segment_count() {
                let segment = curve.segment(p, s)?;
                tree.insert(segment.extent(), segments.len());
                segments.push(segment);
            }
        }
        debug!(tiles = tree.tile_count(), "indexed curve");
        Ok(Self {
            curve,
            segments,
            part_starts,
            envelope,
            tree,
        })
    }

    #[must_use]
    pub fn curve(&self) -> &Polycurve {
        &self.curve
    }

    #[must_use]
    pub fn envelope(&self) -> Aabb {
        self.envelope
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments in part/segment order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments whose extent intersects `query`, in part/segment order.
    #[must_use]
    pub fn segments_in(&self, query: &Aabb) -> Vec<&Segment> {
        let mut found: Vec<usize> = self.tree.search(query).into_iter().map(|(_, i)| *i).collect();
        found.sort_unstable();
        found.into_iter().map(|i| &self.segments[i]).collect()
    }

    /// # Errors
    ///
    /// Returns an error if the part or segment does not exist.
    pub fn segment(&self, part: usize, segment: usize) -> Result<&Segment> {
        let count = self.part_segment_count(part)?;
        if segment >= count {
            return Err(IndexError::SegmentOutOfRange {
                part,
                segment,
                count,
            }
            .into());
        }
        Ok(&self.segments[self.part_starts[part] + segment])
    }

    /// # Errors
    ///
    /// Returns [`IndexError::PartOutOfRange`] if the part does not exist.
    pub fn part_segment_count(&self, part: usize) -> Result<usize> {
        Ok(self.curve.part(part)?.segment_count())
    }

    /// # Errors
    ///
    /// Returns [`IndexError::PartOutOfRange`] if the part does not exist.
    pub fn is_part_closed(&self, part: usize) -> Result<bool> {
        Ok(self.curve.part(part)?.is_closed())
    }

    /// For each segment inside `common_box`, the segments of `other` whose
    /// extent lies within `search_distance` of its extent. Segments without
    /// candidates are left out.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for a negative search
    /// distance.
    #[instrument(skip_all, fields(search_distance = search_distance))]
    pub fn try_segment_neighborhoods<'a>(
        &'a self,
        other: &'a IndexedCurve,
        common_box: &Aabb,
        search_distance: f64,
    ) -> Result<Vec<SegmentNeighborhood<'a>>> {
        check_distance("search_distance", search_distance)?;
        let neighborhoods: Vec<_> = self
            .segments_in(common_box)
            .into_iter()
            .filter_map(|segment| {
                let neighbors = other.segments_in(&segment.extent().expanded(search_distance));
                (!neighbors.is_empty()).then_some(SegmentNeighborhood { segment, neighbors })
            })
            .collect();
        debug!(count = neighborhoods.len(), "segment neighborhoods");
        Ok(neighborhoods)
    }

    /// The piece of `part` from `start_fraction` on segment `start_segment`
    /// to `end_fraction` on segment `end_segment`.
    ///
    /// On closed parts an end before the start wraps over the closing
    /// vertex.
    ///
    /// # Errors
    ///
    /// - Index errors for unknown parts or segments.
    /// - `GeometryError::ParameterOutOfRange` for fractions outside `[0, 1]`.
    /// - `GeometryError::InvalidFractionRange` if the end lies before the
    ///   start on an open part.
    pub fn subpart(
        &self,
        part: usize,
        start_segment: usize,
        start_fraction: f64,
        end_segment: usize,
        end_fraction: f64,
    ) -> Result<Pline> {
        check_fraction("start_fraction", start_fraction)?;
        check_fraction("end_fraction", end_fraction)?;
        let count = self.part_segment_count(part)?;
        self.segment(part, start_segment)?;
        self.segment(part, end_segment)?;

        let forward = (start_segment, start_fraction) <= (end_segment, end_fraction);
        let indices: Vec<usize> = if forward {
            (start_segment..=end_segment).collect()
        } else if self.is_part_closed(part)? {
            (start_segment..count).chain(0..=end_segment).collect()
        } else {
            return Err(GeometryError::InvalidFractionRange {
                from: position(start_segment, start_fraction),
                to: position(end_segment, end_fraction),
            }
            .into());
        };

        let last = indices.len() - 1;
        let mut vertices = Vec::with_capacity(indices.len() + 1);
        let mut end = None;
        for (n, &i) in indices.iter().enumerate() {
            let from = if n == 0 { start_fraction } else { 0.0 };
            let to = if n == last { end_fraction } else { 1.0 };
            let piece = self.segment(part, i)?.sub_curve(from, to)?;
            let (s, e) = piece.endpoints_2d();
            vertices.push(PlineVertex::new(s.x, s.y, piece.bulge()));
            end = Some(e);
        }
        if let Some(e) = end {
            vertices.push(PlineVertex::line(e.x, e.y));
        }
        Ok(Pline::new(vertices, false))
    }
}

#[allow(clippy::cast_precision_loss)]
fn position(segment: usize, fraction: f64) -> f64 {
    segment as f64 + fraction
}

fn check_distance(parameter: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        return Ok(());
    }
    Err(GeometryError::ParameterOutOfRange {
        parameter,
        value,
        min: 0.0,
        max: f64::INFINITY,
    }
    .into())
}

fn check_fraction(parameter: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(GeometryError::ParameterOutOfRange {
        parameter,
        value,
        min: 0.0,
        max: 1.0,
    }
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CurvePart;
    use crate::math::{Point2, Point3};

    fn square(closed: bool) -> Polycurve {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        Polycurve::new(vec![CurvePart::from_xy(&pts, closed)])
    }

    fn bx(x0: f64, y0: f64, x1: f64, y1: f64) -> Aabb {
        Aabb::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    #[test]
    fn empty_curve_is_rejected() {
        assert!(IndexedCurve::new(Polycurve::default(), 0.1).is_err());
        assert!(IndexedCurve::new(square(false), -1.0).is_err());
    }

    #[test]
    fn range_query_is_sorted() {
        let index = IndexedCurve::new(square(true), 0.1).unwrap();
        assert_eq!(index.len(), 4);
        let keys: Vec<_> = index
            .segments_in(&bx(-1.0, -1.0, 1.0, 1.0))
            .into_iter()
            .map(SegmentKey::of)
            .collect();
        assert_eq!(keys, vec![SegmentKey::new(0, 0), SegmentKey::new(0, 3)]);
        assert!(index.is_part_closed(0).unwrap());
        assert_eq!(index.part_segment_count(0).unwrap(), 4);
        assert!(index.segment(0, 4).is_err());
        assert!(index.segment(1, 0).is_err());
    }

    #[test]
    fn arc_extent_is_indexed() {
        let part = CurvePart::new(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)],
            false,
        )
        .with_bulges(vec![-1.0, 0.0])
        .unwrap();
        let index = IndexedCurve::new(Polycurve::new(vec![part]), 0.0).unwrap();
        // The apex at (5, 5) is only covered by the true arc extent.
        assert_eq!(index.segments_in(&bx(4.0, 4.5, 6.0, 6.0)).len(), 1);
        assert!((index.envelope().max.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn neighborhoods_within_search_distance() {
        let a = IndexedCurve::new(Polycurve::line_string(&[Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(20.0, 0.0)]), 0.0).unwrap();
        let b = IndexedCurve::new(Polycurve::line_string(&[Point2::new(0.0, 1.0), Point2::new(5.0, 1.0)]), 0.0).unwrap();
        let common = a.envelope().union(&b.envelope());
        let near = a.try_segment_neighborhoods(&b, &common, 1.5).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(SegmentKey::of(near[0].segment), SegmentKey::new(0, 0));
        assert_eq!(near[0].neighbors.len(), 1);
        assert!(a.try_segment_neighborhoods(&b, &common, 0.5).unwrap().is_empty());
        assert!(a.try_segment_neighborhoods(&b, &common, -0.5).is_err());
    }

    #[test]
    fn subpart_spans_segments() {
        let index = IndexedCurve::new(square(false), 0.0).unwrap();
        let sub = index.subpart(0, 0, 0.5, 2, 0.5).unwrap();
        let pts: Vec<_> = sub.vertices.iter().map(PlineVertex::point).collect();
        assert_eq!(
            pts,
            vec![
                Point2::new(5.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(5.0, 10.0),
            ]
        );
        assert!(index.subpart(0, 2, 0.5, 0, 0.5).is_err());
        assert!(index.subpart(0, 0, 1.5, 1, 0.5).is_err());
    }

    #[test]
    fn subpart_wraps_closed_parts() {
        let index = IndexedCurve::new(square(true), 0.0).unwrap();
        let sub = index.subpart(0, 3, 0.5, 0, 0.5).unwrap();
        let pts: Vec<_> = sub.vertices.iter().map(PlineVertex::point).collect();
        assert_eq!(
            pts,
            vec![Point2::new(0.0, 5.0), Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)]
        );
        assert!((sub.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn subpart_keeps_arc_bulge() {
        let part = CurvePart::new(
            &[
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
            ],
            false,
        )
        .with_bulges(vec![-1.0, 0.0, 0.0])
        .unwrap();
        let index = IndexedCurve::new(Polycurve::new(vec![part]), 0.0).unwrap();
        let sub = index.subpart(0, 0, 0.5, 1, 1.0).unwrap();
        assert_eq!(sub.vertices.len(), 3);
        // Quarter of a clockwise circle.
        let quarter = -(std::f64::consts::PI / 8.0).tan();
        assert!((sub.vertices[0].bulge - quarter).abs() < 1e-12);
        assert!((sub.vertices[0].point() - Point2::new(0.0, 1.0)).norm() < 1e-12);
        assert!(sub.vertices[1].bulge.abs() < 1e-12);
    }
}
