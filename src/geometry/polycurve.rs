use crate::error::{GeometryError, IndexError, Result};
use crate::geometry::segment::{ArcSegment, LinearSegment, Segment, SegmentProxy};
use crate::geometry::Aabb;
use crate::math::arc_2d::MIN_BULGE;
use crate::math::{Point2, Point3};

/// One part of a multipart curve: an ordered vertex sequence with
/// per-vertex bulges, optionally closed.
///
/// Coordinates are stored interleaved as `x, y, z`. The bulge of vertex `i`
/// describes the segment from vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePart {
    coords: Vec<f64>,
    bulges: Vec<f64>,
    closed: bool,
}

impl CurvePart {
    /// Creates a straight-segment part through `points`.
    #[must_use]
    pub fn new(points: &[Point3], closed: bool) -> Self {
        let coords = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        Self {
            coords,
            bulges: vec![0.0; points.len()],
            closed,
        }
    }

    /// Creates a straight-segment part through XY `points` with `z = 0`.
    #[must_use]
    pub fn from_xy(points: &[Point2], closed: bool) -> Self {
        let points: Vec<Point3> = points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
        Self::new(&points, closed)
    }

    /// Replaces the per-vertex bulges.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CountMismatch`] if `bulges` does not have one
    /// entry per vertex.
    pub fn with_bulges(mut self, bulges: Vec<f64>) -> Result<Self> {
        if bulges.len() != self.vertex_count() {
            return Err(GeometryError::CountMismatch {
                what: "bulges",
                expected: self.vertex_count(),
                actual: bulges.len(),
            }
            .into());
        }
        self.bulges = bulges;
        Ok(self)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.coords.len() / 3
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertex_count();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Interleaved `x, y, z` coordinates.
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Vertex `i`, or `None` past the last vertex.
    #[must_use]
    pub fn vertex(&self, i: usize) -> Option<Point3> {
        match self.coords.get(3 * i..3 * i + 3)? {
            &[x, y, z] => Some(Point3::new(x, y, z)),
            _ => None,
        }
    }

    /// Bulge of the segment starting at vertex `i`.
    #[must_use]
    pub fn bulge(&self, i: usize) -> f64 {
        self.bulges.get(i).copied().unwrap_or(0.0)
    }
}

/// A multipart curve: the input geometry segments are taken from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polycurve {
    parts: Vec<CurvePart>,
}

impl Polycurve {
    #[must_use]
    pub fn new(parts: Vec<CurvePart>) -> Self {
        Self { parts }
    }

    /// A single open straight-segment part through XY `points`.
    #[must_use]
    pub fn line_string(points: &[Point2]) -> Self {
        Self::new(vec![CurvePart::from_xy(points, false)])
    }

    #[must_use]
    pub fn parts(&self) -> &[CurvePart] {
        &self.parts
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Part `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::PartOutOfRange`] if the part does not exist.
    pub fn part(&self, index: usize) -> Result<&CurvePart> {
        self.parts.get(index).ok_or_else(|| {
            IndexError::PartOutOfRange {
                part: index,
                count: self.parts.len(),
            }
            .into()
        })
    }

    /// Total number of segments over all parts.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.parts.iter().map(CurvePart::segment_count).sum()
    }

    /// Creates the proxy for segment `segment_index` of part `part_index`.
    ///
    /// Bulged segments become [`ArcSegment`]s, all others
    /// [`LinearSegment`]s read directly from the coordinate array.
    ///
    /// # Errors
    ///
    /// Returns an error if the part or segment does not exist.
    pub fn segment(&self, part_index: usize, segment_index: usize) -> Result<Segment> {
        let part = self.part(part_index)?;
        let count = part.segment_count();
        if segment_index >= count {
            return Err(IndexError::SegmentOutOfRange {
                part: part_index,
                segment: segment_index,
                count,
            }
            .into());
        }
        let out_of_range = || IndexError::SegmentOutOfRange {
            part: part_index,
            segment: segment_index,
            count,
        };
        let i = segment_index;
        let j = (i + 1) % part.vertex_count();
        let bulge = part.bulge(i);
        if bulge.abs() >= MIN_BULGE {
            let (start, end) = part.vertex(i).zip(part.vertex(j)).ok_or_else(out_of_range)?;
            if let Some(arc) = ArcSegment::new(part_index, segment_index, start, end, bulge) {
                return Ok(arc.into());
            }
        }
        let linear = LinearSegment::from_coords(part_index, segment_index, part.coords(), i, j)
            .ok_or_else(out_of_range)?;
        Ok(linear.into())
    }

    /// All segments in part/segment order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.parts.iter().enumerate().flat_map(move |(p, part)| {
            (0..part.segment_count()).filter_map(move |s| self.segment(p, s).ok())
        })
    }

    /// Bounding box over all segment extents, or `None` for an empty curve.
    #[must_use]
    pub fn envelope(&self) -> Option<Aabb> {
        self.segments()
            .map(|s| s.extent())
            .reduce(|a, b| a.union(&b))
    }
}
