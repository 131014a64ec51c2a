use crate::math::arc_2d::{BulgeArc, MIN_BULGE};
use crate::math::{Point2, Vector2};

/// Bulge-encoded polyline vertex for mixed line/arc segments.
///
/// `bulge = tan(sweep_angle / 4)`:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PlineVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// A polyline with mixed straight-line and circular-arc segments.
///
/// This is the concrete curve handed to a geometry kernel. For closed
/// polylines the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Pline {
    #[must_use]
    pub fn new(vertices: Vec<PlineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// Creates a line-only polyline through `points`.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let vertices = points.iter().map(|p| PlineVertex::line(p.x, p.y)).collect();
        Self { vertices, closed }
    }

    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Start and end vertex of segment `i`; the start carries the bulge.
    #[must_use]
    pub fn segment(&self, i: usize) -> (PlineVertex, PlineVertex) {
        let n = self.vertices.len();
        (self.vertices[i], self.vertices[(i + 1) % n])
    }

    /// Arc form of segment `i`, or `None` if it is straight.
    #[must_use]
    pub fn segment_arc(&self, i: usize) -> Option<BulgeArc> {
        let (v0, v1) = self.segment(i);
        BulgeArc::from_bulge(&v0.point(), &v1.point(), v0.bulge)
    }

    #[must_use]
    pub fn segment_length(&self, i: usize) -> f64 {
        match self.segment_arc(i) {
            Some(arc) => arc.length(),
            None => {
                let (v0, v1) = self.segment(i);
                (v1.point() - v0.point()).norm()
            }
        }
    }

    /// Total length along lines and arcs.
    #[must_use]
    pub fn length(&self) -> f64 {
        (0..self.segment_count()).map(|i| self.segment_length(i)).sum()
    }

    /// Whether every segment is straight.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        (0..self.segment_count()).all(|i| self.vertices[i].bulge.abs() < MIN_BULGE)
    }

    /// Locates the length `fraction` (clamped to `[0, 1]`) as a segment
    /// index and a parameter within that segment.
    fn locate(&self, fraction: f64) -> Option<(usize, f64)> {
        let count = self.segment_count();
        if count == 0 {
            return None;
        }
        let total = self.length();
        if total <= 0.0 {
            return Some((0, 0.0));
        }
        let mut remaining = fraction.clamp(0.0, 1.0) * total;
        for i in 0..count {
            let len = self.segment_length(i);
            if remaining <= len || i + 1 == count {
                let t = if len > 0.0 { (remaining / len).min(1.0) } else { 0.0 };
                return Some((i, t));
            }
            remaining -= len;
        }
        None
    }

    /// Point at the given length fraction.
    #[must_use]
    pub fn point_at(&self, fraction: f64) -> Option<Point2> {
        let (i, t) = self.locate(fraction)?;
        Some(match self.segment_arc(i) {
            Some(arc) => arc.point_at(t),
            None => {
                let (v0, v1) = self.segment(i);
                v0.point() + (v1.point() - v0.point()) * t
            }
        })
    }

    /// Unit tangent at the given length fraction.
    #[must_use]
    pub fn tangent_at(&self, fraction: f64) -> Option<Vector2> {
        let (i, t) = self.locate(fraction)?;
        match self.segment_arc(i) {
            Some(arc) => Some(arc.tangent_at(t)),
            None => {
                let (v0, v1) = self.segment(i);
                (v1.point() - v0.point()).try_normalize(0.0)
            }
        }
    }

    /// Tessellates into stations `(point, length fraction)`, approximating
    /// arcs within `max_deviation`.
    #[must_use]
    pub fn stations(&self, max_deviation: f64) -> Vec<(Point2, f64)> {
        let count = self.segment_count();
        if count == 0 {
            return self.vertices.iter().map(|v| (v.point(), 0.0)).collect();
        }
        let total = self.length();
        let frac = |along: f64| if total > 0.0 { along / total } else { 0.0 };

        let mut out = Vec::with_capacity(count + 1);
        out.push((self.vertices[0].point(), 0.0));
        let mut along = 0.0;
        for i in 0..count {
            let (_, v1) = self.segment(i);
            let len = self.segment_length(i);
            if let Some(arc) = self.segment_arc(i) {
                let n_sub = arc.subdivision_count(max_deviation);
                for j in 1..n_sub {
                    let t = f64::from(j) / f64::from(n_sub);
                    out.push((arc.point_at(t), frac(along + len * t)));
                }
            }
            along += len;
            out.push((v1.point(), frac(along)));
        }
        if let Some(last) = out.last_mut() {
            last.1 = 1.0;
        }
        out
    }

    /// Returns a new polyline with vertices in reverse order and negated bulges.
    ///
    /// For a segment `v[i] → v[i+1]` with bulge `b`, the reversed segment
    /// `v[i+1] → v[i]` has bulge `-b`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let m = self.vertices.len();
        if m == 0 {
            return self.clone();
        }
        let vertices = (0..m)
            .map(|j| {
                let v = self.vertices[m - 1 - j];
                let bulge = if j + 1 < m {
                    -self.vertices[m - 2 - j].bulge
                } else if self.closed {
                    -self.vertices[m - 1].bulge
                } else {
                    0.0
                };
                PlineVertex::new(v.x, v.y, bulge)
            })
            .collect();
        Self {
            vertices,
            closed: self.closed,
        }
    }
}
