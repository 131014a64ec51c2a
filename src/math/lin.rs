//! Directed line primitives with lazily cached derived quantities.
//!
//! A `Lin` is a start point plus a direction vector `l = pe - ps`; the
//! parameter `t` runs from `0` at `ps` to `1` at `pe` and is not clamped.
//! Zero-length lines are a caller contract violation.

use std::cell::OnceCell;

use super::distance_2d::point_to_segment_dist;
use super::{cross_2d, perp, Point2, Point3, Vector2, Vector3, TOLERANCE};

/// A directed 2D line through `ps` and `pe`.
#[derive(Debug, Clone)]
pub struct Lin2D {
    ps: Point2,
    pe: Point2,
    l: OnceCell<Vector2>,
    l2: OnceCell<f64>,
    normal: OnceCell<Vector2>,
}

impl Lin2D {
    /// Creates a line from `ps` to `pe`.
    #[must_use]
    pub fn new(ps: Point2, pe: Point2) -> Self {
        debug_assert!((pe - ps).norm_squared() > 0.0, "degenerate Lin2D");
        Self {
            ps,
            pe,
            l: OnceCell::new(),
            l2: OnceCell::new(),
            normal: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn ps(&self) -> Point2 {
        self.ps
    }

    #[must_use]
    pub fn pe(&self) -> Point2 {
        self.pe
    }

    /// Direction vector `pe - ps`.
    #[must_use]
    pub fn l(&self) -> Vector2 {
        *self.l.get_or_init(|| self.pe - self.ps)
    }

    /// Squared length of the direction vector.
    #[must_use]
    pub fn l2(&self) -> f64 {
        *self.l2.get_or_init(|| self.l().norm_squared())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.l2().sqrt()
    }

    /// Unit normal pointing to the left of the direction.
    #[must_use]
    pub fn left_normal(&self) -> Vector2 {
        *self.normal.get_or_init(|| perp(&self.l()) / self.length())
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.ps + self.l() * t
    }

    /// Parameter of the orthogonal projection of `p`.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        (p - self.ps).dot(&self.l()) / self.l2()
    }

    /// Signed distance of `p` from the carrier line, positive on the left.
    #[must_use]
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        (p - self.ps).dot(&self.left_normal())
    }

    /// The same line translated by `v`.
    #[must_use]
    pub fn translated(&self, v: &Vector2) -> Self {
        Self::new(self.ps + v, self.pe + v)
    }

    /// The parallel line at `offset` to the left (negative: right).
    #[must_use]
    pub fn shifted(&self, offset: f64) -> Self {
        self.translated(&(self.left_normal() * offset))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.pe, self.ps)
    }
}

/// A directed 3D line through `ps` and `pe`.
#[derive(Debug, Clone)]
pub struct Lin3D {
    ps: Point3,
    pe: Point3,
    l: OnceCell<Vector3>,
    l2: OnceCell<f64>,
}

impl Lin3D {
    /// Creates a line from `ps` to `pe`.
    #[must_use]
    pub fn new(ps: Point3, pe: Point3) -> Self {
        debug_assert!((pe - ps).norm_squared() > 0.0, "degenerate Lin3D");
        Self {
            ps,
            pe,
            l: OnceCell::new(),
            l2: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn ps(&self) -> Point3 {
        self.ps
    }

    #[must_use]
    pub fn pe(&self) -> Point3 {
        self.pe
    }

    /// Direction vector `pe - ps`.
    #[must_use]
    pub fn l(&self) -> Vector3 {
        *self.l.get_or_init(|| self.pe - self.ps)
    }

    /// Squared length of the direction vector.
    #[must_use]
    pub fn l2(&self) -> f64 {
        *self.l2.get_or_init(|| self.l().norm_squared())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.l2().sqrt()
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.ps + self.l() * t
    }

    /// Parameter of the orthogonal projection of `p`.
    #[must_use]
    pub fn project(&self, p: &Point3) -> f64 {
        (p - self.ps).dot(&self.l()) / self.l2()
    }
}

/// Two 2D lines compared against each other.
#[derive(Debug, Clone)]
pub struct LinPair2D {
    l0: Lin2D,
    l1: Lin2D,
    t1: OnceCell<f64>,
    segment_distance: OnceCell<f64>,
}

impl LinPair2D {
    #[must_use]
    pub fn new(l0: Lin2D, l1: Lin2D) -> Self {
        Self {
            l0,
            l1,
            t1: OnceCell::new(),
            segment_distance: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn l0(&self) -> &Lin2D {
        &self.l0
    }

    #[must_use]
    pub fn l1(&self) -> &Lin2D {
        &self.l1
    }

    /// Cross product `l0.l × l1.l`.
    #[must_use]
    pub fn t1(&self) -> f64 {
        *self.t1.get_or_init(|| cross_2d(&self.l0.l(), &self.l1.l()))
    }

    /// Whether both directions are parallel within `TOLERANCE` (relative to
    /// their lengths).
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.t1().abs() <= TOLERANCE * self.l0.length() * self.l1.length()
    }

    /// Parameters `(t0, t1)` of the carrier-line intersection on `l0` and
    /// `l1`, or `None` for parallel lines.
    #[must_use]
    pub fn cut_params(&self) -> Option<(f64, f64)> {
        if self.is_parallel() {
            return None;
        }
        let w = self.l1.ps() - self.l0.ps();
        let t0 = cross_2d(&w, &self.l1.l()) / self.t1();
        let t1 = cross_2d(&w, &self.l0.l()) / self.t1();
        Some((t0, t1))
    }

    /// Closest-approach distance between the two finite segments.
    ///
    /// Zero for crossing segments; otherwise the minimum over the four
    /// endpoint-to-segment distances.
    #[must_use]
    pub fn segment_distance(&self) -> f64 {
        *self.segment_distance.get_or_init(|| {
            if let Some((t0, t1)) = self.cut_params() {
                let inside = |t: f64| (-TOLERANCE..=1.0 + TOLERANCE).contains(&t);
                if inside(t0) && inside(t1) {
                    return 0.0;
                }
            }
            let (a0, a1) = (self.l0.ps(), self.l0.pe());
            let (b0, b1) = (self.l1.ps(), self.l1.pe());
            point_to_segment_dist(&a0, &b0, &b1)
                .min(point_to_segment_dist(&a1, &b0, &b1))
                .min(point_to_segment_dist(&b0, &a0, &a1))
                .min(point_to_segment_dist(&b1, &a0, &a1))
        })
    }
}

/// Two 3D lines compared against each other.
#[derive(Debug, Clone)]
pub struct LinPair3D {
    l0: Lin3D,
    l1: Lin3D,
    cross: OnceCell<Vector3>,
    segment_distance: OnceCell<f64>,
}

impl LinPair3D {
    #[must_use]
    pub fn new(l0: Lin3D, l1: Lin3D) -> Self {
        Self {
            l0,
            l1,
            cross: OnceCell::new(),
            segment_distance: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn l0(&self) -> &Lin3D {
        &self.l0
    }

    #[must_use]
    pub fn l1(&self) -> &Lin3D {
        &self.l1
    }

    /// Cross product `l0.l × l1.l`.
    #[must_use]
    pub fn cross(&self) -> Vector3 {
        *self.cross.get_or_init(|| self.l0.l().cross(&self.l1.l()))
    }

    /// Squared length of [`Self::cross`].
    #[must_use]
    pub fn cross_length2(&self) -> f64 {
        self.cross().norm_squared()
    }

    /// Whether both directions are parallel within `TOLERANCE`.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.cross_length2().sqrt() <= TOLERANCE * self.l0.length() * self.l1.length()
    }

    /// Closest-approach distance between the two finite segments in 3D.
    #[must_use]
    pub fn segment_distance(&self) -> f64 {
        *self.segment_distance.get_or_init(|| {
            let d1 = self.l0.l();
            let d2 = self.l1.l();
            let r = self.l0.ps() - self.l1.ps();
            let a = d1.norm_squared();
            let e = d2.norm_squared();
            let f = d2.dot(&r);
            let c = d1.dot(&r);
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            let mut s = if self.is_parallel() {
                0.0
            } else {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            let p0 = self.l0.point_at(s);
            let p1 = self.l1.point_at(t);
            let direct = (p0 - p1).norm();
            if self.is_parallel() {
                // Clamped start may miss a closer overlap further along l0.
                let pe = self.l0.pe();
                let foot = self.l1.point_at(self.l1.project(&pe).clamp(0.0, 1.0));
                direct.min((pe - foot).norm())
            } else {
                direct
            }
        })
    }
}
