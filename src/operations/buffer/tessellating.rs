use std::f64::consts::{PI, TAU};

use tracing::trace;

use super::{BufferOptions, BufferPolygon, GeometryKernel};
use crate::error::{GeometryError, KernelError, Result};
use crate::geometry::{Aabb, Pline};
use crate::math::arc_2d::{arc_subdivision_count, BulgeArc};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{unit_at, Point2};

/// Minimum number of vertices of a full circle ring.
const MIN_CIRCLE_SEGMENTS: u32 = 8;

/// Fractions closer than this are merged.
const FRACTION_EPS: f64 = 1e-12;

/// Shorter segments are buffered as discs.
const MIN_LENGTH: f64 = 1e-12;

/// A [`GeometryKernel`] that approximates buffers by polygons.
///
/// Lines are buffered into capsules and arcs into annular sectors with
/// round ends, all arcs tessellated within
/// [`BufferOptions::max_deviation`]. Outer arcs are tessellated with edges
/// tangent to the true arc, so the polygon contains the exact buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TessellatingKernel {
    options: BufferOptions,
}

impl TessellatingKernel {
    #[must_use]
    pub fn new(options: BufferOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> BufferOptions {
        self.options
    }

    fn max_deviation(&self) -> f64 {
        self.options.max_deviation()
    }

    /// Number of edges for an arc of `sweep`, at most `TAU / MIN_CIRCLE_SEGMENTS`
    /// radians each.
    fn arc_steps(&self, radius: f64, sweep: f64) -> u32 {
        let step = TAU / f64::from(MIN_CIRCLE_SEGMENTS);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let coarse = (sweep.abs() / step).ceil() as u32;
        arc_subdivision_count(radius, sweep.abs(), self.max_deviation()).max(coarse)
    }

    /// Pushes the points of an arc from `start` over `sweep`, both ends
    /// included. Outer arcs place their points at `radius / cos(step / 2)`
    /// so every edge touches the circle from outside; inner arcs keep them
    /// on the circle, which already lies outside the hole.
    fn push_arc(
        &self,
        center: &Point2,
        radius: f64,
        start: f64,
        sweep: f64,
        outer: bool,
        out: &mut Vec<Point2>,
    ) {
        let n = self.arc_steps(radius, sweep);
        let step = sweep / f64::from(n);
        let r = if outer { radius / (step * 0.5).cos() } else { radius };
        for k in 0..=n {
            out.push(center + unit_at(start + step * f64::from(k)) * r);
        }
    }

    fn circle_ring(&self, center: &Point2, radius: f64) -> Vec<Point2> {
        let mut ring = Vec::new();
        self.push_arc(center, radius, 0.0, TAU, true, &mut ring);
        ring.pop();
        ring
    }

    fn capsule_ring(&self, a: &Point2, b: &Point2, radius: f64) -> Vec<Point2> {
        let d = b - a;
        if d.norm() <= MIN_LENGTH {
            return self.circle_ring(a, radius);
        }
        let heading = d.y.atan2(d.x);
        let mut ring = Vec::new();
        self.push_arc(b, radius, heading - PI / 2.0, PI, true, &mut ring);
        self.push_arc(a, radius, heading + PI / 2.0, PI, true, &mut ring);
        ring
    }

    /// Annular sector of an arc; the inner boundary collapses to the arc
    /// center when `radius` reaches the arc radius.
    fn sector_ring(&self, arc: &BulgeArc, radius: f64) -> Vec<Point2> {
        let mut ring = Vec::new();
        self.push_arc(&arc.center, arc.radius + radius, arc.start_angle, arc.sweep, true, &mut ring);
        let inner = arc.radius - radius;
        if inner > MIN_LENGTH {
            self.push_arc(
                &arc.center,
                inner,
                arc.start_angle + arc.sweep,
                -arc.sweep,
                false,
                &mut ring,
            );
        } else {
            ring.push(arc.center);
        }
        ring
    }

    /// Fraction intervals of the tessellated curve inside `polygon`.
    fn covered(&self, curve: &Pline, polygon: &BufferPolygon) -> Vec<[f64; 2]> {
        let stations = curve.stations(self.max_deviation());
        let rings: Vec<(Option<Aabb>, &Vec<Point2>)> = polygon
            .rings()
            .iter()
            .map(|ring| (Aabb::from_points(ring.iter()), ring))
            .collect();

        let mut intervals: Vec<[f64; 2]> = Vec::new();
        for pair in stations.windows(2) {
            let ((p0, f0), (p1, f1)) = (pair[0], pair[1]);
            let chord_box = Aabb::new(p0, p1);
            let mut us = vec![0.0, 1.0];
            for (extent, ring) in &rings {
                if !extent.is_some_and(|e| e.intersects(&chord_box)) {
                    continue;
                }
                for j in 0..ring.len() {
                    let (e0, e1) = (&ring[j], &ring[(j + 1) % ring.len()]);
                    if let Some((u, _)) = segment_segment_intersect_2d(&p0, &p1, e0, e1) {
                        us.push(u);
                    }
                }
            }
            us.sort_by(f64::total_cmp);
            us.dedup_by(|a, b| (*a - *b).abs() <= FRACTION_EPS);

            for w in us.windows(2) {
                let (u0, u1) = (w[0], w[1]);
                let mid = p0 + (p1 - p0) * ((u0 + u1) * 0.5);
                if !polygon.contains(&mid) {
                    continue;
                }
                let (a, b) = (f0 + (f1 - f0) * u0, f0 + (f1 - f0) * u1);
                match intervals.last_mut() {
                    Some(last) if a - last[1] <= FRACTION_EPS => last[1] = b,
                    _ => intervals.push([a, b]),
                }
            }
        }
        intervals
    }
}

fn checked_fraction(fraction: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter: "fraction",
            value: fraction,
            min: 0.0,
            max: 1.0,
        }
        .into())
    }
}

fn empty_curve() -> KernelError {
    KernelError::Failed("curve has no vertices".to_owned())
}

impl GeometryKernel for TessellatingKernel {
    fn point_at(&self, curve: &Pline, fraction: f64) -> Result<Point2> {
        curve
            .point_at(checked_fraction(fraction)?)
            .ok_or_else(|| empty_curve().into())
    }

    fn tangent_direction(&self, curve: &Pline, fraction: f64) -> Result<f64> {
        let t = curve
            .tangent_at(checked_fraction(fraction)?)
            .ok_or_else(empty_curve)?;
        Ok(t.y.atan2(t.x))
    }

    fn create_buffer(&self, curve: &Pline, radius: f64) -> Result<BufferPolygon> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(KernelError::InvalidRadius(radius).into());
        }
        let count = curve.segment_count();
        if count == 0 {
            let first = curve.vertices.first().ok_or_else(empty_curve)?;
            return Ok(BufferPolygon::new(vec![self.circle_ring(&first.point(), radius)]));
        }
        let mut rings = Vec::with_capacity(count);
        for i in 0..count {
            let (v0, v1) = curve.segment(i);
            let (p0, p1) = (v0.point(), v1.point());
            match curve.segment_arc(i) {
                Some(arc) => {
                    rings.push(self.sector_ring(&arc, radius));
                    rings.push(self.circle_ring(&p0, radius));
                    rings.push(self.circle_ring(&p1, radius));
                }
                None => rings.push(self.capsule_ring(&p0, &p1, radius)),
            }
        }
        trace!(rings = rings.len(), radius, "buffer created");
        Ok(BufferPolygon::new(rings))
    }

    fn intersect(&self, curve: &Pline, polygon: &BufferPolygon) -> Result<Vec<[f64; 2]>> {
        if curve.vertices.is_empty() {
            return Err(empty_curve().into());
        }
        Ok(self.covered(curve, polygon))
    }

    fn equals(&self, a: &Pline, b: &Pline, tolerance: f64) -> bool {
        if a.segment_count() == 0 || b.segment_count() == 0 {
            return false;
        }
        let dev = self.max_deviation();
        a.stations(dev)
            .iter()
            .chain(b.stations(dev).iter())
            .all(|(_, f)| match (a.point_at(*f), b.point_at(*f)) {
                (Some(pa), Some(pb)) => (pa - pb).norm() <= tolerance,
                _ => false,
            })
    }

    fn is_disjoint(&self, curve: &Pline, polygon: &BufferPolygon) -> bool {
        self.covered(curve, polygon).is_empty()
    }
}
