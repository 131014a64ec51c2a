/// 2D arc/bulge math utilities.
///
/// Bulge convention: `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, TOLERANCE};

/// Bulges below this magnitude are treated as straight segments.
pub const MIN_BULGE: f64 = 1e-12;

/// A circular arc in center/radius/angle form.
///
/// `sweep` is signed: positive for counter-clockwise arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl BulgeArc {
    /// Converts a bulge-defined segment to center-radius-angle form.
    ///
    /// Returns `None` for straight segments (`|bulge|` below [`MIN_BULGE`])
    /// and zero-length chords.
    #[must_use]
    pub fn from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Option<Self> {
        if bulge.abs() < MIN_BULGE {
            return None;
        }
        let chord = p1 - p0;
        let chord_len = chord.norm();
        if chord_len < 1e-12 {
            return None;
        }

        // Center lies on the chord bisector, left of the chord for positive bulge.
        let normal = Vector2::new(-chord.y, chord.x) / chord_len;
        let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
        let mid = Point2::new((p0.x + p1.x) * 0.5, (p0.y + p1.y) * 0.5);
        let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

        let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
        let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
        let sweep = 4.0 * bulge.atan();

        Some(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Whether the arc runs counter-clockwise.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    /// Point at arc parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// Unit tangent at arc parameter `t`, pointing towards increasing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Arc parameter of the direction `angle`, or `None` if it lies outside
    /// the swept range.
    #[must_use]
    pub fn param_of_angle(&self, angle: f64) -> Option<f64> {
        if angle_in_sweep(angle, self.start_angle, self.sweep) {
            let t = (unwrapped_delta(angle, self.start_angle, self.sweep) / self.sweep)
                .clamp(0.0, 1.0);
            Some(t)
        } else {
            None
        }
    }

    /// Arc parameter of the direction `angle`, extrapolated beyond `[0, 1]`
    /// towards whichever end of the arc is angularly closer.
    #[must_use]
    pub fn unbounded_param_of_angle(&self, angle: f64) -> f64 {
        unwrapped_delta(angle, self.start_angle, self.sweep) / self.sweep
    }

    /// Axis-aligned extent `(min, max)` including the axis extreme points
    /// crossed by the arc.
    #[must_use]
    pub fn extent(&self) -> (Point2, Point2) {
        let p0 = self.point_at(0.0);
        let p1 = self.point_at(1.0);
        let mut min = Point2::new(p0.x.min(p1.x), p0.y.min(p1.y));
        let mut max = Point2::new(p0.x.max(p1.x), p0.y.max(p1.y));
        for k in 0..4 {
            let angle = f64::from(k) * PI * 0.5;
            if angle_in_sweep(angle, self.start_angle, self.sweep) {
                let p = self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius;
                min = Point2::new(min.x.min(p.x), min.y.min(p.y));
                max = Point2::new(max.x.max(p.x), max.y.max(p.y));
            }
        }
        (min, max)
    }

    /// Number of chords needed to stay within `max_deviation` of the arc.
    #[must_use]
    pub fn subdivision_count(&self, max_deviation: f64) -> u32 {
        arc_subdivision_count(self.radius, self.sweep.abs(), max_deviation)
    }
}

/// Bulge of the sub-arc between parameters `from` and `to` of an arc with
/// the given `bulge`.
#[must_use]
pub fn sub_arc_bulge(bulge: f64, from: f64, to: f64) -> f64 {
    let sweep = 4.0 * bulge.atan();
    (sweep * (to - from) / 4.0).tan()
}

/// Computes the number of chords needed to approximate an arc within the
/// given deviation.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, max_deviation: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || max_deviation <= 0.0 {
        return 1;
    }
    // sagitta = r * (1 - cos(θ/2))
    let max_angle = if max_deviation >= radius {
        PI
    } else {
        2.0 * (1.0 - max_deviation / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

/// Normalizes an angle into `(-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Whether `angle` lies within the range swept from `start` by `sweep`
/// (negative sweeps run clockwise). Sweeps of a full turn or more accept
/// every angle.
#[must_use]
pub fn angle_in_sweep(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep.abs() >= TAU - TOLERANCE {
        return true;
    }
    let eps = 1e-9;
    let mut delta = (angle - start) % TAU;
    if sweep >= 0.0 {
        if delta < -eps {
            delta += TAU;
        }
        if delta > TAU - eps {
            delta -= TAU;
        }
        delta >= -eps && delta <= sweep + eps
    } else {
        if delta > eps {
            delta -= TAU;
        }
        if delta < -TAU + eps {
            delta += TAU;
        }
        delta <= eps && delta >= sweep - eps
    }
}

/// Signed angular offset of `angle` from `start`, unwrapped into the window
/// centered on the middle of the sweep.
fn unwrapped_delta(angle: f64, start: f64, sweep: f64) -> f64 {
    let mid = sweep * 0.5;
    mid + normalize_angle(angle - start - mid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn semicircle_ccw_passes_below_chord() {
        // Center (1,0), radius 1, sweep +π through (1,-1).
        let arc = BulgeArc::from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0).unwrap();
        assert!((arc.center.x - 1.0).abs() < TOL, "cx={}", arc.center.x);
        assert!(arc.center.y.abs() < TOL, "cy={}", arc.center.y);
        assert!((arc.radius - 1.0).abs() < TOL, "r={}", arc.radius);
        assert!((arc.sweep - PI).abs() < TOL, "sweep={}", arc.sweep);

        let pm = arc.point_at(0.5);
        assert!((pm.x - 1.0).abs() < TOL, "pm.x={}", pm.x);
        assert!((pm.y + 1.0).abs() < TOL, "pm.y={}", pm.y);

        let p1 = arc.point_at(1.0);
        assert!((p1.x - 2.0).abs() < TOL && p1.y.abs() < TOL);
    }

    #[test]
    fn semicircle_cw_passes_above_chord() {
        let arc =
            BulgeArc::from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), -1.0).unwrap();
        assert!((arc.sweep + PI).abs() < TOL);
        let pm = arc.point_at(0.5);
        assert!((pm.y - 1.0).abs() < TOL, "pm.y={}", pm.y);
        assert!(!arc.is_ccw());
    }

    #[test]
    fn straight_bulge_is_not_an_arc() {
        assert!(BulgeArc::from_bulge(&Point2::new(0.0, 0.0), &Point2::new(1.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn tangent_follows_direction() {
        // CCW quarter circle from (1,0) to (0,1) around the origin.
        let bulge = (PI / 8.0).tan();
        let arc =
            BulgeArc::from_bulge(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), bulge).unwrap();
        let t0 = arc.tangent_at(0.0);
        assert!(t0.x.abs() < TOL && (t0.y - 1.0).abs() < TOL, "t0={t0:?}");
        assert!((arc.length() - PI * 0.5).abs() < TOL);
    }

    #[test]
    fn extent_includes_axis_extremes() {
        // Upper semicircle (CW from (-1,0) to (1,0)) reaches y = 1.
        let arc =
            BulgeArc::from_bulge(&Point2::new(-1.0, 0.0), &Point2::new(1.0, 0.0), -1.0).unwrap();
        let (min, max) = arc.extent();
        assert!((max.y - 1.0).abs() < TOL, "max.y={}", max.y);
        assert!(min.y.abs() < TOL, "min.y={}", min.y);
        assert!((min.x + 1.0).abs() < TOL && (max.x - 1.0).abs() < TOL);
    }

    #[test]
    fn param_of_angle_inside_and_outside() {
        let arc =
            BulgeArc::from_bulge(&Point2::new(-1.0, 0.0), &Point2::new(1.0, 0.0), -1.0).unwrap();
        let t = arc.param_of_angle(PI * 0.5).unwrap();
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!(arc.param_of_angle(-PI * 0.5).is_none());
        let before = arc.unbounded_param_of_angle(PI + 0.1);
        assert!(before < 0.0, "before={before}");
    }

    #[test]
    fn sub_arc_bulge_halves_sweep() {
        let b = sub_arc_bulge(1.0, 0.0, 0.5);
        assert!((b - (PI / 8.0).tan()).abs() < TOL, "b={b}");
    }

    #[test]
    fn angle_in_sweep_wraps() {
        assert!(angle_in_sweep(-PI * 0.9, PI * 0.5, PI));
        assert!(!angle_in_sweep(0.0, PI * 0.5, PI));
        assert!(angle_in_sweep(0.3, 0.5, -1.0));
        assert!(angle_in_sweep(123.0, 0.0, TAU));
    }

    #[test]
    fn subdivision_count_grows_with_precision() {
        let coarse = arc_subdivision_count(10.0, PI, 0.1);
        let fine = arc_subdivision_count(10.0, PI, 0.001);
        assert!(fine > coarse, "coarse={coarse} fine={fine}");
        assert_eq!(arc_subdivision_count(0.0, PI, 0.1), 1);
    }
}
