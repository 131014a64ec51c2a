//! Contact parameters between shapes swept along a line and fixed shapes.
//!
//! The moving shape is attached to `P(t) = lin.ps + t * lin.l`; every
//! function pushes the parameters `t` at which the moving shape touches the
//! fixed one. Parameters are not clamped.

use crate::math::arc_2d::angle_in_sweep;
use crate::math::intersect_2d::line_circle_params;
use crate::math::{cross_2d, Lin2D, Point2, Vector2};

/// Absolute tolerance for collinearity and range checks.
pub(crate) const EPS: f64 = 1e-9;

fn angle_of(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

fn proj(base: &Point2, l: &Vector2, q: &Point2) -> f64 {
    (q - base).dot(l) / l.norm_squared()
}

/// The point `P(t) + offset` reaches the fixed point `q`.
pub(crate) fn point_track_vs_point(lin: &Lin2D, offset: &Vector2, q: &Point2, out: &mut Vec<f64>) {
    let base = lin.ps() + offset;
    let l = lin.l();
    let dist = cross_2d(&l, &(q - base)).abs() / l.norm();
    if dist <= EPS {
        out.push(proj(&base, &l, q));
    }
}

/// The point `P(t) + offset` lies on the fixed segment `q0 → q1`.
///
/// A collinear segment yields the parameters of both segment ends.
pub(crate) fn point_track_vs_segment(
    lin: &Lin2D,
    offset: &Vector2,
    q0: &Point2,
    q1: &Point2,
    out: &mut Vec<f64>,
) {
    let d = q1 - q0;
    if d.norm() <= EPS {
        point_track_vs_point(lin, offset, q0, out);
        return;
    }
    let base = lin.ps() + offset;
    let l = lin.l();
    let cross = cross_2d(&l, &d);
    if cross.abs() > EPS * l.norm() * d.norm() {
        let w = q0 - base;
        let t = cross_2d(&w, &d) / cross;
        let u = cross_2d(&w, &l) / cross;
        let u_eps = EPS / d.norm();
        if u >= -u_eps && u <= 1.0 + u_eps {
            out.push(t);
        }
    } else if cross_2d(&l, &(q0 - base)).abs() / l.norm() <= EPS {
        out.push(proj(&base, &l, q0));
        out.push(proj(&base, &l, q1));
    }
}

/// The fixed point `q` lies on the moving segment `P(t) + e0 → P(t) + e1`.
pub(crate) fn point_vs_segment_track(
    lin: &Lin2D,
    e0: &Vector2,
    e1: &Vector2,
    q: &Point2,
    out: &mut Vec<f64>,
) {
    let e = e1 - e0;
    if e.norm() <= EPS {
        point_track_vs_point(lin, e0, q, out);
        return;
    }
    let base = lin.ps() + e0;
    let l = lin.l();
    let w = q - base;
    let c = cross_2d(&l, &e);
    if c.abs() > EPS * l.norm() * e.norm() {
        let t = cross_2d(&w, &e) / c;
        let s = cross_2d(&l, &w) / c;
        let s_eps = EPS / e.norm();
        if s >= -s_eps && s <= 1.0 + s_eps {
            out.push(t);
        }
    } else if cross_2d(&l, &w).abs() / l.norm() <= EPS {
        // The segment slides along its own carrier through q.
        let t = proj(&base, &l, q);
        let k = e.dot(&l) / l.norm_squared();
        out.push(t);
        out.push(t - k);
    }
}

/// The point `P(t) + offset` lies on the fixed arc around `center`.
pub(crate) fn point_track_vs_arc(
    lin: &Lin2D,
    offset: &Vector2,
    center: &Point2,
    radius: f64,
    start: f64,
    sweep: f64,
    out: &mut Vec<f64>,
) {
    if radius <= EPS {
        point_track_vs_point(lin, offset, center, out);
        return;
    }
    let base = lin.ps() + offset;
    let l = lin.l();
    for t in line_circle_params(&base, &l, center, radius) {
        let p = base + l * t;
        if angle_in_sweep(angle_of(&(p - center)), start, sweep) {
            out.push(t);
        }
    }
}

/// The fixed point `q` lies on the moving arc of `radius` around `P(t)`.
pub(crate) fn point_vs_arc_track(
    lin: &Lin2D,
    radius: f64,
    start: f64,
    sweep: f64,
    q: &Point2,
    out: &mut Vec<f64>,
) {
    let l = lin.l();
    for t in line_circle_params(&lin.ps(), &l, q, radius) {
        let p = lin.point_at(t);
        if angle_in_sweep(angle_of(&(q - p)), start, sweep) {
            out.push(t);
        }
    }
}

/// Parameters where the moving center `P(t)` is at `distance` from `center`.
pub(crate) fn center_track_at_distance(lin: &Lin2D, center: &Point2, distance: f64) -> Vec<f64> {
    line_circle_params(&lin.ps(), &lin.l(), center, distance)
}

/// Widens `[t_min, t_max]` by every value in `ts`; returns whether `ts`
/// was non-empty.
pub(crate) fn widen(ts: &[f64], t_min: &mut f64, t_max: &mut f64) -> bool {
    for &t in ts {
        *t_min = t_min.min(t);
        *t_max = t_max.max(t);
    }
    !ts.is_empty()
}
