use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() <= TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let w = p2 - p1;
    let t = cross_2d(&w, d2) / cross;
    let u = cross_2d(&w, d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(t, u)` on `a0 → a1` and `b0 → b1`, both clamped to `[0, 1]`.
/// Parallel segments never intersect here; collinear overlaps are the
/// caller's concern.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(f64, f64)> {
    let (t, u) = line_line_intersect_2d(a0, &(a1 - a0), b0, &(b1 - b0))?;
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Parameters `t` where the line `p + t * d` meets the circle of `radius`
/// around `center`, ascending. A tangent line yields a single parameter.
#[must_use]
pub fn line_circle_params(p: &Point2, d: &Vector2, center: &Point2, radius: f64) -> Vec<f64> {
    let f = p - center;
    super::solve_quadratic(d.norm_squared(), 2.0 * f.dot(d), f.norm_squared() - radius * radius)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn lines_cross() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(10.0, 0.0),
            &Point2::new(5.0, -5.0),
            &Vector2::new(0.0, 10.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!((u - 0.5).abs() < TOL, "u={u}");
    }

    #[test]
    fn parallel_lines_do_not_cross() {
        let r = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 1.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(2.0, 2.0),
        );
        assert!(r.is_none());
    }

    #[test]
    fn segments_miss_outside_range() {
        let r = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, -1.0),
            &Point2::new(2.0, 1.0),
        );
        assert!(r.is_none());
    }

    #[test]
    fn segments_touch_at_endpoint() {
        let r = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(1.0, -1.0),
            &Point2::new(1.0, 1.0),
        );
        assert_eq!(r, Some((1.0, 0.5)));
    }

    #[test]
    fn line_circle_secant_and_tangent() {
        let hits = line_circle_params(
            &Point2::new(0.0, 0.0),
            &Vector2::new(10.0, 0.0),
            &Point2::new(5.0, 0.0),
            2.0,
        );
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 0.3).abs() < TOL && (hits[1] - 0.7).abs() < TOL, "{hits:?}");

        let tangent = line_circle_params(
            &Point2::new(0.0, 2.0),
            &Vector2::new(10.0, 0.0),
            &Point2::new(5.0, 0.0),
            2.0,
        );
        assert_eq!(tangent.len(), 1);
        assert!((tangent[0] - 0.5).abs() < TOL);
    }
}
