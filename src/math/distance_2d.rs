use super::{Point2, Vector2};

/// Parameter of the orthogonal projection of `p` onto the carrier line of
/// `a → b`, unclamped. Returns `0` for a degenerate segment.
#[must_use]
pub fn project_param(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return 0.0;
    }
    (p - a).dot(&d) / len_sq
}

/// Minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let t = project_param(p, a, b).clamp(0.0, 1.0);
    let closest = a + (b - a) * t;
    (p - closest).norm()
}

/// Signed perpendicular distance of `p` from the carrier line of `a → b`,
/// positive on the left.
#[must_use]
pub fn signed_line_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < 1e-12 {
        return (p - a).norm();
    }
    let n = Vector2::new(-d.y, d.x) / len;
    (p - a).dot(&n)
}
