pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod lin;
pub mod polygon_2d;

pub use lin::{Lin2D, Lin3D, LinPair2D, LinPair3D};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Drops the z coordinate.
#[must_use]
pub fn xy(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rotates a vector by +90 degrees (the left normal, not normalized).
#[must_use]
pub fn perp(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Unit vector at `angle` radians.
#[must_use]
pub fn unit_at(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// Real roots of `a·t² + b·t + c = 0`, ascending.
///
/// Uses the cancellation-free form of the quadratic formula. A discriminant
/// slightly below zero (within `TOLERANCE` relative to `b²`) is treated as a
/// tangency and yields a double root. A vanishing `a` falls back to the
/// linear equation.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= TOLERANCE * scale {
        if b.abs() <= TOLERANCE * scale {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    let disc_tol = TOLERANCE * (b * b).max(4.0 * (a * c).abs()).max(f64::MIN_POSITIVE);
    if disc < -disc_tol {
        return Vec::new();
    }
    if disc <= disc_tol {
        return vec![-b / (2.0 * a)];
    }

    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    let (r0, r1) = if q == 0.0 {
        (-sq / (2.0 * a), sq / (2.0 * a))
    } else {
        (q / a, c / q)
    };
    if r0 <= r1 {
        vec![r0, r1]
    } else {
        vec![r1, r0]
    }
}
