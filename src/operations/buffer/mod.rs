//! Exact buffer operations behind a kernel boundary.
//!
//! Curved hulls cannot be cut in closed form, so their neighbor is buffered
//! into a polygon and the hull curve is intersected with it.

mod tessellating;

pub use tessellating::TessellatingKernel;

use crate::error::{KernelError, Result};
use crate::geometry::{Aabb, Pline};
use crate::math::polygon_2d::point_in_ring;
use crate::math::Point2;

/// A buffer area: the union of its rings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferPolygon {
    rings: Vec<Vec<Point2>>,
}

impl BufferPolygon {
    #[must_use]
    pub fn new(rings: Vec<Vec<Point2>>) -> Self {
        Self { rings }
    }

    #[must_use]
    pub fn rings(&self) -> &[Vec<Point2>] {
        &self.rings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Whether `p` lies inside any ring.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        self.rings.iter().any(|ring| point_in_ring(p, ring))
    }

    /// Bounding box of all rings.
    #[must_use]
    pub fn extent(&self) -> Option<Aabb> {
        Aabb::from_points(self.rings.iter().flatten())
    }
}

/// Options for buffer construction.
#[derive(Debug, Clone, Copy)]
pub struct BufferOptions {
    max_deviation: f64,
}

impl BufferOptions {
    /// Creates buffer options.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_deviation` is not positive and finite.
    pub fn new(max_deviation: f64) -> Result<Self> {
        if !(max_deviation > 0.0 && max_deviation.is_finite()) {
            return Err(KernelError::InvalidParameters(format!(
                "max deviation must be positive, got {max_deviation}"
            ))
            .into());
        }
        Ok(Self { max_deviation })
    }

    /// Largest distance between a tessellated arc and the true arc.
    #[must_use]
    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            max_deviation: 1e-4,
        }
    }
}

/// Geometry access needed by the buffer fallback of the cut algorithm.
///
/// Fractions are length fractions along the curve in `[0, 1]`.
pub trait GeometryKernel {
    /// Point at `fraction`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty curve or a fraction outside `[0, 1]`.
    fn point_at(&self, curve: &Pline, fraction: f64) -> Result<Point2>;

    /// Tangent direction angle (radians) at `fraction`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty curve or a fraction outside `[0, 1]`.
    fn tangent_direction(&self, curve: &Pline, fraction: f64) -> Result<f64>;

    /// The area within `radius` of `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidRadius`] unless `radius` is positive and
    /// finite.
    fn create_buffer(&self, curve: &Pline, radius: f64) -> Result<BufferPolygon>;

    /// Fraction intervals of `curve` inside `polygon`, ascending and
    /// disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot evaluate the curve.
    fn intersect(&self, curve: &Pline, polygon: &BufferPolygon) -> Result<Vec<[f64; 2]>>;

    /// Whether both curves run through the same points within `tolerance`
    /// in the same direction.
    fn equals(&self, a: &Pline, b: &Pline, tolerance: f64) -> bool;

    /// Whether `curve` stays outside `polygon`.
    fn is_disjoint(&self, curve: &Pline, polygon: &BufferPolygon) -> bool;
}
