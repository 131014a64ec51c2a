pub mod aabb;
pub mod pline;
pub mod polycurve;
pub mod segment;

pub use aabb::Aabb;
pub use pline::{Pline, PlineVertex};
pub use polycurve::{CurvePart, Polycurve};
pub use segment::{ArcSegment, LinearSegment, Segment, SegmentProxy};
