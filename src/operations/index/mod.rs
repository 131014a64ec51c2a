//! Spatial index over the segments of a curve.

mod box_tree;
mod indexed_curve;

pub use box_tree::{BoxTree, BoxTreeConfig, TileId};
pub use indexed_curve::{IndexedCurve, SegmentKey, SegmentNeighborhood};
