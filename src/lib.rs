pub mod error;
pub mod geometry;
pub mod hull;
pub mod math;
pub mod operations;

pub use error::{HullcutError, Result};
