use thiserror::Error;

/// Top-level error type for the hull intersection engine.
#[derive(Debug, Error)]
pub enum HullcutError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Hull(#[from] HullError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid fraction range: from {from} is greater than to {to}")]
    InvalidFractionRange { from: f64, to: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("expected {expected} {what}, got {actual}")]
    CountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while building hulls or cutting them against each other.
#[derive(Debug, Error)]
pub enum HullError {
    #[error("{side} offset must not be negative, got {value}")]
    NegativeOffset { side: &'static str, value: f64 },

    #[error("rect cap length must not be negative, got {0}")]
    NegativeCapLength(f64),

    #[error(
        "segment {segment_index} of part {part_index} is curved; \
         asymmetric or rectangular hulls are only supported for linear segments"
    )]
    UnsupportedCurvedHull {
        part_index: usize,
        segment_index: usize,
    },

    #[error(
        "segment {segment_index} of part {part_index} leaves the hull's height; \
         asymmetric, rectangular and curved hulls are only cut in 3D at one height"
    )]
    NonPlanarCut {
        part_index: usize,
        segment_index: usize,
    },
}

/// Errors related to the segment index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("part {part} does not exist (curve has {count} parts)")]
    PartOutOfRange { part: usize, count: usize },

    #[error("segment {segment} does not exist in part {part} ({count} segments)")]
    SegmentOutOfRange {
        part: usize,
        segment: usize,
        count: usize,
    },

    #[error("curve has no segments")]
    EmptyCurve,

    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a geometry kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("buffer radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("invalid kernel parameters: {0}")]
    InvalidParameters(String),

    #[error("kernel operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`HullcutError`].
pub type Result<T> = std::result::Result<T, HullcutError>;
