use super::CutPart;
use crate::math::{Lin2D, Vector2};

/// A segment given relative to the moving point of a hull line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndPart {
    /// Offset of the segment start from the moving point.
    pub ps: Vector2,
    /// Offset of the segment end from the moving point.
    pub pe: Vector2,
}

impl EndPart {
    #[must_use]
    pub fn new(ps: Vector2, pe: Vector2) -> Self {
        Self { ps, pe }
    }

    /// Whether the segment has (almost) no length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        (self.pe - self.ps).norm() <= super::sweep::EPS
    }
}

/// A boundary primitive of the hull being cut, swept along `lin`.
///
/// The cut parameter `t` is the parameter of the moving point on `lin`.
#[derive(Debug, Clone)]
pub enum HullLine {
    /// The line itself (an offset side of the hull).
    Simple { lin: Lin2D, part: CutPart },
    /// A segment attached to the moving point (rectangular caps, one-sided
    /// bands).
    Line {
        lin: Lin2D,
        end_part: EndPart,
        part: CutPart,
    },
    /// A circular arc centered on the moving point (round caps).
    Arc {
        lin: Lin2D,
        radius: f64,
        start_direction: f64,
        angle: f64,
        part: CutPart,
    },
}

impl HullLine {
    /// A swept segment, degenerating to the simple line through its start
    /// when the segment has no length.
    #[must_use]
    pub fn line(lin: &Lin2D, end_part: EndPart, part: CutPart) -> Self {
        if end_part.is_degenerate() {
            Self::Simple {
                lin: lin.translated(&end_part.ps),
                part,
            }
        } else {
            Self::Line {
                lin: lin.clone(),
                end_part,
                part,
            }
        }
    }

    /// A swept arc, degenerating to the simple line when the radius
    /// vanishes.
    #[must_use]
    pub fn arc(lin: &Lin2D, radius: f64, start_direction: f64, angle: f64, part: CutPart) -> Self {
        if radius <= super::sweep::EPS {
            Self::Simple {
                lin: lin.clone(),
                part,
            }
        } else {
            Self::Arc {
                lin: lin.clone(),
                radius,
                start_direction,
                angle,
                part,
            }
        }
    }

    #[must_use]
    pub fn lin(&self) -> &Lin2D {
        match self {
            Self::Simple { lin, .. } | Self::Line { lin, .. } | Self::Arc { lin, .. } => lin,
        }
    }

    #[must_use]
    pub fn part(&self) -> CutPart {
        match self {
            Self::Simple { part, .. } | Self::Line { part, .. } | Self::Arc { part, .. } => *part,
        }
    }
}
