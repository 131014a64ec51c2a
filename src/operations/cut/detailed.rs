use tracing::trace;

use crate::error::Result;
use crate::hull::{CutPart, EndPart, HullLine, HullPart, SegmentHull};
use crate::math::Vector2;

/// Bounds of a detailed cut and the neighbor parts that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DetailedCut {
    pub t_min: f64,
    pub t_max: f64,
    pub min_part: CutPart,
    pub max_part: CutPart,
}

/// Cuts every boundary line of `hull` against every boundary part of
/// `neighbor`, after moving as much width as the caps allow from the hull
/// to the neighbor.
pub(crate) fn cut_hulls(hull: &SegmentHull, neighbor: &SegmentHull) -> Result<Option<DetailedCut>> {
    let deflate = hull.deflate_radius();
    let lines = hull.hull_lines(deflate)?;
    let parts = neighbor.hull_parts(deflate);
    trace!(
        deflate,
        lines = lines.len(),
        parts = parts.len(),
        "detailed cut"
    );
    Ok(cut_lines(&lines, &parts))
}

/// Cuts a one-sided band of `offset` (positive: left) along `hull`'s
/// centerline against the full hull of `neighbor`.
pub(crate) fn cut_offset_band(
    hull: &SegmentHull,
    offset: f64,
    neighbor: &SegmentHull,
) -> Result<Option<DetailedCut>> {
    let centerline = hull.centerline()?;
    let side = if offset >= 0.0 {
        CutPart::LeftSide
    } else {
        CutPart::RightSide
    };
    let across = centerline.left_normal() * offset;
    let lines = [
        HullLine::line(
            &centerline,
            EndPart::new(Vector2::zeros(), across),
            side,
        ),
        HullLine::Simple {
            lin: centerline.clone(),
            part: side,
        },
        HullLine::Simple {
            lin: centerline.translated(&across),
            part: side,
        },
    ];
    Ok(cut_lines(&lines, &neighbor.hull_parts(0.0)))
}

fn cut_lines(lines: &[HullLine], parts: &[HullPart]) -> Option<DetailedCut> {
    let mut result: Option<DetailedCut> = None;
    for line in lines {
        for part in parts {
            let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
            if !part.cut(line, &mut lo, &mut hi) {
                continue;
            }
            let cut = result.get_or_insert(DetailedCut {
                t_min: lo,
                t_max: hi,
                min_part: part.part(),
                max_part: part.part(),
            });
            if lo < cut.t_min {
                cut.t_min = lo;
                cut.min_part = part.part();
            }
            if hi > cut.t_max {
                cut.t_max = hi;
                cut.max_part = part.part();
            }
        }
    }
    result
}
