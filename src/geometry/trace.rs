use crate::{
    foundation::core::{BezPath, PathEl, Point},
    foundation::error::{DollError, DollResult},
    foundation::math::end_point,
    geometry::element::PathElement,
};

/// Derive a new open path `elemid` that follows commands `[start, end)` of `base`.
///
/// A negative `end` counts back from the end of the base path (`-1` drops the last command).
/// The traced line starts with a move to the point where command `start` begins; close-path
/// commands inside the range become explicit lines back to their subpath start.
pub fn trace_outline(
    base: &PathElement,
    elemid: impl Into<String>,
    start: usize,
    end: i64,
) -> DollResult<PathElement> {
    let elemid = elemid.into();
    let elements = base.path.elements();
    let len = elements.len();
    let end = if end < 0 {
        len.checked_sub(end.unsigned_abs() as usize)
    } else {
        Some(end as usize)
    };
    let end = match end {
        Some(end) if start < end && end <= len => end,
        _ => {
            return Err(DollError::geometry(format!(
                "trace '{elemid}' range [{start}, {end:?}) is invalid for '{}' ({len} commands)",
                base.id
            )));
        }
    };

    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    let mut out = BezPath::new();
    for (i, &el) in elements.iter().enumerate().take(end) {
        if i == start && !matches!(el, PathEl::MoveTo(_)) {
            out.move_to(current);
        }
        if i >= start {
            out.push(match el {
                PathEl::ClosePath => PathEl::LineTo(subpath_start),
                other => other,
            });
        }
        match el {
            PathEl::MoveTo(p) => {
                current = p;
                subpath_start = p;
            }
            PathEl::ClosePath => current = subpath_start,
            other => {
                if let Some(p) = end_point(&other) {
                    current = p;
                }
            }
        }
    }
    Ok(PathElement::new(elemid, out))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/trace.rs"]
mod tests;
