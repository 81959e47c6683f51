use crate::foundation::core::{PathEl, Point};

/// Seeded FNV-1a 64-bit hasher used for document fingerprints.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Round `v` to `digits` fractional digits. Negative zero collapses to zero.
pub(crate) fn round_decimal(v: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let r = (v * scale).round() / scale;
    if r == 0.0 { 0.0 } else { r }
}

/// End point of a path element, `None` for `ClosePath`.
pub(crate) fn end_point(el: &PathEl) -> Option<Point> {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
        PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => Some(p),
        PathEl::ClosePath => None,
    }
}

/// Apply `f` to every point (control and end points) of a path element.
pub(crate) fn map_points(el: PathEl, mut f: impl FnMut(Point) -> Point) -> PathEl {
    match el {
        PathEl::MoveTo(p) => PathEl::MoveTo(f(p)),
        PathEl::LineTo(p) => PathEl::LineTo(f(p)),
        PathEl::QuadTo(p1, p2) => PathEl::QuadTo(f(p1), f(p2)),
        PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(f(p1), f(p2), f(p3)),
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

/// Combine two path elements of the same kind point by point.
///
/// Returns `None` when the element kinds differ.
pub(crate) fn zip_points(
    a: PathEl,
    b: PathEl,
    mut f: impl FnMut(Point, Point) -> Point,
) -> Option<PathEl> {
    Some(match (a, b) {
        (PathEl::MoveTo(a), PathEl::MoveTo(b)) => PathEl::MoveTo(f(a, b)),
        (PathEl::LineTo(a), PathEl::LineTo(b)) => PathEl::LineTo(f(a, b)),
        (PathEl::QuadTo(a1, a2), PathEl::QuadTo(b1, b2)) => PathEl::QuadTo(f(a1, b1), f(a2, b2)),
        (PathEl::CurveTo(a1, a2, a3), PathEl::CurveTo(b1, b2, b3)) => {
            PathEl::CurveTo(f(a1, b1), f(a2, b2), f(a3, b3))
        }
        (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
        _ => return None,
    })
}

/// Single-letter SVG command name, used in diagnostics.
pub(crate) fn command_letter(el: &PathEl) -> char {
    match el {
        PathEl::MoveTo(_) => 'M',
        PathEl::LineTo(_) => 'L',
        PathEl::QuadTo(..) => 'Q',
        PathEl::CurveTo(..) => 'C',
        PathEl::ClosePath => 'Z',
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
