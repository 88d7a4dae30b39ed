use crate::{Point, Rect};

/// An area with no location, expressed as width and height.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Expanse {
    /// Construct a new expanse.
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The number of cells covered.
    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// Is either dimension zero?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// A rectangle of this size at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    /// The size as a signed corner point, saturating at `i32::MAX`.
    pub fn as_point(&self) -> Point {
        Point::new(clamp_i32(self.w), clamp_i32(self.h))
    }

    /// Build an expanse from a signed point, treating negative components as zero.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x.max(0).unsigned_abs(), p.y.max(0).unsigned_abs())
    }

    /// Signed per-axis difference `self - other`.
    pub fn delta(&self, other: Self) -> Point {
        self.as_point() - other.as_point()
    }
}

/// Convert an unsigned dimension into a signed coordinate, saturating.
pub(crate) fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self::new(r.w, r.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_signed() {
        let a = Expanse::new(10, 4);
        let b = Expanse::new(6, 9);
        assert_eq!(a.delta(b), Point::new(4, -5));
        assert_eq!(Expanse::from_point(Point::new(-3, 7)), Expanse::new(0, 7));
        assert!(Expanse::new(0, 5).is_empty());
    }
}
