use crate::{Expanse, Point, expanse::clamp_i32};

/// A rectangle with a signed origin and unsigned size.
///
/// The right and bottom edges are exclusive: a rect at `(0, 0)` with width 10
/// covers columns `0..10`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// Construct a rectangle from its top-left and exclusive bottom-right
    /// corners. Inverted corners produce an empty rectangle at `a`.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            tl: a,
            w: b.x.saturating_sub(a.x).max(0).unsigned_abs(),
            h: b.y.saturating_sub(a.y).max(0).unsigned_abs(),
        }
    }

    /// A zero-sized rect at the origin.
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Does this rect cover no cells?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.tl.x.saturating_add(clamp_i32(self.w))
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.tl.y.saturating_add(clamp_i32(self.h))
    }

    /// Exclusive bottom-right corner.
    pub fn br(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// The size of this rect.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// This rect's size positioned at the origin.
    pub fn extent(&self) -> Self {
        Self::new(0, 0, self.w, self.h)
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose the other? Empty rects are
    /// contained everywhere.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.tl.x >= self.tl.x
                && other.tl.y >= self.tl.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Intersection of two rects, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let a = Point::new(self.tl.x.max(other.tl.x), self.tl.y.max(other.tl.y));
        let b = Point::new(
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        if b.x <= a.x || b.y <= a.y {
            return None;
        }
        Some(Self::from_corners(a, b))
    }

    /// Do the two rects share at least one cell?
    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// The smallest rect enclosing both. Empty operands are ignored.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self::from_corners(
            Point::new(self.tl.x.min(other.tl.x), self.tl.y.min(other.tl.y)),
            Point::new(
                self.right().max(other.right()),
                self.bottom().max(other.bottom()),
            ),
        )
    }

    /// Move the rect by an offset.
    pub fn translate(&self, by: Point) -> Self {
        Self {
            tl: self.tl + by,
            w: self.w,
            h: self.h,
        }
    }

    /// Grow the rect outward on all sides by `dx` columns and `dy` rows.
    /// Negative values shrink it, bottoming out at zero size.
    pub fn grow(&self, dx: i32, dy: i32) -> Self {
        Self::from_corners(self.tl.shift(-dx, -dy), self.br().shift(dx, dy))
    }

    /// Rebase a point to be relative to this rect's origin.
    pub fn rebase(&self, p: Point) -> Point {
        p - self.tl
    }
}

impl From<Expanse> for Rect {
    fn from(e: Expanse) -> Self {
        e.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 5);
        let b = Rect::new(2, 2, 10, 5);
        assert_eq!(a.intersect(&b), Some(Rect::new(2, 2, 8, 3)));
        assert_eq!(a.intersect(&Rect::new(10, 0, 2, 2)), None);
        assert_eq!(
            Rect::new(-5, -5, 10, 10).intersect(&a),
            Some(Rect::new(0, 0, 5, 5))
        );
    }

    #[test]
    fn containment() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(r.contains_point(Point::new(2, 2)));
        assert!(r.contains_point(Point::new(4, 4)));
        assert!(!r.contains_point(Point::new(5, 4)));
        assert!(r.contains_rect(&Rect::new(3, 3, 2, 2)));
        assert!(!r.contains_rect(&Rect::new(3, 3, 3, 2)));
        assert!(r.contains_rect(&Rect::new(100, 100, 0, 0)));
    }

    #[test]
    fn corners_and_union() {
        let r = Rect::from_corners(Point::new(1, 2), Point::new(4, 3));
        assert_eq!(r, Rect::new(1, 2, 3, 1));
        assert!(Rect::from_corners(Point::new(4, 4), Point::new(1, 1)).is_empty());
        assert_eq!(
            Rect::new(0, 0, 2, 2).union(&Rect::new(5, 5, 1, 1)),
            Rect::new(0, 0, 6, 6)
        );
        assert_eq!(Rect::new(1, 1, 2, 2).grow(1, 0), Rect::new(0, 1, 4, 2));
        assert_eq!(Rect::new(1, 1, 2, 2).grow(-2, 0).w, 0);
    }
}
