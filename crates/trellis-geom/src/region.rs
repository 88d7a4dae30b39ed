use crate::{Point, Rect};

/// A set of disjoint rectangles.
///
/// Regions track the visible part of a view after occluding siblings have
/// been cut away. Rects are kept non-overlapping and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    /// Disjoint, non-empty member rects.
    rects: Vec<Rect>,
}

impl Region {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A region covering a single rect.
    pub fn from_rect(r: Rect) -> Self {
        let mut rects = Vec::new();
        if !r.is_empty() {
            rects.push(r);
        }
        Self { rects }
    }

    /// The member rects.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Does the region cover no cells?
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total number of cells covered.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(|r| r.size().area()).sum()
    }

    /// Is the point covered by the region?
    pub fn contains_point(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains_point(p))
    }

    /// Remove every cell covered by `cut`.
    pub fn subtract(&mut self, cut: &Rect) {
        if cut.is_empty() {
            return;
        }
        let mut out = Vec::with_capacity(self.rects.len());
        for r in &self.rects {
            split_around(r, cut, &mut out);
        }
        self.rects = out;
    }

    /// Clip the region to `bound`.
    pub fn intersect(&mut self, bound: &Rect) {
        self.rects = self.rects.iter().filter_map(|r| r.intersect(bound)).collect();
    }

    /// Add the cells of `r`, keeping members disjoint.
    pub fn add(&mut self, r: Rect) {
        let mut fresh = Self::from_rect(r);
        for existing in &self.rects {
            fresh.subtract(existing);
        }
        self.rects.extend(fresh.rects);
    }

    /// Move every member rect by an offset.
    pub fn translate(&mut self, by: Point) {
        for r in &mut self.rects {
            *r = r.translate(by);
        }
    }
}

/// Push the parts of `r` not covered by `cut` onto `out`. At most four
/// pieces are produced: full-width bands above and below the cut, and the
/// left and right remainders beside it.
fn split_around(r: &Rect, cut: &Rect, out: &mut Vec<Rect>) {
    let Some(hole) = r.intersect(cut) else {
        out.push(*r);
        return;
    };
    let pieces = [
        Rect::from_corners(r.tl, Point::new(r.right(), hole.tl.y)),
        Rect::from_corners(Point::new(r.tl.x, hole.bottom()), r.br()),
        Rect::from_corners(
            Point::new(r.tl.x, hole.tl.y),
            Point::new(hole.tl.x, hole.bottom()),
        ),
        Rect::from_corners(
            Point::new(hole.right(), hole.tl.y),
            Point::new(r.right(), hole.bottom()),
        ),
    ];
    out.extend(pieces.into_iter().filter(|p| !p.is_empty()));
}
