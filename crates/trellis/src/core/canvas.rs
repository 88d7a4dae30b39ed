//! Character/attribute cell buffers.

use crate::{
    geom::{Expanse, Point, Rect},
    palette::Attr,
};

/// A screen cell: one character and its display attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Glyph.
    pub ch: char,
    /// Display attribute.
    pub attr: Attr,
}

impl Cell {
    /// Construct a cell.
    pub const fn new(ch: char, attr: Attr) -> Self {
        Self { ch, attr }
    }

    /// A space in the normal attribute.
    pub const fn blank() -> Self {
        Self::new(' ', Attr::NORMAL)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

/// A rectangular buffer of cells in view-local coordinates.
///
/// A canvas covers an `area` of its view, which need not start at the
/// origin: a render clipped to part of a large view only allocates that
/// part. Writes outside the area are clipped silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// The covered cells, in view-local coordinates.
    area: Rect,
    /// Row-major cell storage.
    cells: Vec<Cell>,
}

impl Canvas {
    /// A blank canvas of `size` at the origin.
    pub fn new(size: Expanse) -> Self {
        Self::filled(size, Cell::blank())
    }

    /// A canvas of `size` at the origin filled with `cell`.
    pub fn filled(size: Expanse, cell: Cell) -> Self {
        Self::window_filled(size.rect(), cell)
    }

    /// A blank canvas covering `area`.
    pub fn window(area: Rect) -> Self {
        Self::window_filled(area, Cell::blank())
    }

    /// A canvas covering `area` filled with `cell`. An area too large to
    /// address yields an empty canvas.
    pub fn window_filled(area: Rect, cell: Cell) -> Self {
        match usize::try_from(area.size().area()) {
            Ok(n) => Self {
                area,
                cells: vec![cell; n],
            },
            Err(_) => Self {
                area: Rect::new(area.tl.x, area.tl.y, 0, 0),
                cells: Vec::new(),
            },
        }
    }

    /// The covered cells.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Buffer size.
    pub fn size(&self) -> Expanse {
        self.area.size()
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Offset of a local point, if it lies inside the buffer.
    fn offset(&self, p: Point) -> Option<usize> {
        if !self.area.contains_point(p) {
            return None;
        }
        let x = u64::from((p.x - self.area.tl.x).unsigned_abs());
        let y = u64::from((p.y - self.area.tl.y).unsigned_abs());
        let o = usize::try_from(y * u64::from(self.area.w) + x).ok()?;
        (o < self.cells.len()).then_some(o)
    }

    /// The cell at a local point.
    pub fn get(&self, p: impl Into<Point>) -> Option<Cell> {
        self.offset(p.into()).and_then(|o| self.cells.get(o).copied())
    }

    /// Write one cell.
    pub fn put(&mut self, p: impl Into<Point>, cell: Cell) {
        if let Some(c) = self.offset(p.into()).and_then(|o| self.cells.get_mut(o)) {
            *c = cell;
        }
    }

    /// Fill a rectangle with `cell`.
    pub fn fill(&mut self, r: Rect, cell: Cell) {
        let Some(r) = r.intersect(&self.area) else {
            return;
        };
        for y in r.tl.y..r.bottom() {
            for x in r.tl.x..r.right() {
                self.put((x, y), cell);
            }
        }
    }

    /// Write a string on one row, starting at `p`.
    pub fn text(&mut self, p: impl Into<Point>, s: &str, attr: Attr) {
        let p = p.into();
        for (x, ch) in (p.x..).zip(s.chars()) {
            if x >= self.area.right() {
                break;
            }
            self.put((x, p.y), Cell::new(ch, attr));
        }
    }

    /// Replace only the attribute of cells inside `r`.
    pub fn tint(&mut self, r: Rect, attr: Attr) {
        let Some(r) = r.intersect(&self.area) else {
            return;
        };
        for y in r.tl.y..r.bottom() {
            for x in r.tl.x..r.right() {
                if let Some(c) = self.offset(Point::new(x, y)).and_then(|o| self.cells.get_mut(o)) {
                    c.attr = attr;
                }
            }
        }
    }

    /// Copy `src` onto this canvas with its origin at `at`, limited to
    /// `clip` (in this canvas's coordinates).
    pub fn blit(&mut self, src: &Self, at: Point, clip: Rect) {
        let Some(area) = src
            .area
            .translate(at)
            .intersect(&clip)
            .and_then(|r| r.intersect(&self.area))
        else {
            return;
        };
        for y in area.tl.y..area.bottom() {
            for x in area.tl.x..area.right() {
                if let Some(c) = src.get(Point::new(x, y) - at) {
                    self.put((x, y), c);
                }
            }
        }
    }

    /// Copy out a sub-rectangle as row-major cells. Parts outside the
    /// buffer come back blank.
    pub fn extract(&self, r: Rect) -> Vec<Cell> {
        let mut out = Vec::with_capacity(usize::try_from(r.size().area()).unwrap_or(0));
        for y in r.tl.y..r.bottom() {
            for x in r.tl.x..r.right() {
                out.push(self.get((x, y)).unwrap_or_default());
            }
        }
        out
    }

    /// One row of the covered area as a string, for tests and debugging.
    pub fn row_text(&self, y: i32) -> String {
        (self.area.tl.x..self.area.right())
            .filter_map(|x| self.get((x, y)).map(|c| c.ch))
            .collect()
    }
}
