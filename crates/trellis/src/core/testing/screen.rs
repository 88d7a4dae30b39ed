use std::sync::{Arc, Mutex};

use crate::{
    backend::{CursorState, ScreenWriter},
    canvas::{Canvas, Cell},
    error::{Error, Result},
    geom::{Expanse, Point, Rect},
};

/// One `write_buf` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    /// Screen area written.
    pub rect: Rect,
    /// Cells written, row-major.
    pub cells: Vec<Cell>,
}

/// Everything written to a [`CaptureScreen`].
#[derive(Debug, Clone)]
pub struct Capture {
    /// Writes in order.
    pub writes: Vec<Write>,
    /// Cursor reports in order.
    pub cursors: Vec<Option<CursorState>>,
    /// The screen as the writes left it.
    pub screen: Canvas,
}

impl Capture {
    /// Number of writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// One screen row as text.
    pub fn row_text(&self, y: i32) -> String {
        self.screen.row_text(y)
    }

    /// One screen cell.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.screen.get((x, y))
    }

    /// The last cursor report.
    pub fn cursor(&self) -> Option<CursorState> {
        self.cursors.last().copied().flatten()
    }

    /// Every screen cell covered by at least one write.
    pub fn touched(&self) -> Vec<Point> {
        let mut out: Vec<Point> = self
            .writes
            .iter()
            .flat_map(|w| {
                let r = w.rect;
                (r.tl.y..r.bottom()).flat_map(move |y| (r.tl.x..r.right()).map(move |x| Point::new(x, y)))
            })
            .collect();
        out.sort_by_key(|p| (p.y, p.x));
        out.dedup();
        out
    }

    /// Forget the write and cursor logs, keeping the screen.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.cursors.clear();
    }
}

/// A screen that records what it is sent.
#[derive(Debug)]
pub struct CaptureScreen {
    /// Shared record.
    log: Arc<Mutex<Capture>>,
}

impl CaptureScreen {
    /// Create a screen of the given size and the handle to its record.
    pub fn create(size: impl Into<Expanse>) -> (Arc<Mutex<Capture>>, Self) {
        let log = Arc::new(Mutex::new(Capture {
            writes: Vec::new(),
            cursors: Vec::new(),
            screen: Canvas::new(size.into()),
        }));
        (log.clone(), Self { log })
    }
}

impl ScreenWriter for CaptureScreen {
    fn write_buf(&mut self, x: i32, y: i32, w: u32, h: u32, cells: &[Cell]) -> Result<()> {
        let mut log = self.log.lock().map_err(|e| Error::Backend(e.to_string()))?;
        let rect = Rect::new(x, y, w, h);
        let mut block = Canvas::new(rect.size());
        for (i, cell) in cells.iter().enumerate() {
            let (cx, cy) = (i as u32 % w.max(1), i as u32 / w.max(1));
            block.put((cx as i32, cy as i32), *cell);
        }
        let clip = log.screen.size().rect();
        log.screen.blit(&block, rect.tl, clip);
        log.writes.push(Write {
            rect,
            cells: cells.to_vec(),
        });
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Option<CursorState>) -> Result<()> {
        self.log
            .lock()
            .map_err(|e| Error::Backend(e.to_string()))?
            .cursors
            .push(cursor);
        Ok(())
    }
}
