//! The driver boundary: where events come from and where cells go.

pub mod crossterm;

use crate::{canvas::Cell, error::Result, event::Event, geom::Point};

/// Where input comes from.
pub trait EventSource {
    /// Return the next event, `None` when nothing is pending right now.
    /// Returning `Error::SourceClosed` ends every running modal loop.
    fn get_event(&mut self) -> Result<Option<Event>>;
}

/// Hardware cursor placement reported to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// Screen position.
    pub position: Point,
    /// Block instead of underline.
    pub block: bool,
}

/// Where cells go.
pub trait ScreenWriter {
    /// Write a `w` x `h` block of cells, row-major, with its top left at
    /// screen position `(x, y)`.
    fn write_buf(&mut self, x: i32, y: i32, w: u32, h: u32, cells: &[Cell]) -> Result<()>;

    /// Show the cursor at a position, or hide it.
    fn set_cursor(&mut self, cursor: Option<CursorState>) -> Result<()>;

    /// Push buffered output to the device.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A screen that discards all output.
#[derive(Debug, Default)]
pub struct NullScreen;

impl ScreenWriter for NullScreen {
    fn write_buf(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _cells: &[Cell]) -> Result<()> {
        Ok(())
    }

    fn set_cursor(&mut self, _cursor: Option<CursorState>) -> Result<()> {
        Ok(())
    }
}
