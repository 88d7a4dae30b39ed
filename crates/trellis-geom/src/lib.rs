//! Geometry primitives used across trellis.

#![warn(missing_docs)]

/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Sets of disjoint rectangles.
mod region;

pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;
pub use region::Region;
