//! Trellis: the kernel of a text-mode windowing toolkit.
//!
//! Views live in an arena owned by [`Core`]. Groups hold their children in
//! Z-order, track a current child, and route input to it. The entry points
//! are:
//! - [`Core`] - the arena, command set and screen
//! - [`ViewKind`](view::ViewKind) - the behavior trait every view carries
//! - [`Ctx`] - what a kind's callbacks receive
//!
//! Operations are grouped into traits implemented on `Core`; import them
//! with [`prelude`].

#![warn(missing_docs)]

mod core;

pub mod prelude;

/// Geometry primitives.
pub mod geom {
    pub use trellis_geom::*;
}

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    Config, Core, Ctx, RunContext, ViewId, backend, bounds, canvas, commands, config, context,
    dispatch, draw, error, event, flags, focus, modal, node, palette, state, view,
};
pub use error::{Error, Result};
