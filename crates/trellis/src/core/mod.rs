// Core modules - public
/// Backend interfaces and crossterm input.
pub mod backend;
/// Offscreen cell buffers.
pub mod canvas;
/// Command codes and command sets.
pub mod commands;
/// Kernel configuration.
pub mod config;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// State, option and mode flags.
pub mod flags;
/// Node data stored in the arena.
pub mod node;
/// Colors and palettes.
pub mod palette;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The view behavior trait and built-in kinds.
pub mod view;

// Core modules - internal
/// Geometry operations.
pub mod bounds;
/// Handler context.
pub mod context;
/// Event routing.
pub mod dispatch;
/// Drawing and exposure.
pub mod draw;
/// Selection and focus.
pub mod focus;
/// View ID types.
pub mod id;
/// Modal execution.
pub mod modal;
/// State flag side effects.
pub mod state;
/// The view arena.
pub mod world;

pub use config::Config;
pub use context::Ctx;
pub use id::ViewId;
pub use modal::RunContext;
pub use world::Core;
