//! Common imports for working with a [`Core`](crate::Core).

pub use crate::{
    Config, Core, Ctx, RunContext, ViewId,
    bounds::Placement,
    canvas::{Canvas, Cell},
    commands::{self, Command, CommandSet},
    dispatch::Dispatch,
    draw::Drawing,
    error::{Error, Result},
    event::{Event, EventClass, EventKind, Info, Message, key, mouse},
    flags::{DragMode, GrowMode, Options, Phase, State},
    focus::FocusManager,
    geom::{Expanse, Point, Rect, Region},
    modal::Modal,
    palette::{Attr, Palette, PaletteScheme},
    state::StateManager,
    view::{DrawContext, PlainGroup, PlainView, ViewKind},
};
