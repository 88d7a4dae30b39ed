//! Bit flags describing view state, options and resize behavior.

bitflags::bitflags! {
    /// Visual and interaction state of a view.
    ///
    /// Flags are changed through `StateManager::set_state`, which applies the
    /// side effects each flag carries. Writing them directly skips those.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct State: u16 {
        /// The view is shown when its owner is shown.
        const VISIBLE = 0x001;
        /// The hardware cursor is shown while the view is focused.
        const CURSOR_VIS = 0x002;
        /// Block cursor instead of underline.
        const CURSOR_BLOCK = 0x004;
        /// The view casts a shadow.
        const SHADOW = 0x008;
        /// The view belongs to the active window.
        const ACTIVE = 0x010;
        /// The view is its owner's current child.
        const SELECTED = 0x020;
        /// The view is on the focus chain.
        const FOCUSED = 0x040;
        /// The view is being dragged.
        const DRAGGING = 0x080;
        /// The view ignores focused and positional input.
        const DISABLED = 0x100;
        /// The view is the root of the running event loop.
        const MODAL = 0x200;
        /// The view is the default button of a dialog.
        const DEFAULT = 0x400;
        /// The view is inserted into an exposed owner and visible.
        const EXPOSED = 0x800;
    }
}

bitflags::bitflags! {
    /// Behavior options of a view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Options: u16 {
        /// The view can become its owner's current child.
        const SELECTABLE = 0x001;
        /// Selecting the view also moves it to the front.
        const TOP_SELECT = 0x002;
        /// The click that selects the view is also delivered to it.
        const FIRST_CLICK = 0x004;
        /// The view draws a frame.
        const FRAMED = 0x008;
        /// The view sees focused events before the current child.
        const PRE_PROCESS = 0x010;
        /// The view sees focused events the current child left unhandled.
        const POST_PROCESS = 0x020;
        /// The group caches its last full render.
        const BUFFERED = 0x040;
        /// The view takes part in tile/cascade arrangements.
        const TILEABLE = 0x080;
        /// Center horizontally in the owner on insertion.
        const CENTER_X = 0x100;
        /// Center vertically in the owner on insertion.
        const CENTER_Y = 0x200;
        /// Ask the current view to release focus before moving it.
        const VALIDATE = 0x400;
        /// Center on both axes.
        const CENTERED = Self::CENTER_X.bits() | Self::CENTER_Y.bits();
    }
}

bitflags::bitflags! {
    /// How a view's edges follow a resize of its owner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GrowMode: u8 {
        /// Left edge keeps its distance from the owner's right edge.
        const LO_X = 0x01;
        /// Top edge keeps its distance from the owner's bottom edge.
        const LO_Y = 0x02;
        /// Right edge keeps its distance from the owner's right edge.
        const HI_X = 0x04;
        /// Bottom edge keeps its distance from the owner's bottom edge.
        const HI_Y = 0x08;
        /// All edges follow the owner.
        const ALL = 0x0f;
        /// Edges scale proportionally instead of shifting.
        const REL = 0x10;
    }
}

bitflags::bitflags! {
    /// How a view may be dragged or resized by the user.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DragMode: u8 {
        /// The view can be moved.
        const MOVE = 0x01;
        /// The view can be resized.
        const GROW = 0x02;
        /// Left edge may not leave the owner.
        const LIMIT_LO_X = 0x10;
        /// Top edge may not leave the owner.
        const LIMIT_LO_Y = 0x20;
        /// Right edge may not leave the owner.
        const LIMIT_HI_X = 0x40;
        /// Bottom edge may not leave the owner.
        const LIMIT_HI_Y = 0x80;
        /// No edge may leave the owner.
        const LIMIT_ALL = 0xf0;
    }
}

/// Dispatch phase of a group delivering a focused event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Children with `PRE_PROCESS` are being offered the event.
    PreProcess,
    /// The current child is being offered the event. Also the resting value.
    #[default]
    Focused,
    /// Children with `POST_PROCESS` are being offered the event.
    PostProcess,
}

/// Help context identifier.
pub type HelpCtx = u16;

/// No help context.
pub const HC_NO_CONTEXT: HelpCtx = 0;
/// Reported by any view that is being dragged.
pub const HC_DRAGGING: HelpCtx = 1;
