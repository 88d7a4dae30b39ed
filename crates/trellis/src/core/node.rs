use std::collections::VecDeque;

use crate::{
    canvas::Canvas,
    commands::Command,
    core::{id::ViewId, view::ViewKind},
    event::EventClass,
    flags::{DragMode, GrowMode, HelpCtx, Options, Phase, State},
    geom::{Expanse, Point, Rect},
    palette::Palette,
};

/// What plain views report as their children.
static NO_CHILDREN: VecDeque<ViewId> = VecDeque::new();

/// View data stored in the arena.
pub struct ViewNode {
    /// Behavior, taken out of the slot while a callback runs.
    pub(crate) kind: Option<Box<dyn ViewKind>>,
    /// Name used in logs and debugging output.
    pub(crate) name: String,
    /// Containing group. Non-owning; the group owns the view.
    pub(crate) owner: Option<ViewId>,
    /// Owner-relative bounds.
    pub(crate) bounds: Rect,
    /// State flags.
    pub(crate) state: State,
    /// Option flags.
    pub(crate) options: Options,
    /// Classes the owner will deliver to this view.
    pub(crate) event_mask: EventClass,
    /// Resize behavior relative to the owner.
    pub(crate) grow_mode: GrowMode,
    /// Drag behavior relative to the owner.
    pub(crate) drag_mode: DragMode,
    /// Help context reported when this view is focused.
    pub(crate) help_ctx: HelpCtx,
    /// Cached palette; `None` makes every color lookup through this view fail.
    pub(crate) palette: Option<Palette>,
    /// Cursor position in view-local coordinates.
    pub(crate) cursor: Point,
    /// The kind's own drawing from its latest render, painted in its place
    /// while the kind is checked out.
    pub(crate) snapshot: Option<Canvas>,
    /// Group data, present only for groups.
    pub(crate) group: Option<GroupData>,
}

/// Data only groups carry.
#[derive(Debug, Default)]
pub struct GroupData {
    /// Children in Z-order, front to back.
    pub(crate) children: VecDeque<ViewId>,
    /// The selected child.
    pub(crate) current: Option<ViewId>,
    /// Focused-event dispatch phase.
    pub(crate) phase: Phase,
    /// Cached full render for buffered groups.
    pub(crate) buffer: Option<Canvas>,
    /// Lock nesting depth.
    pub(crate) lock_flag: u32,
    /// A draw was requested while locked.
    pub(crate) pending_draw: bool,
    /// Result code set by `end_modal` while this group runs a modal loop.
    pub(crate) end_state: Option<Command>,
}

impl ViewNode {
    /// Return the view name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the owning group, if any.
    pub fn owner(&self) -> Option<ViewId> {
        self.owner
    }

    /// Return the owner-relative bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Return the self-relative bounds, always `(0, 0)` to the size.
    pub fn extent(&self) -> Rect {
        self.bounds.extent()
    }

    /// Return the size.
    pub fn size(&self) -> Expanse {
        self.bounds.size()
    }

    /// Return the owner-relative origin.
    pub fn origin(&self) -> Point {
        self.bounds.tl
    }

    /// Return the state flags.
    pub fn state(&self) -> State {
        self.state
    }

    /// Return the option flags.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Return the event mask.
    pub fn event_mask(&self) -> EventClass {
        self.event_mask
    }

    /// Return the grow mode.
    pub fn grow_mode(&self) -> GrowMode {
        self.grow_mode
    }

    /// Return the drag mode.
    pub fn drag_mode(&self) -> DragMode {
        self.drag_mode
    }

    /// Return the palette, if any.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Return the cursor position in local coordinates.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Is this view a group?
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// Children front to back; empty for plain views.
    pub fn children(&self) -> &VecDeque<ViewId> {
        self.group.as_ref().map_or(&NO_CHILDREN, |g| &g.children)
    }

    /// The selected child of a group.
    pub fn current(&self) -> Option<ViewId> {
        self.group.as_ref().and_then(|g| g.current)
    }

    /// The focused-event dispatch phase of a group.
    pub fn phase(&self) -> Option<Phase> {
        self.group.as_ref().map(|g| g.phase)
    }

    /// Lock nesting depth of a group.
    pub fn lock_count(&self) -> u32 {
        self.group.as_ref().map_or(0, |g| g.lock_flag)
    }

    /// Does the group hold a valid cached render?
    pub fn has_buffer(&self) -> bool {
        self.group.as_ref().is_some_and(|g| g.buffer.is_some())
    }

    /// The pending modal result of a group.
    pub fn end_state(&self) -> Option<Command> {
        self.group.as_ref().and_then(|g| g.end_state)
    }
}
