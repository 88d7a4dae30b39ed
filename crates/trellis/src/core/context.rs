//! The handle a view kind receives while one of its callbacks runs.

use crate::{
    commands::Command,
    core::{
        dispatch::Dispatch, draw::Drawing, focus::FocusManager, id::ViewId, modal::Modal,
        node::ViewNode, state::StateManager, world::Core,
    },
    error::Result,
    event::Event,
    flags::{Phase, State},
    palette::Attr,
};

/// Mutable access to the kernel on behalf of one view.
///
/// The view's own kind is checked out of the arena for the duration of the
/// callback, so kernel calls that would need it again skip it or defer.
pub struct Ctx<'a> {
    /// The kernel.
    core: &'a mut Core,
    /// The view whose callback is running.
    id: ViewId,
}

impl<'a> Ctx<'a> {
    /// Build a context for `id`.
    pub(crate) fn new(core: &'a mut Core, id: ViewId) -> Self {
        Self { core, id }
    }

    /// The view whose callback is running.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The kernel.
    pub fn core(&mut self) -> &mut Core {
        self.core
    }

    /// Shared access to the kernel.
    pub fn core_ref(&self) -> &Core {
        self.core
    }

    /// Arena data of this view.
    pub fn node(&self) -> Option<&ViewNode> {
        self.core.node(self.id)
    }

    /// This view's owner.
    pub fn owner(&self) -> Option<ViewId> {
        self.node().and_then(ViewNode::owner)
    }

    /// The current phase of this view's owner, if owned.
    pub fn owner_phase(&self) -> Option<Phase> {
        self.owner()
            .and_then(|o| self.core.node(o))
            .and_then(ViewNode::phase)
    }

    /// State flags of this view.
    pub fn state(&self) -> State {
        self.node().map(ViewNode::state).unwrap_or_default()
    }

    /// Change this view's state flags.
    pub fn set_state(&mut self, flags: State, enable: bool) -> Result<()> {
        self.core.set_state(self.id, flags, enable)
    }

    /// Make this view its owner's current child.
    pub fn select(&mut self) -> Result<()> {
        self.core.select(self.id)
    }

    /// Move focus to this view, subject to validation.
    pub fn focus(&mut self) -> Result<bool> {
        self.core.focus(self.id)
    }

    /// Redraw this view.
    pub fn draw(&mut self) -> Result<()> {
        self.core.draw_view(self.id)
    }

    /// Resolve a palette index of this view.
    pub fn color(&self, index: u8) -> Attr {
        self.core.get_color(self.id, index)
    }

    /// End the modal loop this view runs under.
    pub fn end_modal(&mut self, command: Command) -> Result<()> {
        self.core.end_modal(self.id, command)
    }

    /// Queue an event to be returned by the next `get_event`.
    pub fn put_event(&mut self, event: Event) {
        self.core.put_event(event);
    }

    /// Is the command currently enabled?
    pub fn command_enabled(&self, command: Command) -> bool {
        self.core.command_enabled(command)
    }

    /// Queue a command event from this view if the command is enabled.
    /// Returns whether it was queued.
    pub fn post_command(&mut self, command: Command) -> bool {
        self.core.post_command(self.id, command)
    }

    /// Deliver an event to `receiver` and return the view that consumed it.
    pub fn message(&mut self, receiver: ViewId, event: Event) -> Result<Option<ViewId>> {
        self.core.message(receiver, event)
    }

    /// Run `view` modally inside `group`.
    pub fn exec_view(&mut self, group: ViewId, view: Option<ViewId>) -> Result<Command> {
        self.core.exec_view(group, view)
    }
}
