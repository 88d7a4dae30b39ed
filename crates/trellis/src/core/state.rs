use tracing::trace;

use crate::{
    commands,
    core::{
        dispatch::Dispatch,
        draw::Drawing,
        focus::FocusManager,
        id::ViewId,
        world::{Core, Note},
    },
    error::Result,
    event::{Event, Info},
    flags::{HC_DRAGGING, HC_NO_CONTEXT, HelpCtx, Options, State},
};

/// State flag changes and the side effects each flag carries.
pub trait StateManager {
    /// Set or clear `flags` on a view and apply their side effects.
    ///
    /// - `VISIBLE` propagates exposure, draws the view or the area it
    ///   uncovered, and re-checks the owner's current child.
    /// - `CURSOR_VIS` and `CURSOR_BLOCK` update the cursor if the view is
    ///   focused.
    /// - `SHADOW` redraws the area under the view and its shadow.
    /// - `FOCUSED` updates the cursor and broadcasts `RECEIVED_FOCUS` or
    ///   `RELEASED_FOCUS` to the owner.
    ///
    /// Groups also relay `ACTIVE` and `DRAGGING` to every child, `FOCUSED`
    /// to the current child, and `EXPOSED` to visible children.
    fn set_state(&mut self, id: ViewId, flags: State, enable: bool) -> Result<()>;

    /// Are all of `flags` set?
    fn get_state(&self, id: ViewId, flags: State) -> bool;

    /// Set `VISIBLE`.
    fn show(&mut self, id: ViewId) -> Result<()>;

    /// Clear `VISIBLE`.
    fn hide(&mut self, id: ViewId) -> Result<()>;

    /// Set `CURSOR_VIS`.
    fn show_cursor(&mut self, id: ViewId) -> Result<()>;

    /// Clear `CURSOR_VIS`.
    fn hide_cursor(&mut self, id: ViewId) -> Result<()>;

    /// Set `CURSOR_BLOCK`.
    fn block_cursor(&mut self, id: ViewId) -> Result<()>;

    /// Clear `CURSOR_BLOCK`.
    fn normal_cursor(&mut self, id: ViewId) -> Result<()>;

    /// The help context to report for a view and its focused descendants.
    fn help_ctx(&self, id: ViewId) -> HelpCtx;
}

impl StateManager for Core {
    fn set_state(&mut self, id: ViewId, flags: State, enable: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        node.state.set(flags, enable);
        let owner = node.owner;
        let options = node.options;
        let is_group = node.is_group();
        trace!(view = ?id, ?flags, enable, "set_state");

        if let Some(owner) = owner {
            if flags.contains(State::VISIBLE) {
                if self.node_ref(owner)?.state.contains(State::EXPOSED) {
                    self.set_state(id, State::EXPOSED, enable)?;
                }
                if enable {
                    self.draw_view(id)?;
                } else {
                    let area = self.shadowed_bounds(id)?;
                    self.redraw_rect(owner, area)?;
                }
                if options.contains(Options::SELECTABLE) {
                    self.reset_current(owner)?;
                }
            }
            if flags.intersects(State::CURSOR_VIS | State::CURSOR_BLOCK)
                && self.get_state(id, State::FOCUSED)
            {
                self.reset_cursor()?;
            }
            if flags.contains(State::SHADOW) {
                let mut area = self.shadowed_bounds(id)?;
                if !enable {
                    let sh = self.config.shadow_size;
                    area.w = area.w.saturating_add(sh.w);
                    area.h = area.h.saturating_add(sh.h);
                }
                self.redraw_rect(owner, area)?;
            }
            if flags.contains(State::FOCUSED) {
                self.reset_cursor()?;
                let command = if enable {
                    commands::RECEIVED_FOCUS
                } else {
                    commands::RELEASED_FOCUS
                };
                self.message(owner, Event::broadcast(command, Info::View(id)))?;
            }
        }

        if is_group {
            let relay = flags & (State::ACTIVE | State::DRAGGING);
            if !relay.is_empty() {
                self.locked(id, |core| {
                    core.for_each(id, |core, child| core.set_state(child, relay, enable))
                })?;
            }
            if flags.contains(State::FOCUSED)
                && let Some(current) = self.node_ref(id)?.current()
            {
                self.set_state(current, State::FOCUSED, enable)?;
            }
            if flags.contains(State::EXPOSED) {
                self.for_each(id, |core, child| {
                    if core.get_state(child, State::VISIBLE) {
                        core.set_state(child, State::EXPOSED, enable)?;
                    }
                    Ok(())
                })?;
                if !enable {
                    self.group_mut(id)?.buffer = None;
                }
            }
        }

        self.notify(id, Note::StateChanged(flags, enable))?;
        Ok(())
    }

    fn get_state(&self, id: ViewId, flags: State) -> bool {
        self.node(id).is_some_and(|n| n.state.contains(flags))
    }

    fn show(&mut self, id: ViewId) -> Result<()> {
        if self.get_state(id, State::VISIBLE) {
            return Ok(());
        }
        self.set_state(id, State::VISIBLE, true)
    }

    fn hide(&mut self, id: ViewId) -> Result<()> {
        if !self.get_state(id, State::VISIBLE) {
            return Ok(());
        }
        self.set_state(id, State::VISIBLE, false)
    }

    fn show_cursor(&mut self, id: ViewId) -> Result<()> {
        self.set_state(id, State::CURSOR_VIS, true)
    }

    fn hide_cursor(&mut self, id: ViewId) -> Result<()> {
        self.set_state(id, State::CURSOR_VIS, false)
    }

    fn block_cursor(&mut self, id: ViewId) -> Result<()> {
        self.set_state(id, State::CURSOR_BLOCK, true)
    }

    fn normal_cursor(&mut self, id: ViewId) -> Result<()> {
        self.set_state(id, State::CURSOR_BLOCK, false)
    }

    fn help_ctx(&self, id: ViewId) -> HelpCtx {
        let Some(node) = self.node(id) else {
            return HC_NO_CONTEXT;
        };
        if node.state.contains(State::DRAGGING) {
            return HC_DRAGGING;
        }
        if let Some(current) = node.current() {
            let h = self.help_ctx(current);
            if h != HC_NO_CONTEXT {
                return h;
            }
        }
        node.help_ctx
    }
}
