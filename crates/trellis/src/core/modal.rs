//! Modal execution.
//!
//! `exec_view` saves the group's current child, the top view and the command
//! set, runs the view's event loop until `end_modal` is accepted, then
//! restores all three. Nested calls nest on the Rust stack.

use tracing::{debug, info};

use crate::{
    backend::EventSource,
    commands::{self, Command, CommandSet},
    core::{
        bounds::Placement, dispatch::Dispatch, draw::Drawing, focus::FocusManager, id::ViewId,
        state::StateManager, world::Core,
    },
    error::{Error, Result},
    event::{Event, EventClass, Info},
    flags::{Options, State},
};

/// Idle callback run whenever the source has nothing pending.
pub type IdleHook = Box<dyn FnMut(&mut Core) -> Result<()> + Send>;

/// Input source and idle hook used while modal loops run.
pub struct RunContext {
    /// Where events come from.
    source: Box<dyn EventSource + Send>,
    /// Called when the source reports nothing pending.
    idle: Option<IdleHook>,
}

impl RunContext {
    /// Wrap an event source.
    pub fn new(source: impl EventSource + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
            idle: None,
        }
    }

    /// Run `hook` whenever the source is idle.
    pub fn with_idle(mut self, hook: impl FnMut(&mut Core) -> Result<()> + Send + 'static) -> Self {
        self.idle = Some(Box::new(hook));
        self
    }
}

/// Modal loops and their termination.
pub trait Modal {
    /// Next event: the put-back event first, then the source. Idle time is
    /// spent broadcasting `COMMAND_SET_CHANGED` if needed and running the
    /// idle hook.
    fn get_event(&mut self) -> Result<Event>;

    /// Run `view` modally inside `group` and return its result. An unowned
    /// view is inserted for the duration and removed afterwards. `None`
    /// returns `CANCEL` immediately.
    fn exec_view(&mut self, group: ViewId, view: Option<ViewId>) -> Result<Command>;

    /// Run the event loop of an already modal view. Plain views return
    /// `CANCEL`.
    fn execute(&mut self, id: ViewId) -> Result<Command>;

    /// Ask the modal loop `id` belongs to to finish with `command`.
    fn end_modal(&mut self, id: ViewId, command: Command) -> Result<()>;

    /// Does the view, and for groups every child, accept `command`?
    /// `RELEASED_FOCUS` only consults a group's current child.
    fn valid(&mut self, id: ViewId, command: Command) -> Result<bool>;

    /// Draw the root and run its event loop.
    fn run(&mut self) -> Result<Command>;
}

impl Modal for Core {
    fn get_event(&mut self) -> Result<Event> {
        loop {
            if let Some(ev) = self.pending.take() {
                return Ok(ev);
            }
            if self.commands.take_changed() {
                let root = self.root();
                self.message(root, Event::broadcast(commands::COMMAND_SET_CHANGED, Info::None))?;
            }
            let run = self.run.as_mut().ok_or(Error::NotRunning)?;
            if let Some(ev) = run.source.get_event()? {
                if let Some(size) = ev.resized() {
                    let root = self.root();
                    debug!(?size, "screen resized");
                    self.change_bounds(root, size.rect())?;
                }
                return Ok(ev);
            }
            if let Some(mut hook) = run.idle.take() {
                let out = hook(self);
                if let Some(run) = self.run.as_mut() {
                    run.idle.get_or_insert(hook);
                }
                out?;
            }
        }
    }

    fn exec_view(&mut self, group: ViewId, view: Option<ViewId>) -> Result<Command> {
        let Some(p) = view else {
            return Ok(commands::CANCEL);
        };
        self.group_ref(group)?;
        let node = self.node_ref(p)?;
        let saved = Saved {
            options: node.options,
            owner: node.owner,
            top: self.top_view,
            current: self.group_ref(group)?.current,
            commands: self.commands.clone(),
        };
        info!(group = ?group, view = ?p, "exec_view");

        self.node_mut(p)?.options.remove(Options::SELECTABLE);
        self.set_state(p, State::MODAL, true)?;
        if saved.owner.is_none() {
            self.insert(group, p)?;
        }
        if self.is_child(group, p) {
            self.set_current(group, Some(p))?;
        }
        self.top_view = Some(p);

        let result = self.execute(p);
        let restored = restore(self, group, p, saved);
        let command = result?;
        restored?;
        info!(view = ?p, command = %command, "exec_view done");
        Ok(command)
    }

    fn execute(&mut self, id: ViewId) -> Result<Command> {
        if !self.node_ref(id)?.is_group() {
            return Ok(commands::CANCEL);
        }
        loop {
            self.group_mut(id)?.end_state = None;
            let command = loop {
                let mut event = self.get_event()?;
                self.handle_event(id, &mut event)?;
                if !event.is_nothing()
                    && event
                        .class()
                        .intersects(EventClass::FOCUSED | EventClass::POSITIONAL)
                {
                    self.event_error(id, &event)?;
                }
                if let Some(c) = self.group_ref(id)?.end_state {
                    break c;
                }
            };
            if command == commands::CANCEL || self.valid(id, command)? {
                self.group_mut(id)?.end_state = None;
                return Ok(command);
            }
            debug!(view = ?id, command = %command, "modal end refused");
        }
    }

    fn end_modal(&mut self, id: ViewId, command: Command) -> Result<()> {
        let mut cur = Some(id);
        while let Some(v) = cur {
            let node = self.node_ref(v)?;
            if node.is_group() && node.state.contains(State::MODAL) {
                debug!(view = ?v, command = %command, "end_modal");
                self.group_mut(v)?.end_state = Some(command);
                return Ok(());
            }
            cur = node.owner();
        }
        match self.top_view.filter(|t| self.contains(*t)) {
            Some(top) if top != id => self.end_modal(top, command),
            _ => Err(Error::NoModalView),
        }
    }

    fn valid(&mut self, id: ViewId, command: Command) -> Result<bool> {
        if !self.call_kind(id, true, |kind, ctx| kind.valid(ctx, command))? {
            debug!(view = ?id, command = %command, "valid refused");
            return Ok(false);
        }
        let node = self.node_ref(id)?;
        if !node.is_group() {
            return Ok(true);
        }
        if command == commands::RELEASED_FOCUS {
            return match node.current() {
                Some(c) => self.valid(c, command),
                None => Ok(true),
            };
        }
        for c in node.children().iter().copied().collect::<Vec<_>>() {
            if !self.valid(c, command)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run(&mut self) -> Result<Command> {
        let root = self.root();
        self.set_state(root, State::MODAL, true)?;
        self.top_view = Some(root);
        self.redraw(root)?;
        self.execute(root)
    }
}

/// Context `exec_view` restores when the modal view finishes.
struct Saved {
    /// Options of the modal view.
    options: Options,
    /// Owner of the modal view before the call.
    owner: Option<ViewId>,
    /// Previous top view.
    top: Option<ViewId>,
    /// The group's current child.
    current: Option<ViewId>,
    /// Enabled commands.
    commands: CommandSet,
}

/// Undo the setup of `exec_view`. A saved current child that is no longer a
/// child of the group is treated as absent, and only then is a new current
/// child picked.
fn restore(core: &mut Core, group: ViewId, p: ViewId, saved: Saved) -> Result<()> {
    let pulled = saved.owner.is_none();
    let live = core.contains(group);
    let current = saved
        .current
        .filter(|c| live && core.is_child(group, *c) && !(pulled && *c == p));
    if live {
        if current.is_none() && saved.current.is_some() {
            debug!(group = ?group, "saved current is gone");
        }
        core.set_current(group, current)?;
    }
    if core.contains(p) {
        if pulled && core.is_child(group, p) {
            core.remove(group, p)?;
        }
        core.set_state(p, State::MODAL, false)?;
        core.node_mut(p)?.options = saved.options;
    }
    if live && current.is_none() {
        core.reset_current(group)?;
    }
    core.top_view = saved.top.filter(|t| core.contains(*t));
    core.set_commands(&saved.commands);
    Ok(())
}
