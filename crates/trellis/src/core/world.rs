use std::collections::VecDeque;

use scopeguard::guard;
use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    backend::{CursorState, NullScreen, ScreenWriter},
    commands::{Command, CommandSet},
    core::{
        config::Config,
        context::Ctx,
        dispatch::Dispatch,
        draw::{self, Drawing},
        focus::FocusManager,
        id::ViewId,
        modal::RunContext,
        node::{GroupData, ViewNode},
        state::StateManager,
        view::{RootView, ViewKind, as_any, as_any_mut},
    },
    error::{Error, Result},
    event::{Event, EventClass, EventKind, Info, Message},
    flags::{DragMode, GrowMode, HelpCtx, Options, State},
    geom::{Expanse, Point, Rect},
    palette::Palette,
};

/// A kind callback addressed to a view whose kind was checked out.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Note {
    /// `ViewKind::state_changed` with the flags and new value.
    StateChanged(State, bool),
    /// An unclaimed event, walked up the owner chain from the view.
    EventError(Event),
}

/// The view arena, command set and run state of one kernel instance.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<ViewId, ViewNode>,
    /// Root group.
    pub(crate) root: ViewId,
    /// Enabled commands.
    pub(crate) commands: CommandSet,
    /// Event put back for the next `get_event`.
    pub(crate) pending: Option<Event>,
    /// The innermost view running a modal loop.
    pub(crate) top_view: Option<ViewId>,
    /// Output device.
    pub(crate) screen: Box<dyn ScreenWriter>,
    /// Input and idle hook, present while attached.
    pub(crate) run: Option<RunContext>,
    /// Views whose draw was requested while their kind was checked out.
    pub(crate) deferred: Vec<ViewId>,
    /// Notifications waiting for their view's kind to come back.
    pub(crate) held: Vec<(ViewId, Note)>,
    /// Cursor last reported to the screen.
    pub(crate) cursor: Option<CursorState>,
    /// Settings the kernel was created with.
    pub(crate) config: Config,
}

impl Default for Core {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Core {
    /// Create a kernel with a root group sized to `config.size`.
    pub fn new(config: Config) -> Self {
        let mut nodes = SlotMap::with_key();
        let kind = RootView::new(config.palette.palette());
        let root = nodes.insert(new_node(
            Box::new(kind),
            config.size.rect(),
            true,
        ));
        if let Some(node) = nodes.get_mut(root) {
            node.state = State::VISIBLE
                | State::SELECTED
                | State::FOCUSED
                | State::ACTIVE
                | State::EXPOSED
                | State::MODAL;
        }
        let mut commands = CommandSet::full();
        for c in &config.disabled_commands {
            commands.disable(*c);
        }
        commands.take_changed();
        Self {
            nodes,
            root,
            commands,
            pending: None,
            top_view: Some(root),
            screen: Box::new(NullScreen),
            run: None,
            deferred: Vec::new(),
            held: Vec::new(),
            cursor: None,
            config,
        }
    }

    /// The root group.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Settings the kernel was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the output device.
    pub fn set_screen(&mut self, screen: impl ScreenWriter + 'static) {
        self.screen = Box::new(screen);
        self.cursor = None;
    }

    /// Install the input source and idle hook used by modal loops.
    pub fn attach(&mut self, run: RunContext) {
        self.run = Some(run);
    }

    /// Remove the installed run context.
    pub fn detach(&mut self) -> Option<RunContext> {
        self.run.take()
    }

    /// The innermost view running a modal loop.
    pub fn top_view(&self) -> Option<ViewId> {
        self.top_view
    }

    /// Create an unowned leaf view.
    pub fn add(&mut self, bounds: Rect, kind: impl Into<Box<dyn ViewKind>>) -> ViewId {
        self.add_node(bounds, kind.into(), false)
    }

    /// Create an unowned group.
    pub fn add_group(&mut self, bounds: Rect, kind: impl Into<Box<dyn ViewKind>>) -> ViewId {
        self.add_node(bounds, kind.into(), true)
    }

    /// Store a new node in the arena.
    fn add_node(&mut self, bounds: Rect, kind: Box<dyn ViewKind>, group: bool) -> ViewId {
        let id = self.nodes.insert(new_node(kind, bounds, group));
        trace!(view = ?id, group, "add view");
        id
    }

    /// Is the handle live?
    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Arena data for a view.
    pub fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    /// Arena data for a view, or `ViewNotFound`.
    pub(crate) fn node_ref(&self, id: ViewId) -> Result<&ViewNode> {
        self.nodes.get(id).ok_or(Error::ViewNotFound(id))
    }

    /// Mutable arena data for a view, or `ViewNotFound`.
    pub(crate) fn node_mut(&mut self, id: ViewId) -> Result<&mut ViewNode> {
        self.nodes.get_mut(id).ok_or(Error::ViewNotFound(id))
    }

    /// Group data for a view, or `NotAGroup`.
    pub(crate) fn group_ref(&self, id: ViewId) -> Result<&GroupData> {
        self.node_ref(id)?.group.as_ref().ok_or(Error::NotAGroup(id))
    }

    /// Mutable group data for a view, or `NotAGroup`.
    pub(crate) fn group_mut(&mut self, id: ViewId) -> Result<&mut GroupData> {
        self.node_mut(id)?.group.as_mut().ok_or(Error::NotAGroup(id))
    }

    /// Borrow a view's kind as its concrete type.
    pub fn kind<K: ViewKind>(&self, id: ViewId) -> Option<&K> {
        let kind = self.nodes.get(id)?.kind.as_deref()?;
        as_any(kind).downcast_ref::<K>()
    }

    /// Mutably borrow a view's kind as its concrete type.
    pub fn kind_mut<K: ViewKind>(&mut self, id: ViewId) -> Option<&mut K> {
        let kind = self.nodes.get_mut(id)?.kind.as_deref_mut()?;
        as_any_mut(kind).downcast_mut::<K>()
    }

    /// Check a kind out of its slot and run `f` with it and a context for
    /// the view. The kind goes back into its slot afterwards, even on unwind.
    pub(crate) fn with_kind_mut<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn ViewKind, &mut Ctx<'_>) -> R,
    ) -> Result<R> {
        let kind = self
            .node_mut(id)?
            .kind
            .take()
            .ok_or(Error::ReentrantView(id))?;
        let out = {
            let mut slot = guard((&mut *self, kind), |(core, kind)| {
                if let Some(node) = core.nodes.get_mut(id) {
                    node.kind = Some(kind);
                }
            });
            let (core, kind) = &mut *slot;
            let mut ctx = Ctx::new(core, id);
            f(kind.as_mut(), &mut ctx)
        };
        self.release_held()?;
        draw::flush_deferred(self)?;
        Ok(out)
    }

    /// Deliver a notification to a view. When its kind is checked out the
    /// note is held until the kind is back and counts as claimed.
    pub(crate) fn notify(&mut self, id: ViewId, note: Note) -> Result<bool> {
        let out = match note {
            Note::StateChanged(flags, enable) => self.with_kind_mut(id, |kind, ctx| {
                kind.state_changed(ctx, flags, enable).map(|()| true)
            }),
            Note::EventError(event) => {
                self.with_kind_mut(id, |kind, ctx| Ok(kind.event_error(ctx, &event)))
            }
        };
        match out {
            Ok(r) => r,
            Err(Error::ReentrantView(_)) => {
                debug!(view = ?id, ?note, "kind already executing, notification held");
                self.held.push((id, note));
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Deliver held notifications whose view has its kind back, in the order
    /// they were made.
    fn release_held(&mut self) -> Result<()> {
        if self.held.is_empty() {
            return Ok(());
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.held)
            .into_iter()
            .filter(|(v, _)| self.nodes.contains_key(*v))
            .partition(|(v, _)| self.nodes.get(*v).is_some_and(|n| n.kind.is_some()));
        self.held = waiting;
        for (id, note) in ready {
            trace!(view = ?id, ?note, "release held notification");
            match note {
                Note::StateChanged(..) => {
                    self.notify(id, note)?;
                }
                Note::EventError(event) => self.event_error(id, &event)?,
            }
        }
        Ok(())
    }

    /// Like `with_kind_mut`, but a kind that is already checked out further
    /// up the stack is skipped and `skipped` is returned.
    pub(crate) fn call_kind<R>(
        &mut self,
        id: ViewId,
        skipped: R,
        f: impl FnOnce(&mut dyn ViewKind, &mut Ctx<'_>) -> R,
    ) -> Result<R> {
        match self.with_kind_mut(id, f) {
            Err(Error::ReentrantView(_)) => {
                debug!(view = ?id, "kind already executing, callback skipped");
                Ok(skipped)
            }
            r => r,
        }
    }

    /// Set option flags.
    pub fn set_options(&mut self, id: ViewId, options: Options) -> Result<()> {
        self.node_mut(id)?.options = options;
        Ok(())
    }

    /// Set the classes the owner delivers to this view.
    pub fn set_event_mask(&mut self, id: ViewId, mask: EventClass) -> Result<()> {
        self.node_mut(id)?.event_mask = mask;
        Ok(())
    }

    /// Set the grow mode.
    pub fn set_grow_mode(&mut self, id: ViewId, mode: GrowMode) -> Result<()> {
        self.node_mut(id)?.grow_mode = mode;
        Ok(())
    }

    /// Set the drag mode.
    pub fn set_drag_mode(&mut self, id: ViewId, mode: DragMode) -> Result<()> {
        self.node_mut(id)?.drag_mode = mode;
        Ok(())
    }

    /// Set the help context.
    pub fn set_help_ctx(&mut self, id: ViewId, ctx: HelpCtx) -> Result<()> {
        self.node_mut(id)?.help_ctx = ctx;
        Ok(())
    }

    /// Replace the palette. `None` makes lookups through the view fail.
    pub fn set_palette(&mut self, id: ViewId, palette: Option<Palette>) -> Result<()> {
        self.node_mut(id)?.palette = palette;
        self.redraw(id)
    }

    /// Children of a group, front to back.
    pub fn children(&self, group: ViewId) -> Result<&VecDeque<ViewId>> {
        Ok(&self.group_ref(group)?.children)
    }

    /// The frontmost child of a group.
    pub fn first(&self, group: ViewId) -> Result<Option<ViewId>> {
        Ok(self.children(group)?.front().copied())
    }

    /// Position of `view` in its Z-order, 0 being the front.
    pub fn index_of(&self, group: ViewId, view: ViewId) -> Result<usize> {
        self.children(group)?
            .iter()
            .position(|c| *c == view)
            .ok_or(Error::NotAChild { group, view })
    }

    /// Is `view` a child of `group`?
    pub fn is_child(&self, group: ViewId, view: ViewId) -> bool {
        self.node(view).and_then(ViewNode::owner) == Some(group)
    }

    /// Is `ancestor` the view itself or one of its owners?
    pub fn is_ancestor(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut cur = Some(view);
        while let Some(v) = cur {
            if v == ancestor {
                return true;
            }
            cur = self.node(v).and_then(ViewNode::owner);
        }
        false
    }

    /// The sibling behind `view`, wrapping from the back to the front.
    pub fn next_view(&self, view: ViewId) -> Option<ViewId> {
        self.sibling(view, true)
    }

    /// The sibling in front of `view`, wrapping from the front to the back.
    pub fn prev_view(&self, view: ViewId) -> Option<ViewId> {
        self.sibling(view, false)
    }

    /// Cyclic neighbour in the owner's Z-order.
    fn sibling(&self, view: ViewId, forwards: bool) -> Option<ViewId> {
        let owner = self.node(view)?.owner?;
        let kids = self.children(owner).ok()?;
        let i = kids.iter().position(|c| *c == view)?;
        let n = kids.len();
        let j = if forwards { (i + 1) % n } else { (i + n - 1) % n };
        kids.get(j).copied()
    }

    /// The frontmost child satisfying `pred`.
    pub fn first_that(
        &self,
        group: ViewId,
        mut pred: impl FnMut(&ViewNode) -> bool,
    ) -> Result<Option<ViewId>> {
        Ok(self
            .children(group)?
            .iter()
            .copied()
            .find(|c| self.node(*c).is_some_and(&mut pred)))
    }

    /// The frontmost child with all of `state` and all of `options` set.
    pub fn first_match(
        &self,
        group: ViewId,
        state: State,
        options: Options,
    ) -> Result<Option<ViewId>> {
        self.first_that(group, |n| n.state.contains(state) && n.options.contains(options))
    }

    /// Run `f` on each child, front to back. Children removed by an earlier
    /// call are skipped.
    pub fn for_each(
        &mut self,
        group: ViewId,
        mut f: impl FnMut(&mut Self, ViewId) -> Result<()>,
    ) -> Result<()> {
        let kids: Vec<_> = self.children(group)?.iter().copied().collect();
        for c in kids {
            if self.is_child(group, c) {
                f(self, c)?;
            }
        }
        Ok(())
    }

    /// Insert `view` at the front of `group`.
    pub fn insert(&mut self, group: ViewId, view: ViewId) -> Result<()> {
        let target = self.first(group)?;
        self.insert_before(group, view, target)
    }

    /// Insert `view` in front of `target`, or at the back when `target` is
    /// `None`.
    pub fn insert_before(
        &mut self,
        group: ViewId,
        view: ViewId,
        target: Option<ViewId>,
    ) -> Result<()> {
        let gsize = self.node_ref(group)?.size();
        self.group_ref(group)?;
        if self.node_ref(view)?.owner.is_some() {
            return Err(Error::AlreadyOwned(view));
        }
        if self.is_ancestor(view, group) {
            return Err(Error::WouldCycle { group, view });
        }
        let index = match target {
            Some(t) => self.index_of(group, t)?,
            None => self.children(group)?.len(),
        };

        let node = self.node_mut(view)?;
        if node.options.contains(Options::CENTER_X) {
            node.bounds.tl.x = (i64::from(gsize.w) - i64::from(node.bounds.w)).div_euclid(2) as i32;
        }
        if node.options.contains(Options::CENTER_Y) {
            node.bounds.tl.y = (i64::from(gsize.h) - i64::from(node.bounds.h)).div_euclid(2) as i32;
        }
        let saved = node.state;
        node.state.remove(State::VISIBLE);
        node.owner = Some(group);

        let g = self.group_mut(group)?;
        if index == 0 {
            g.children.push_front(view);
        } else {
            g.children.insert(index, view);
        }
        g.buffer = None;
        debug!(group = ?group, view = ?view, index, "insert");

        if saved.contains(State::VISIBLE) {
            self.set_state(view, State::VISIBLE, true)?;
        }
        if saved.contains(State::ACTIVE) {
            self.set_state(view, State::ACTIVE, true)?;
        }
        Ok(())
    }

    /// Detach `view` from `group`. The view stays in the arena, unowned.
    pub fn remove(&mut self, group: ViewId, view: ViewId) -> Result<()> {
        if !self.is_child(group, view) {
            return Err(Error::NotAChild { group, view });
        }
        let saved = self.node_ref(view)?.state;
        self.set_state(view, State::VISIBLE, false)?;
        if self.group_ref(group)?.current == Some(view) {
            self.set_current(group, None)?;
            self.reset_current(group)?;
        }

        let g = self.group_mut(group)?;
        g.children.retain(|c| *c != view);
        g.buffer = None;
        let node = self.node_mut(view)?;
        node.owner = None;
        if saved.contains(State::VISIBLE) {
            node.state.insert(State::VISIBLE);
        }
        debug!(group = ?group, view = ?view, "remove");
        Ok(())
    }

    /// Drop an unowned view and its whole subtree from the arena.
    pub fn destroy(&mut self, view: ViewId) -> Result<()> {
        if view == self.root {
            return Err(Error::RootView(view));
        }
        if self.node_ref(view)?.owner.is_some() {
            return Err(Error::StillOwned(view));
        }
        let mut stack = vec![view];
        while let Some(v) = stack.pop() {
            if let Some(node) = self.nodes.remove(v) {
                stack.extend(node.children().iter().copied());
                trace!(view = ?v, "destroy");
            }
        }
        self.deferred.retain(|v| self.nodes.contains_key(*v));
        self.held.retain(|(v, _)| self.nodes.contains_key(*v));
        if self.top_view.is_some_and(|t| !self.nodes.contains_key(t)) {
            self.top_view = Some(self.root);
        }
        Ok(())
    }

    /// Move `view` in front of `target`, or to the back when `target` is
    /// `None`. Both must share an owner.
    pub fn put_in_front_of(&mut self, view: ViewId, target: Option<ViewId>) -> Result<()> {
        let Some(owner) = self.node_ref(view)?.owner else {
            debug!(view = ?view, "put_in_front_of on unowned view ignored");
            return Ok(());
        };
        if let Some(t) = target
            && !self.is_child(owner, t)
        {
            return Err(Error::NotAChild {
                group: owner,
                view: t,
            });
        }
        if target == Some(view) {
            return Ok(());
        }
        let g = self.group_mut(owner)?;
        let from = g
            .children
            .iter()
            .position(|c| *c == view)
            .ok_or(Error::NotAChild { group: owner, view })?;
        g.children.remove(from);
        let to = match target {
            Some(t) => g.children.iter().position(|c| *c == t).unwrap_or(0),
            None => g.children.len(),
        };
        g.children.insert(to, view);
        if from == to {
            return Ok(());
        }
        g.buffer = None;
        trace!(view = ?view, from, to, "reorder");

        let (state, options) = {
            let node = self.node_ref(view)?;
            (node.state, node.options)
        };
        if state.contains(State::VISIBLE) {
            let area = self.shadowed_bounds(view)?;
            self.redraw_rect(owner, area)?;
            if options.contains(Options::SELECTABLE) {
                self.reset_current(owner)?;
            }
        }
        Ok(())
    }

    /// Move `view` to the front of its owner.
    pub fn make_first(&mut self, view: ViewId) -> Result<()> {
        let Some(owner) = self.node_ref(view)?.owner else {
            return Ok(());
        };
        let first = self.first(owner)?;
        self.put_in_front_of(view, first)
    }

    /// Owner-relative bounds grown by the shadow when the view casts one.
    pub(crate) fn shadowed_bounds(&self, view: ViewId) -> Result<Rect> {
        let node = self.node_ref(view)?;
        let mut r = node.bounds;
        if node.state.contains(State::SHADOW) {
            r.w = r.w.saturating_add(self.config.shadow_size.w);
            r.h = r.h.saturating_add(self.config.shadow_size.h);
        }
        Ok(r)
    }

    /// Enabled commands.
    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Is the command enabled?
    pub fn command_enabled(&self, command: Command) -> bool {
        self.commands.enabled(command)
    }

    /// Enable commands.
    pub fn enable_commands(&mut self, commands: &[Command]) {
        for c in commands {
            self.commands.enable(*c);
        }
    }

    /// Disable commands.
    pub fn disable_commands(&mut self, commands: &[Command]) {
        for c in commands {
            self.commands.disable(*c);
        }
    }

    /// Enable or disable one command.
    pub fn set_cmd_state(&mut self, command: Command, enable: bool) {
        self.commands.put(command, enable);
    }

    /// Replace the whole enabled set.
    pub fn set_commands(&mut self, commands: &CommandSet) {
        self.commands.assign(commands);
    }

    /// Queue an event for the next `get_event`. Only one event is held; a
    /// second call replaces the first.
    pub fn put_event(&mut self, event: Event) {
        if let Some(old) = self.pending.replace(event) {
            debug!(dropped = ?old.class(), "pending event replaced");
        }
    }

    /// Queue a command event on behalf of `from` if the command is enabled.
    pub fn post_command(&mut self, from: ViewId, command: Command) -> bool {
        if !self.commands.enabled(command) {
            trace!(command = %command, "disabled command not posted");
            return false;
        }
        self.put_event(Event::new(EventKind::Command(Message {
            command,
            info: Info::View(from),
        })));
        true
    }

    /// Size of the root view.
    pub fn size(&self) -> Expanse {
        self.nodes.get(self.root).map(ViewNode::size).unwrap_or_default()
    }

    /// Set a view's cursor position, in local coordinates.
    pub fn set_cursor(&mut self, id: ViewId, at: impl Into<Point>) -> Result<()> {
        self.node_mut(id)?.cursor = at.into();
        self.reset_cursor()
    }
}

/// A fresh node for `kind`, copying the kind's initial settings.
fn new_node(kind: Box<dyn ViewKind>, bounds: Rect, group: bool) -> ViewNode {
    ViewNode {
        name: kind.name(),
        owner: None,
        bounds,
        state: State::VISIBLE,
        options: kind.options(),
        event_mask: kind.event_mask(),
        grow_mode: kind.grow_mode(),
        drag_mode: DragMode::LIMIT_LO_Y,
        help_ctx: kind.help_ctx(),
        palette: kind.palette(),
        cursor: Point::zero(),
        snapshot: None,
        group: group.then(GroupData::default),
        kind: Some(kind),
    }
}
