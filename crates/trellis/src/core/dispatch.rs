//! Event routing through the view tree.
//!
//! A view handles an event in three steps: the kernel's base handling
//! (click-to-focus), its group routing if it is a group, then its kind's
//! `handle_event`. Groups route by class:
//!
//! - positional events go to the frontmost visible child under the pointer;
//! - focused events go to `PRE_PROCESS` children, then the current child,
//!   then `POST_PROCESS` children, stopping once consumed;
//! - broadcasts and user messages go to every child.

use scopeguard::guard;
use tracing::{debug, trace};

use crate::{
    core::{
        bounds::Placement,
        focus::FocusManager,
        id::ViewId,
        world::{Core, Note},
    },
    error::Result,
    event::{Event, EventClass, EventKind},
    flags::{Options, Phase, State},
};

/// Event delivery.
pub trait Dispatch {
    /// Handle an event at `id`. Consumed events are cleared and carry the
    /// consuming view.
    fn handle_event(&mut self, id: ViewId, event: &mut Event) -> Result<()>;

    /// Deliver a fresh event to `receiver` and return the view that
    /// consumed it.
    fn message(&mut self, receiver: ViewId, event: Event) -> Result<Option<ViewId>>;

    /// Offer unconsumed input to `id` and its owners' `event_error` hooks.
    fn event_error(&mut self, id: ViewId, event: &Event) -> Result<()>;
}

impl Dispatch for Core {
    fn handle_event(&mut self, id: ViewId, event: &mut Event) -> Result<()> {
        if event.is_nothing() {
            return Ok(());
        }
        let node = self.node_ref(id)?;
        let is_group = node.is_group();
        trace!(view = ?id, name = node.name(), class = ?event.class(), "handle_event");

        if matches!(event.kind(), EventKind::Broadcast(_) | EventKind::User(..)) {
            let original = *event;
            if is_group {
                broadcast(self, id, event)?;
            }
            let mut copy = original;
            kind_step(self, id, &mut copy)?;
            if copy.is_nothing() && !event.is_nothing() {
                event.clear();
                if let Some(by) = copy.consumer() {
                    event.set_consumer(by);
                }
            }
            return Ok(());
        }

        base_step(self, id, event)?;
        if is_group && !event.is_nothing() {
            match event.kind() {
                EventKind::Mouse(m) => {
                    let at = m.location;
                    let hit = self.children(id)?.iter().copied().find(|c| {
                        self.node(*c).is_some_and(|n| n.state.contains(State::VISIBLE))
                            && self.mouse_in_view(*c, at)
                    });
                    if let Some(child) = hit {
                        deliver(self, id, child, event)?;
                    }
                }
                _ => phases(self, id, event)?,
            }
        }
        if !event.is_nothing() {
            kind_step(self, id, event)?;
        }
        Ok(())
    }

    fn message(&mut self, receiver: ViewId, event: Event) -> Result<Option<ViewId>> {
        let mut event = event;
        self.handle_event(receiver, &mut event)?;
        Ok(if event.is_nothing() {
            event.consumer()
        } else {
            None
        })
    }

    fn event_error(&mut self, id: ViewId, event: &Event) -> Result<()> {
        let mut cur = Some(id);
        while let Some(v) = cur {
            if self.notify(v, Note::EventError(*event))? {
                trace!(view = ?v, "event_error claimed");
                return Ok(());
            }
            cur = self.node(v).and_then(|n| n.owner());
        }
        debug!(class = ?event.class(), "unhandled event");
        Ok(())
    }
}

/// Kernel handling every view gets: a primary press on a selectable,
/// unselected view focuses it, and is consumed unless the view wants the
/// first click.
fn base_step(core: &mut Core, id: ViewId, event: &mut Event) -> Result<()> {
    let Some(m) = event.as_mouse() else {
        return Ok(());
    };
    if !m.is_primary_down() {
        return Ok(());
    }
    let node = core.node_ref(id)?;
    if node.state.intersects(State::SELECTED | State::DISABLED)
        || !node.options.contains(Options::SELECTABLE)
    {
        return Ok(());
    }
    let first_click = node.options.contains(Options::FIRST_CLICK);
    if !core.focus(id)? || !first_click {
        event.clear();
        event.set_consumer(id);
    }
    Ok(())
}

/// Run the kind's handler, recording the view if it consumes the event.
fn kind_step(core: &mut Core, id: ViewId, event: &mut Event) -> Result<()> {
    core.call_kind(id, Ok(()), |kind, ctx| kind.handle_event(ctx, event))??;
    if event.is_nothing() && event.consumer().is_none() {
        event.set_consumer(id);
    }
    Ok(())
}

/// Hand an event to one child if the child accepts its class.
fn deliver(core: &mut Core, group: ViewId, child: ViewId, event: &mut Event) -> Result<()> {
    if event.is_nothing() || !core.is_child(group, child) {
        return Ok(());
    }
    let node = core.node_ref(child)?;
    let class = event.class();
    if node.state.contains(State::DISABLED)
        && class.intersects(EventClass::POSITIONAL | EventClass::FOCUSED)
    {
        return Ok(());
    }
    if !node.event_mask.intersects(class) {
        return Ok(());
    }
    core.handle_event(child, event)
}

/// Focused delivery: pre-process children, the current child, then
/// post-process children, stopping at the first consumer.
fn phases(core: &mut Core, group: ViewId, event: &mut Event) -> Result<()> {
    let mut core = guard(core, |core| set_phase(core, group, Phase::Focused));
    let kids: Vec<_> = core.children(group)?.iter().copied().collect();

    set_phase(&mut core, group, Phase::PreProcess);
    for c in &kids {
        if event.is_nothing() {
            return Ok(());
        }
        if has_option(&core, *c, Options::PRE_PROCESS) {
            deliver(&mut core, group, *c, event)?;
        }
    }

    set_phase(&mut core, group, Phase::Focused);
    if let Some(current) = core.node_ref(group)?.current() {
        deliver(&mut core, group, current, event)?;
    }

    set_phase(&mut core, group, Phase::PostProcess);
    for c in &kids {
        if event.is_nothing() {
            return Ok(());
        }
        if has_option(&core, *c, Options::POST_PROCESS) {
            deliver(&mut core, group, *c, event)?;
        }
    }
    Ok(())
}

/// Offer a copy of the event to every child. The first child to consume
/// its copy is recorded on the original, which is then cleared.
fn broadcast(core: &mut Core, group: ViewId, event: &mut Event) -> Result<()> {
    let original = *event;
    let mut answered = None;
    let kids: Vec<_> = core.children(group)?.iter().copied().collect();
    for c in kids {
        let mut copy = original;
        deliver(core, group, c, &mut copy)?;
        if copy.is_nothing() && answered.is_none() {
            answered = Some(copy.consumer().unwrap_or(c));
        }
    }
    if let Some(by) = answered {
        event.clear();
        event.set_consumer(by);
    }
    Ok(())
}

/// Set a group's dispatch phase.
fn set_phase(core: &mut Core, group: ViewId, phase: Phase) {
    if let Ok(g) = core.group_mut(group) {
        g.phase = phase;
    }
}

/// Does the view have the option set?
fn has_option(core: &Core, id: ViewId, option: Options) -> bool {
    core.node(id).is_some_and(|n| n.options.contains(option))
}
