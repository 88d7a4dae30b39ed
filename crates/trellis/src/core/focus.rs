use tracing::debug;

use crate::{
    commands,
    core::{draw::Drawing, id::ViewId, modal::Modal, state::StateManager, world::Core},
    error::{Error, Result},
    flags::{Options, State},
};

/// Selection and focus along the chain of current children.
pub trait FocusManager {
    /// Make `view` the current child of `group`, or clear the current child.
    ///
    /// The outgoing child loses `FOCUSED` and `SELECTED`, the incoming one
    /// gains `SELECTED` and, if the group is focused, `FOCUSED`.
    fn set_current(&mut self, group: ViewId, view: Option<ViewId>) -> Result<()>;

    /// Keep the current child if it is visible and selectable or modal,
    /// otherwise promote the frontmost visible selectable child.
    fn reset_current(&mut self, group: ViewId) -> Result<()>;

    /// Make a selectable view its owner's current child, moving it to the
    /// front first when it has `TOP_SELECT`.
    fn select(&mut self, view: ViewId) -> Result<()>;

    /// Move focus to `view`, focusing each owner first. A current sibling
    /// with `VALIDATE` may refuse to give up focus. Returns whether focus
    /// arrived.
    fn focus(&mut self, view: ViewId) -> Result<bool>;

    /// The next visible, enabled, selectable sibling of the current child
    /// in Z-order, wrapping around.
    fn find_next(&self, group: ViewId, forwards: bool) -> Result<Option<ViewId>>;

    /// Select the next candidate after the current child.
    fn select_next(&mut self, group: ViewId, forwards: bool) -> Result<()>;

    /// Focus the next candidate after the current child. Returns whether
    /// focus arrived.
    fn focus_next(&mut self, group: ViewId, forwards: bool) -> Result<bool>;

    /// Views with `FOCUSED`, from the root down along current children.
    fn focus_chain(&self) -> Vec<ViewId>;

    /// The deepest focused view.
    fn focused(&self) -> Option<ViewId>;
}

impl FocusManager for Core {
    fn set_current(&mut self, group: ViewId, view: Option<ViewId>) -> Result<()> {
        let old = self.group_ref(group)?.current;
        if old == view {
            return Ok(());
        }
        if let Some(v) = view
            && !self.is_child(group, v)
        {
            return Err(Error::NotAChild { group, view: v });
        }
        debug!(group = ?group, from = ?old, to = ?view, "set_current");
        let focused = self.get_state(group, State::FOCUSED);
        self.locked(group, |core| {
            if let Some(o) = old.filter(|o| core.contains(*o)) {
                if focused {
                    core.set_state(o, State::FOCUSED, false)?;
                }
                core.set_state(o, State::SELECTED, false)?;
            }
            core.group_mut(group)?.current = view;
            if let Some(v) = view {
                core.set_state(v, State::SELECTED, true)?;
                if focused {
                    core.set_state(v, State::FOCUSED, true)?;
                }
            }
            Ok(())
        })
    }

    fn reset_current(&mut self, group: ViewId) -> Result<()> {
        let keep = self.group_ref(group)?.current.is_some_and(|c| {
            self.node(c).is_some_and(|n| {
                n.state.contains(State::MODAL)
                    || (n.state.contains(State::VISIBLE)
                        && n.options.contains(Options::SELECTABLE))
            })
        });
        if keep {
            return Ok(());
        }
        let next = self.first_match(group, State::VISIBLE, Options::SELECTABLE)?;
        self.set_current(group, next)
    }

    fn select(&mut self, view: ViewId) -> Result<()> {
        let node = self.node_ref(view)?;
        if !node.options.contains(Options::SELECTABLE) {
            return Ok(());
        }
        let top = node.options.contains(Options::TOP_SELECT);
        let Some(owner) = node.owner else {
            return Ok(());
        };
        if top {
            self.make_first(view)?;
        }
        self.set_current(owner, Some(view))
    }

    fn focus(&mut self, view: ViewId) -> Result<bool> {
        let node = self.node_ref(view)?;
        if node.state.intersects(State::SELECTED | State::MODAL) {
            return Ok(true);
        }
        let Some(owner) = node.owner else {
            return Ok(true);
        };
        if !self.focus(owner)? {
            return Ok(false);
        }
        if let Some(current) = self.node_ref(owner)?.current()
            && self.node_ref(current)?.options.contains(Options::VALIDATE)
            && !self.valid(current, commands::RELEASED_FOCUS)?
        {
            debug!(view = ?current, "focus release refused");
            return Ok(false);
        }
        self.select(view)?;
        Ok(true)
    }

    fn find_next(&self, group: ViewId, forwards: bool) -> Result<Option<ViewId>> {
        let kids = self.children(group)?;
        if kids.is_empty() {
            return Ok(None);
        }
        let n = kids.len();
        let start = self
            .group_ref(group)?
            .current
            .and_then(|c| kids.iter().position(|k| *k == c));
        let candidate = |id: &ViewId| {
            self.node(*id).is_some_and(|node| {
                node.state & (State::VISIBLE | State::DISABLED) == State::VISIBLE
                    && node.options.contains(Options::SELECTABLE)
            })
        };
        let order: Vec<usize> = match start {
            Some(s) if forwards => (1..n).map(|i| (s + i) % n).collect(),
            Some(s) => (1..n).map(|i| (s + n - i) % n).collect(),
            None if forwards => (0..n).collect(),
            None => (0..n).rev().collect(),
        };
        Ok(order.into_iter().map(|i| kids[i]).find(candidate))
    }

    fn select_next(&mut self, group: ViewId, forwards: bool) -> Result<()> {
        match self.find_next(group, forwards)? {
            Some(v) => self.select(v),
            None => Ok(()),
        }
    }

    fn focus_next(&mut self, group: ViewId, forwards: bool) -> Result<bool> {
        match self.find_next(group, forwards)? {
            Some(v) => self.focus(v),
            None => Ok(true),
        }
    }

    fn focus_chain(&self) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut cur = Some(self.root);
        while let Some(v) = cur {
            let Some(node) = self.node(v) else { break };
            if !node.state.contains(State::FOCUSED) {
                break;
            }
            out.push(v);
            cur = node.current();
        }
        out
    }

    fn focused(&self) -> Option<ViewId> {
        self.focus_chain().last().copied()
    }
}
