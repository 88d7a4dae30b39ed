//! Rendering and screen output.
//!
//! Views render into offscreen canvases through `ViewKind::draw`. Only the
//! part of a view that no front sibling covers, at every level up to the
//! root, is written to the screen.

use tracing::trace;

use crate::{
    backend::CursorState,
    canvas::Canvas,
    core::{bounds::Placement, focus::FocusManager, id::ViewId, view::DrawContext, world::Core},
    error::{Error, Result},
    flags::{Options, State},
    geom::{Expanse, Point, Rect, Region},
    palette::Attr,
};

/// Drawing, exposure and color resolution.
pub trait Drawing {
    /// Resolve a color index through the palettes of the view and each of
    /// its owners. Any failed step yields `Attr::ERROR`.
    fn get_color(&self, id: ViewId, index: u8) -> Attr;

    /// Is any part of the view visible on screen?
    fn exposed(&self, id: ViewId) -> bool;

    /// The screen cells where the view would show, in screen coordinates.
    fn visible_region(&self, id: ViewId) -> Region;

    /// Render the view and write its visible part to the screen.
    ///
    /// Inside a locked group the request is recorded on the outermost locked
    /// group and flushed by its final `unlock`.
    fn draw_view(&mut self, id: ViewId) -> Result<()>;

    /// Drop cached renders of the view and draw it.
    fn redraw(&mut self, id: ViewId) -> Result<()>;

    /// Redraw the part of a group within `area`, in group-local coordinates.
    fn redraw_rect(&mut self, group: ViewId, area: Rect) -> Result<()>;

    /// Defer drawing in a group until the matching `unlock`.
    fn lock(&mut self, group: ViewId) -> Result<()>;

    /// Undo one `lock`. The last one flushes any deferred draw.
    fn unlock(&mut self, group: ViewId) -> Result<()>;

    /// Run `f` with the group locked.
    fn locked<R>(&mut self, group: ViewId, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R>;

    /// Render a view offscreen, including its children.
    fn render(&self, id: ViewId) -> Result<Canvas>;

    /// Recompute the cursor from the focus chain and report changes.
    fn reset_cursor(&mut self) -> Result<()>;
}

impl Drawing for Core {
    fn get_color(&self, id: ViewId, index: u8) -> Attr {
        if index == 0 {
            return Attr::ERROR;
        }
        let mut color = index;
        let mut cur = Some(id);
        while let Some(v) = cur {
            let Some(node) = self.node(v) else {
                return Attr::ERROR;
            };
            let Some(palette) = node.palette() else {
                trace!(view = ?v, index, "no palette");
                return Attr::ERROR;
            };
            match palette.map(color) {
                Some(c) if c != 0 => color = c,
                _ => {
                    trace!(view = ?v, color, "color index out of range");
                    return Attr::ERROR;
                }
            }
            cur = node.owner();
        }
        Attr(color)
    }

    fn exposed(&self, id: ViewId) -> bool {
        self.node(id)
            .is_some_and(|n| n.state.contains(State::EXPOSED | State::VISIBLE))
            && !self.visible_region(id).is_empty()
    }

    fn visible_region(&self, id: ViewId) -> Region {
        let Ok(bounds) = self.global_bounds(id) else {
            return Region::new();
        };
        let mut region = Region::from_rect(bounds);
        let mut cur = id;
        loop {
            let Some(node) = self.node(cur) else {
                return Region::new();
            };
            if !node.state.contains(State::VISIBLE) {
                return Region::new();
            }
            let Some(owner) = node.owner() else {
                break;
            };
            if let Ok(ob) = self.global_bounds(owner) {
                region.intersect(&ob);
            }
            for sib in self.children(owner).into_iter().flatten() {
                if *sib == cur {
                    break;
                }
                if self.node(*sib).is_some_and(|n| n.state.contains(State::VISIBLE))
                    && let Ok(r) = self.global_bounds(*sib)
                {
                    region.subtract(&r);
                }
            }
            if region.is_empty() {
                return region;
            }
            cur = owner;
        }
        if cur != self.root() {
            return Region::new();
        }
        region
    }

    fn draw_view(&mut self, id: ViewId) -> Result<()> {
        if !self.contains(id) {
            return Ok(());
        }
        invalidate_owners(self, id);
        if let Some(g) = outermost_locked(self, id) {
            self.group_mut(g)?.pending_draw = true;
            return Ok(());
        }
        flush_area(self, id, None)
    }

    fn redraw(&mut self, id: ViewId) -> Result<()> {
        if let Some(g) = self.node_mut(id)?.group.as_mut() {
            g.buffer = None;
        }
        self.draw_view(id)
    }

    fn redraw_rect(&mut self, group: ViewId, area: Rect) -> Result<()> {
        if let Some(g) = outermost_locked(self, group) {
            invalidate_owners(self, group);
            self.group_mut(g)?.pending_draw = true;
            return Ok(());
        }
        let Some(area) = area.intersect(&self.node_ref(group)?.extent()) else {
            return Ok(());
        };
        self.group_mut(group)?.buffer = None;
        invalidate_owners(self, group);
        flush_area(self, group, Some(area))
    }

    fn lock(&mut self, group: ViewId) -> Result<()> {
        let g = self.group_mut(group)?;
        g.lock_flag += 1;
        Ok(())
    }

    fn unlock(&mut self, group: ViewId) -> Result<()> {
        let g = self.group_mut(group)?;
        if g.lock_flag == 0 {
            return Err(Error::UnbalancedUnlock(group));
        }
        g.lock_flag -= 1;
        if g.lock_flag == 0 && std::mem::take(&mut g.pending_draw) {
            self.draw_view(group)?;
        }
        Ok(())
    }

    fn locked<R>(&mut self, group: ViewId, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.lock(group)?;
        let out = f(self);
        let unlocked = self.unlock(group);
        let v = out?;
        unlocked?;
        Ok(v)
    }

    fn render(&self, id: ViewId) -> Result<Canvas> {
        render_view(self, id, self.node_ref(id)?.extent(), &mut Pass::default())
    }

    fn reset_cursor(&mut self) -> Result<()> {
        let next = self.focused().and_then(|leaf| {
            let node = self.node(leaf)?;
            if node.is_group() || !node.state.contains(State::CURSOR_VIS) {
                return None;
            }
            if !node.extent().contains_point(node.cursor()) {
                return None;
            }
            let position = self.make_global(leaf, node.cursor());
            if !self.visible_region(leaf).contains_point(position) {
                return None;
            }
            Some(CursorState {
                position,
                block: node.state.contains(State::CURSOR_BLOCK),
            })
        });
        if next != self.cursor {
            self.cursor = next;
            self.screen.set_cursor(next)?;
        }
        Ok(())
    }
}

/// Draw requests for views whose kind was checked out when they were made.
/// Views whose kind is still out stay queued.
pub(crate) fn flush_deferred(core: &mut Core) -> Result<()> {
    if core.deferred.is_empty() {
        return Ok(());
    }
    let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut core.deferred)
        .into_iter()
        .filter(|v| core.contains(*v))
        .partition(|v| core.node(*v).is_some_and(|n| n.kind.is_some()));
    core.deferred = waiting;
    for id in ready {
        core.draw_view(id)?;
    }
    Ok(())
}

/// The outermost locked group among `id` and its owners.
fn outermost_locked(core: &Core, id: ViewId) -> Option<ViewId> {
    let mut found = None;
    let mut cur = Some(id);
    while let Some(v) = cur {
        let node = core.node(v)?;
        if node.lock_count() > 0 {
            found = Some(v);
        }
        cur = node.owner();
    }
    found
}

/// Drop the cached renders of every owner of `id`.
fn invalidate_owners(core: &mut Core, id: ViewId) {
    let mut cur = core.node(id).and_then(|n| n.owner());
    while let Some(v) = cur {
        let Some(node) = core.nodes.get_mut(v) else {
            break;
        };
        if let Some(g) = node.group.as_mut() {
            g.buffer = None;
        }
        cur = node.owner;
    }
}

/// What a render collects besides its canvas.
#[derive(Default)]
struct Pass {
    /// Full renders of buffered groups.
    caches: Vec<(ViewId, Canvas)>,
    /// Fresh output of each kind that drew.
    snapshots: Vec<(ViewId, Canvas)>,
    /// Views painted from their snapshot because the kind was checked out.
    busy: Vec<ViewId>,
}

/// Render `id`, or the local `area` of it, and write the visible cells.
///
/// Only the bounding box of the visible region is rendered. A view whose
/// kind is checked out is painted from its snapshot and queued for a
/// proper draw once the kind is back.
fn flush_area(core: &mut Core, id: ViewId, area: Option<Rect>) -> Result<()> {
    if !core.exposed(id) {
        return Ok(());
    }
    let origin = core.make_global(id, Point::zero());
    let mut region = core.visible_region(id);
    if let Some(a) = area {
        region.intersect(&a.translate(origin));
    }
    if region.is_empty() {
        return Ok(());
    }
    let clip = region
        .rects()
        .iter()
        .fold(Rect::zero(), |acc, r| acc.union(r))
        .translate(-origin);

    let mut pass = Pass::default();
    let canvas = render_view(core, id, clip, &mut pass)?;
    for (g, c) in pass.caches {
        if let Some(group) = core.nodes.get_mut(g).and_then(|n| n.group.as_mut()) {
            group.buffer = Some(c);
        }
    }
    for (v, c) in pass.snapshots {
        if let Some(node) = core.nodes.get_mut(v) {
            node.snapshot = Some(merge_snapshot(node.snapshot.take(), c));
        }
    }
    for v in pass.busy {
        trace!(view = ?id, busy = ?v, "painted from snapshot");
        if !core.deferred.contains(&v) {
            core.deferred.push(v);
        }
    }

    for r in region.rects() {
        let cells = canvas.extract(r.translate(-origin));
        core.screen.write_buf(r.tl.x, r.tl.y, r.w, r.h, &cells)?;
    }
    core.screen.flush()?;
    core.reset_cursor()
}

/// Paint the `clip` part of a view offscreen, in view-local coordinates.
/// Groups paint their background, then visible children back to front
/// with their shadows. Full renders of buffered groups are collected into
/// the pass.
fn render_view(core: &Core, id: ViewId, clip: Rect, pass: &mut Pass) -> Result<Canvas> {
    let node = core.node_ref(id)?;
    let buffered = node.options.contains(Options::BUFFERED);
    if buffered && let Some(buf) = node.group.as_ref().and_then(|g| g.buffer.as_ref()) {
        if buf.area() == clip {
            return Ok(buf.clone());
        }
        let mut canvas = Canvas::window(clip);
        canvas.blit(buf, Point::zero(), clip);
        return Ok(canvas);
    }

    let mut canvas = Canvas::window(clip);
    match node.kind.as_deref() {
        Some(kind) => {
            kind.draw(&mut canvas, &DrawContext::new(core, id));
            pass.snapshots.push((id, canvas.clone()));
        }
        None => {
            if let Some(snap) = &node.snapshot {
                canvas.blit(snap, Point::zero(), clip);
            }
            pass.busy.push(id);
        }
    }
    let Some(group) = node.group.as_ref() else {
        return Ok(canvas);
    };

    let shadow = core.config().shadow_size;
    for child in group.children.iter().rev() {
        let Some(c) = core.node(*child) else {
            continue;
        };
        if !c.state.contains(State::VISIBLE) {
            continue;
        }
        let b = c.bounds();
        let casts = c.state.contains(State::SHADOW);
        let reach = if casts {
            Rect::new(b.tl.x, b.tl.y, b.w.saturating_add(shadow.w), b.h.saturating_add(shadow.h))
        } else {
            b
        };
        if !reach.overlaps(&clip) {
            continue;
        }
        if let Some(part) = b.intersect(&clip) {
            let sub = render_view(core, *child, part.translate(-b.tl), pass)?;
            canvas.blit(&sub, b.tl, clip);
        }
        if casts {
            paint_shadow(&mut canvas, b, shadow, clip);
        }
    }
    if buffered && clip == node.extent() {
        pass.caches.push((id, canvas.clone()));
    }
    Ok(canvas)
}

/// Fold a fresh render of a view's own drawing into its kept snapshot.
/// Disjoint parts far apart replace the snapshot instead of growing it.
fn merge_snapshot(old: Option<Canvas>, fresh: Canvas) -> Canvas {
    let Some(mut old) = old else {
        return fresh;
    };
    let (a, f) = (old.area(), fresh.area());
    if f.contains_rect(&a) {
        return fresh;
    }
    if a.contains_rect(&f) {
        old.blit(&fresh, Point::zero(), f);
        return old;
    }
    let u = a.union(&f);
    if u.size().area() > a.size().area().saturating_add(f.size().area()).saturating_mul(2) {
        return fresh;
    }
    let mut merged = Canvas::window(u);
    merged.blit(&old, Point::zero(), a);
    merged.blit(&fresh, Point::zero(), f);
    merged
}

/// Darken the right and bottom bands a view's shadow covers.
fn paint_shadow(canvas: &mut Canvas, b: Rect, size: Expanse, clip: Rect) {
    let sw = i32::try_from(size.w).unwrap_or(i32::MAX);
    let sh = i32::try_from(size.h).unwrap_or(i32::MAX);
    let right = Rect::new(b.right(), b.tl.y.saturating_add(sh), size.w, b.h);
    let bottom = Rect::new(
        b.tl.x.saturating_add(sw),
        b.bottom(),
        b.w.saturating_sub(size.w),
        size.h,
    );
    for band in [right, bottom] {
        if let Some(r) = band.intersect(&clip) {
            canvas.tint(r, Attr::SHADOW);
        }
    }
}
