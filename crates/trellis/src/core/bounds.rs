use tracing::trace;

use crate::{
    core::{draw::Drawing, id::ViewId, world::Core},
    error::Result,
    flags::{GrowMode, State},
    geom::{Expanse, Point, Rect},
};

/// Geometry of views relative to their owners and the screen.
pub trait Placement {
    /// Replace the owner-relative bounds without drawing.
    fn set_bounds(&mut self, id: ViewId, bounds: Rect) -> Result<()>;

    /// Replace the bounds and redraw. Groups re-lay their children by grow
    /// mode when the size changes.
    fn change_bounds(&mut self, id: ViewId, bounds: Rect) -> Result<()>;

    /// New bounds for a view after its owner grew by `delta`.
    fn calc_bounds(&self, id: ViewId, delta: Point) -> Result<Rect>;

    /// Minimum and maximum size of a view.
    fn size_limits(&self, id: ViewId) -> Result<(Expanse, Expanse)>;

    /// Move and resize within size limits, repainting the uncovered area.
    fn locate(&mut self, id: ViewId, bounds: Rect) -> Result<()>;

    /// Move keeping size.
    fn move_to(&mut self, id: ViewId, x: i32, y: i32) -> Result<()>;

    /// Resize keeping origin.
    fn grow_to(&mut self, id: ViewId, w: u32, h: u32) -> Result<()>;

    /// Convert a view-local point to screen coordinates.
    fn make_global(&self, id: ViewId, p: Point) -> Point;

    /// Convert a screen point to view-local coordinates.
    fn make_local(&self, id: ViewId, p: Point) -> Point;

    /// View bounds in screen coordinates.
    fn global_bounds(&self, id: ViewId) -> Result<Rect>;

    /// Is the screen point inside the view?
    fn mouse_in_view(&self, id: ViewId, p: Point) -> bool;
}

impl Placement for Core {
    fn set_bounds(&mut self, id: ViewId, bounds: Rect) -> Result<()> {
        let node = self.node_mut(id)?;
        node.bounds = bounds;
        let owner = node.owner;
        if let Some(g) = node.group.as_mut() {
            g.buffer = None;
        }
        if let Some(owner) = owner {
            self.group_mut(owner)?.buffer = None;
        }
        Ok(())
    }

    fn change_bounds(&mut self, id: ViewId, bounds: Rect) -> Result<()> {
        let node = self.node_ref(id)?;
        let old = node.size();
        if !node.is_group() {
            self.set_bounds(id, bounds)?;
            return self.draw_view(id);
        }
        let delta = bounds.size().delta(old);
        self.set_bounds(id, bounds)?;
        if delta.is_zero() {
            return self.draw_view(id);
        }
        trace!(view = ?id, ?delta, "re-lay children");
        self.locked(id, |core| {
            core.for_each(id, |core, child| {
                let r = core.calc_bounds(child, delta)?;
                core.change_bounds(child, r)
            })?;
            core.draw_view(id)
        })
    }

    fn calc_bounds(&self, id: ViewId, delta: Point) -> Result<Rect> {
        let node = self.node_ref(id)?;
        let mode = node.grow_mode;
        let osize = match node.owner {
            Some(o) => self.node_ref(o)?.size(),
            None => node.size(),
        };
        let b = node.bounds;
        let (mut ax, mut bx) = (i64::from(b.tl.x), i64::from(b.right()));
        let (mut ay, mut by) = (i64::from(b.tl.y), i64::from(b.bottom()));
        let rel = mode.contains(GrowMode::REL);

        let (s, d) = (i64::from(osize.w), i64::from(delta.x));
        if mode.contains(GrowMode::LO_X) {
            ax = grow(ax, s, d, rel);
        }
        if mode.contains(GrowMode::HI_X) {
            bx = grow(bx, s, d, rel);
        }
        let (s, d) = (i64::from(osize.h), i64::from(delta.y));
        if mode.contains(GrowMode::LO_Y) {
            ay = grow(ay, s, d, rel);
        }
        if mode.contains(GrowMode::HI_Y) {
            by = grow(by, s, d, rel);
        }

        let (min, max) = self.size_limits(id)?;
        let w = clamp(bx - ax, min.w, max.w);
        let h = clamp(by - ay, min.h, max.h);
        Ok(Rect::new(to_i32(ax), to_i32(ay), w, h))
    }

    fn size_limits(&self, id: ViewId) -> Result<(Expanse, Expanse)> {
        let node = self.node_ref(id)?;
        let osize = match node.owner {
            Some(o) => self.node_ref(o)?.size(),
            None => Expanse::new(u32::MAX, u32::MAX),
        };
        Ok(node
            .kind
            .as_deref()
            .map_or((Expanse::new(0, 0), osize), |k| k.size_limits(osize)))
    }

    fn locate(&mut self, id: ViewId, bounds: Rect) -> Result<()> {
        let (min, max) = self.size_limits(id)?;
        let mut r = bounds;
        r.w = clamp(i64::from(r.w), min.w, max.w);
        r.h = clamp(i64::from(r.h), min.h, max.h);
        let node = self.node_ref(id)?;
        let old = node.bounds;
        if r == old {
            return Ok(());
        }
        let owner = node.owner;
        let shadow = node.state.contains(State::SHADOW);
        let visible = node.state.contains(State::VISIBLE);
        self.change_bounds(id, r)?;
        if let Some(owner) = owner
            && visible
        {
            let mut area = old;
            if shadow {
                area = area.union(&r);
                let sh = self.config().shadow_size;
                area.w = area.w.saturating_add(sh.w);
                area.h = area.h.saturating_add(sh.h);
            }
            self.redraw_rect(owner, area)?;
        }
        Ok(())
    }

    fn move_to(&mut self, id: ViewId, x: i32, y: i32) -> Result<()> {
        let b = self.node_ref(id)?.bounds;
        self.locate(id, Rect::new(x, y, b.w, b.h))
    }

    fn grow_to(&mut self, id: ViewId, w: u32, h: u32) -> Result<()> {
        let b = self.node_ref(id)?.bounds;
        self.locate(id, Rect::new(b.tl.x, b.tl.y, w, h))
    }

    fn make_global(&self, id: ViewId, p: Point) -> Point {
        let mut out = p;
        let mut cur = self.node(id);
        while let Some(node) = cur {
            out = out + node.origin();
            cur = node.owner.and_then(|o| self.node(o));
        }
        out
    }

    fn make_local(&self, id: ViewId, p: Point) -> Point {
        p - self.make_global(id, Point::zero())
    }

    fn global_bounds(&self, id: ViewId) -> Result<Rect> {
        let size = self.node_ref(id)?.size();
        let tl = self.make_global(id, Point::zero());
        Ok(Rect::new(tl.x, tl.y, size.w, size.h))
    }

    fn mouse_in_view(&self, id: ViewId, p: Point) -> bool {
        self.global_bounds(id).is_ok_and(|r| r.contains_point(p))
    }
}

/// Move one edge coordinate after the owner's extent on that axis grew by
/// `d` to `s`. Relative mode scales, others shift.
fn grow(i: i64, s: i64, d: i64, rel: bool) -> i64 {
    let old = s - d;
    if rel && old > 0 {
        (i * s + (old >> 1)) / old
    } else {
        i + d
    }
}

/// Clamp a signed length into `[min, max]`, never below zero.
fn clamp(len: i64, min: u32, max: u32) -> u32 {
    let len = u32::try_from(len.max(0)).unwrap_or(u32::MAX);
    len.min(max).max(min)
}

/// Saturating conversion back to screen coordinates.
fn to_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}
