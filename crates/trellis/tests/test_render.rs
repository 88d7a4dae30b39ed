//! Integration tests for clipping, exposure, palettes and screen output.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis::{
        backend::CursorState,
        error::Result,
        prelude::*,
        testing::harness::Harness,
    };

    /// Fills itself with the last character it was sent and redraws.
    #[derive(Debug)]
    struct Stamp {
        ch: char,
    }

    impl ViewKind for Stamp {
        fn options(&self) -> Options {
            Options::SELECTABLE
        }

        fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
            canvas.fill(canvas.area(), Cell::new(self.ch, ctx.color(1)));
        }

        fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
            if let Some(c) = event.as_key().and_then(|k| k.char()) {
                self.ch = c;
                ctx.draw()?;
                event.clear();
            }
            Ok(())
        }
    }

    fn row(h: &Harness, y: i32) -> String {
        h.capture().row_text(y).trim_end().to_string()
    }

    #[test]
    fn views_paint_in_z_order() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        h.leaf(root, Rect::new(0, 0, 5, 2), h.probe("a").fill('a'))?;
        let b = h.leaf(root, Rect::new(3, 1, 5, 2), h.probe("b").fill('b'))?;

        assert_eq!(row(&h, 0), "aaaaa");
        assert_eq!(row(&h, 1), "aaabbbbb");
        assert_eq!(row(&h, 2), "   bbbbb");
        assert_eq!(
            h.capture().cell(0, 0),
            Some(Cell::new('a', Attr(0x71)))
        );

        h.core.hide(b)?;
        assert_eq!(row(&h, 1), "aaaaa");
        assert_eq!(row(&h, 2), "");
        Ok(())
    }

    #[test]
    fn occluded_cells_are_never_written() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let a = h.leaf(root, Rect::new(0, 0, 5, 2), h.probe("a").fill('a'))?;
        h.leaf(root, Rect::new(3, 1, 5, 2), h.probe("b").fill('b'))?;
        h.capture().clear_log();

        h.core.draw_view(a)?;
        let touched = h.capture().touched();
        assert_eq!(touched.len(), 8);
        assert!(!touched.contains(&Point::new(3, 1)));
        assert!(!touched.contains(&Point::new(4, 1)));
        assert_eq!(row(&h, 1), "aaabbbbb");

        assert_eq!(h.core.visible_region(a).area(), 8);
        Ok(())
    }

    #[test]
    fn children_are_clipped_to_owner() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let g = h.group(root, Rect::new(2, 1, 4, 2), PlainGroup::new())?;
        h.leaf(g, Rect::new(-1, 0, 10, 5), h.probe("wide").fill('w'))?;

        assert_eq!(row(&h, 0), "");
        assert_eq!(row(&h, 1), "  wwww");
        assert_eq!(row(&h, 2), "  wwww");
        assert_eq!(row(&h, 3), "");
        Ok(())
    }

    #[test]
    fn huge_views_render_only_what_shows() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let big = h.leaf(root, Rect::new(-100, -100, 70_000, 70_000), h.probe("big").fill('x'))?;
        assert_eq!(h.capture().row_text(0), "x".repeat(20));
        assert_eq!(h.capture().row_text(4), "x".repeat(20));

        h.core.redraw_rect(root, Rect::new(5, 1, 3, 2))?;
        assert_eq!(h.capture().row_text(2), "x".repeat(20));
        assert!(h.core.node(big).is_some_and(|n| n.bounds().size().area() == 4_900_000_000));
        Ok(())
    }

    #[test]
    fn exposure() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let a = h.leaf(root, Rect::new(0, 0, 5, 2), PlainView::new())?;
        assert!(h.core.get_state(a, State::EXPOSED));
        assert!(h.core.exposed(a));

        let cover = h.leaf(root, Rect::new(0, 0, 10, 5), PlainView::new())?;
        assert!(h.core.get_state(a, State::EXPOSED));
        assert!(!h.core.exposed(a));
        h.core.hide(cover)?;
        assert!(h.core.exposed(a));

        h.core.hide(a)?;
        assert!(!h.core.get_state(a, State::EXPOSED));
        assert!(!h.core.exposed(a));

        let g = h.core.add_group(Rect::new(0, 0, 10, 5), PlainGroup::new());
        let inner = h.core.add(Rect::new(0, 0, 2, 2), PlainView::new());
        h.core.insert(g, inner)?;
        assert!(!h.core.get_state(inner, State::EXPOSED));
        h.core.insert(root, g)?;
        assert!(h.core.get_state(inner, State::EXPOSED));
        assert!(h.core.exposed(inner));
        h.core.remove(root, g)?;
        assert!(!h.core.get_state(inner, State::EXPOSED));
        Ok(())
    }

    #[test]
    fn unexposed_views_are_not_drawn() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let g = h.core.add_group(Rect::new(0, 0, 10, 5), PlainGroup::new());
        h.capture().clear_log();
        let probe = h.probe("x").fill('x');
        let inner = h.core.add(Rect::new(0, 0, 2, 2), probe);
        h.core.insert(g, inner)?;
        h.core.draw_view(inner)?;
        assert_eq!(h.capture().write_count(), 0);
        Ok(())
    }

    #[test]
    fn lock_coalesces_draws() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 10, 3), PlainGroup::new())?;
        let a = h.leaf(g, Rect::new(0, 0, 3, 1), h.probe("a").fill('a'))?;
        h.capture().clear_log();

        h.core.lock(g)?;
        h.core.lock(g)?;
        for _ in 0..3 {
            h.core.draw_view(a)?;
        }
        h.leaf(g, Rect::new(0, 1, 3, 1), h.probe("b").fill('b'))?;
        h.core.unlock(g)?;
        assert_eq!(h.capture().write_count(), 0);
        assert_eq!(h.core.node(g).map(|n| n.lock_count()), Some(1));
        h.core.unlock(g)?;
        assert_eq!(h.capture().write_count(), 1);
        assert_eq!(row(&h, 1), "bbb");
        Ok(())
    }

    #[test]
    fn inner_lock_defers_to_outer() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 10, 3), PlainGroup::new())?;
        let a = h.leaf(g, Rect::new(0, 0, 3, 1), h.probe("a").fill('a'))?;
        h.capture().clear_log();

        h.core.locked(root, |core| {
            core.locked(g, |core| core.draw_view(a))?;
            core.draw_view(a)
        })?;
        assert_eq!(h.capture().write_count(), 1);
        assert_eq!(h.core.node(root).map(|n| n.lock_count()), Some(0));
        Ok(())
    }

    #[test]
    fn buffered_group_caches_until_a_child_draws() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let g = h.group(
            root,
            Rect::new(0, 0, 10, 3),
            PlainGroup::new().with_options(Options::BUFFERED),
        )?;
        let a = h.leaf(g, Rect::new(0, 0, 3, 1), h.probe("a").fill('a'))?;

        h.core.redraw(g)?;
        assert!(h.core.node(g).is_some_and(|n| n.has_buffer()));
        let cached = h.core.render(g)?;
        assert_eq!(cached.row_text(0).trim_end(), "aaa");

        h.core.draw_view(a)?;
        assert!(!h.core.node(g).is_some_and(|n| n.has_buffer()));
        h.core.draw_view(g)?;
        assert!(h.core.node(g).is_some_and(|n| n.has_buffer()));
        h.core.hide(a)?;
        assert!(!h.core.node(g).is_some_and(|n| n.has_buffer()));
        Ok(())
    }

    #[test]
    fn shadows_tint_the_cells_behind() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let v = h.leaf(root, Rect::new(2, 1, 4, 2), h.probe("s").fill('s'))?;
        h.core.set_state(v, State::SHADOW, true)?;

        let cap = h.capture();
        assert_eq!(cap.cell(6, 2).map(|c| c.attr), Some(Attr::SHADOW));
        assert_eq!(cap.cell(7, 3).map(|c| c.attr), Some(Attr::SHADOW));
        assert_eq!(cap.cell(4, 3).map(|c| c.attr), Some(Attr::SHADOW));
        assert_ne!(cap.cell(6, 1).map(|c| c.attr), Some(Attr::SHADOW));
        assert_ne!(cap.cell(2, 3).map(|c| c.attr), Some(Attr::SHADOW));
        drop(cap);

        h.core.set_state(v, State::SHADOW, false)?;
        assert_ne!(h.capture().cell(6, 2).map(|c| c.attr), Some(Attr::SHADOW));
        Ok(())
    }

    #[test]
    fn palette_chain_resolution() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let g = h.group(
            root,
            Rect::new(0, 0, 10, 3),
            h.probe("g").with_palette(Some(Palette::new([5, 6, 7]))),
        )?;
        let v = h.leaf(
            g,
            Rect::new(0, 0, 3, 1),
            h.probe("v").with_palette(Some(Palette::new([3, 0]))),
        )?;

        assert_eq!(h.core.get_color(v, 1), Attr(0x24));
        assert_eq!(h.core.get_color(g, 1), Attr(0x20));
        assert_eq!(h.core.get_color(root, 1), Attr(0x71));
        assert_eq!(h.core.get_color(v, 0), Attr::ERROR);
        assert_eq!(h.core.get_color(v, 2), Attr::ERROR);
        assert_eq!(h.core.get_color(v, 3), Attr::ERROR);
        assert_eq!(h.core.get_color(g, 4), Attr::ERROR);

        h.core.set_palette(g, Some(Palette::transparent()))?;
        assert_eq!(h.core.get_color(v, 1), Attr(0x78));
        h.core.set_palette(g, None)?;
        assert_eq!(h.core.get_color(v, 1), Attr::ERROR);
        assert_eq!(h.capture().cell(0, 0).map(|c| c.attr), Some(Attr::ERROR));
        Ok(())
    }

    #[test]
    fn palette_schemes() -> Result<()> {
        let h = Harness::with_config(Config::default().with_palette(PaletteScheme::Custom(
            Palette::new([0x1e, 0x2f]),
        )));
        let root = h.root();
        assert_eq!(h.core.get_color(root, 2), Attr(0x2f));
        assert_eq!(h.core.get_color(root, 3), Attr::ERROR);
        Ok(())
    }

    #[test]
    fn cursor_follows_the_focused_view() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let v = h.leaf(root, Rect::new(2, 2, 5, 1), h.probe("edit").selectable())?;
        assert_eq!(h.capture().cursor(), None);

        h.core.show_cursor(v)?;
        assert_eq!(
            h.capture().cursor(),
            Some(CursorState { position: Point::new(2, 2), block: false })
        );
        h.core.set_cursor(v, (1, 0))?;
        h.core.block_cursor(v)?;
        assert_eq!(
            h.capture().cursor(),
            Some(CursorState { position: Point::new(3, 2), block: true })
        );

        h.core.set_cursor(v, (9, 0))?;
        assert_eq!(h.capture().cursor(), None);
        h.core.set_cursor(v, (0, 0))?;
        h.leaf(root, Rect::new(0, 0, 10, 5), PlainView::new())?;
        assert_eq!(h.capture().cursor(), None);
        Ok(())
    }

    #[test]
    fn draw_from_a_handler_is_flushed() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let v = h.leaf(root, Rect::new(0, 0, 4, 1), Stamp { ch: '.' })?;
        assert_eq!(row(&h, 0), "....");

        let left = h.send(Event::key('z'))?;
        assert!(left.is_nothing());
        assert_eq!(row(&h, 0), "zzzz");
        assert_eq!(h.core.kind::<Stamp>(v).map(|s| s.ch), Some('z'));
        Ok(())
    }

    #[test]
    fn resize_redraws_root() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        h.leaf(root, Rect::new(0, 0, 3, 1), h.probe("a").fill('a'))?;
        h.capture().clear_log();
        h.core.change_bounds(root, Rect::new(0, 0, 10, 3))?;
        assert_eq!(h.core.size(), Expanse::new(10, 3));
        assert!(h.capture().write_count() > 0);
        assert_eq!(row(&h, 0), "aaa");
        Ok(())
    }
}
