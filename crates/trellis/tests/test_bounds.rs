//! Integration tests for geometry changes and grow modes.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis::{error::Result, prelude::*, testing::harness::Harness};

    /// Never smaller than 3x2 and never wider than 12.
    struct Limited;

    impl ViewKind for Limited {
        fn size_limits(&self, owner: Expanse) -> (Expanse, Expanse) {
            (Expanse::new(3, 2), Expanse::new(12, owner.h))
        }
    }

    fn bounds(h: &Harness, id: ViewId) -> Option<Rect> {
        h.core.node(id).map(|n| n.bounds())
    }

    fn child(h: &mut Harness, group: ViewId, r: Rect, mode: GrowMode) -> Result<ViewId> {
        let id = h.leaf(group, r, PlainView::new())?;
        h.core.set_grow_mode(id, mode)?;
        Ok(id)
    }

    #[test]
    fn grow_modes_follow_the_owner() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 20, 10), PlainGroup::new())?;
        let stretch = child(&mut h, g, Rect::new(2, 2, 5, 3), GrowMode::HI_X | GrowMode::HI_Y)?;
        let slide = child(&mut h, g, Rect::new(2, 2, 5, 3), GrowMode::LO_X | GrowMode::HI_X)?;
        let fixed = child(&mut h, g, Rect::new(1, 1, 2, 2), GrowMode::empty())?;
        let all = child(&mut h, g, Rect::new(1, 1, 4, 4), GrowMode::ALL)?;

        h.core.change_bounds(g, Rect::new(0, 0, 30, 15))?;
        assert_eq!(bounds(&h, stretch), Some(Rect::new(2, 2, 15, 8)));
        assert_eq!(bounds(&h, slide), Some(Rect::new(12, 2, 5, 3)));
        assert_eq!(bounds(&h, fixed), Some(Rect::new(1, 1, 2, 2)));
        assert_eq!(bounds(&h, all), Some(Rect::new(11, 6, 4, 4)));
        Ok(())
    }

    #[test]
    fn relative_grow_scales() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 20, 10), PlainGroup::new())?;
        let v = child(
            &mut h,
            g,
            Rect::new(5, 0, 5, 5),
            GrowMode::LO_X | GrowMode::HI_X | GrowMode::REL,
        )?;

        h.core.change_bounds(g, Rect::new(0, 0, 40, 10))?;
        assert_eq!(bounds(&h, v), Some(Rect::new(10, 0, 10, 5)));
        Ok(())
    }

    #[test]
    fn moving_a_group_keeps_children_in_place() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 20, 10), PlainGroup::new())?;
        let v = child(&mut h, g, Rect::new(2, 2, 5, 3), GrowMode::ALL)?;

        h.core.move_to(g, 5, 5)?;
        assert_eq!(bounds(&h, g), Some(Rect::new(5, 5, 20, 10)));
        assert_eq!(bounds(&h, v), Some(Rect::new(2, 2, 5, 3)));
        assert_eq!(h.core.global_bounds(v)?, Rect::new(7, 7, 5, 3));
        assert_eq!(h.core.make_local(v, Point::new(8, 9)), Point::new(1, 2));
        assert_eq!(h.core.make_global(v, Point::new(1, 2)), Point::new(8, 9));
        assert!(h.core.mouse_in_view(v, Point::new(7, 7)));
        assert!(!h.core.mouse_in_view(v, Point::new(12, 7)));
        Ok(())
    }

    #[test]
    fn locate_respects_size_limits() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let v = h.leaf(root, Rect::new(0, 0, 5, 5), Limited)?;

        h.core.grow_to(v, 1, 1)?;
        assert_eq!(bounds(&h, v), Some(Rect::new(0, 0, 3, 2)));
        h.core.grow_to(v, 30, 30)?;
        assert_eq!(bounds(&h, v), Some(Rect::new(0, 0, 12, 20)));
        assert_eq!(
            h.core.size_limits(v)?,
            (Expanse::new(3, 2), Expanse::new(12, 20))
        );

        let plain = h.leaf(root, Rect::new(0, 0, 5, 5), PlainView::new())?;
        h.core.grow_to(plain, 100, 100)?;
        assert_eq!(bounds(&h, plain), Some(Rect::new(0, 0, 40, 20)));
        Ok(())
    }

    #[test]
    fn locate_repaints_the_vacated_area() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let v = h.leaf(root, Rect::new(0, 0, 3, 1), h.probe("m").fill('m'))?;
        assert_eq!(h.capture().row_text(0).trim_end(), "mmm");

        h.core.move_to(v, 5, 2)?;
        assert_eq!(h.capture().row_text(0).trim_end(), "");
        assert_eq!(h.capture().row_text(2).trim_end(), "     mmm");
        Ok(())
    }

    #[test]
    fn root_resize_relays_children() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let status = child(&mut h, root, Rect::new(0, 19, 40, 1), GrowMode::LO_Y | GrowMode::HI_X | GrowMode::HI_Y)?;

        h.core.change_bounds(root, Rect::new(0, 0, 60, 30))?;
        assert_eq!(bounds(&h, status), Some(Rect::new(0, 29, 60, 1)));
        Ok(())
    }
}
