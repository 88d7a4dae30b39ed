//! Integration tests for modal execution and command gating.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use trellis::{
        error::{Error, Result},
        prelude::*,
        testing::{
            harness::Harness,
            probe::{Journal, Probe},
            screen::Capture,
            source::ScriptedSource,
        },
    };

    /// A dialog group holding one focused button.
    fn dialog(h: &mut Harness, dlg: Probe, btn: Probe) -> Result<(ViewId, ViewId)> {
        let d = h.core.add_group(Rect::new(10, 5, 20, 8), dlg);
        let b = h.core.add(Rect::new(1, 1, 6, 1), btn);
        h.core.insert(d, b)?;
        Ok((d, b))
    }

    #[test]
    fn exec_view_returns_the_ending_command() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let (dlg, btn) = {
            let d = h.probe("dlg");
            let b = h.probe("btn").selectable().end_on(commands::OK);
            dialog(&mut h, d, b)?
        };
        h.script.push(Event::command(commands::OK));

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::OK);
        assert_eq!(
            h.journal(),
            vec!["btn command 10", "dlg valid 10", "btn valid 10"]
        );
        assert!(!h.core.is_child(root, dlg));
        assert!(h.core.is_child(dlg, btn));
        assert!(!h.core.get_state(dlg, State::MODAL));
        assert_eq!(h.core.top_view(), Some(root));
        Ok(())
    }

    #[test]
    fn cancel_skips_validation() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let (dlg, _) = {
            let d = h.probe("dlg").refuse(commands::CANCEL);
            let b = h.probe("btn").selectable().end_on(commands::CANCEL);
            dialog(&mut h, d, b)?
        };
        h.script.push(Event::command(commands::CANCEL));

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::CANCEL);
        assert_eq!(h.journal(), vec!["btn command 11"]);
        Ok(())
    }

    #[test]
    fn refused_end_keeps_the_loop_running() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let (dlg, _) = {
            let d = h.probe("dlg");
            let b = h
                .probe("btn")
                .selectable()
                .end_on(commands::OK)
                .end_on(commands::CANCEL)
                .refuse(commands::OK);
            dialog(&mut h, d, b)?
        };
        h.script.push(Event::command(commands::OK));
        h.script.push(Event::command(commands::CANCEL));

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::CANCEL);
        assert_eq!(
            h.journal(),
            vec!["btn command 10", "dlg valid 10", "btn valid 10", "btn command 11"]
        );
        assert!(h.script.is_empty());
        Ok(())
    }

    #[test]
    fn exec_view_restores_context() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let a = h.leaf(root, Rect::new(0, 0, 5, 1), h.probe("a").selectable())?;
        let (dlg, btn) = {
            let d = h.probe("dlg").selectable();
            let b = h.probe("btn").selectable().end_on(commands::OK);
            dialog(&mut h, d, b)?
        };
        h.core.disable_commands(&[commands::HELP]);
        h.journal();

        let saved = h.core.commands().clone();
        h.script.push(Event::command(commands::OK));
        h.core.exec_view(root, Some(dlg))?;

        assert_eq!(h.core.node(root).and_then(|n| n.current()), Some(a));
        assert_eq!(h.core.focused(), Some(a));
        assert!(!h.core.get_state(btn, State::FOCUSED));
        assert_eq!(h.core.node(dlg).map(|n| n.options()), Some(Options::SELECTABLE));
        assert_eq!(h.core.commands(), &saved);
        Ok(())
    }

    #[test]
    fn modal_view_owns_focus_while_running() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        h.leaf(root, Rect::new(0, 0, 5, 1), h.probe("a").selectable())?;
        let (dlg, btn) = {
            let d = h.probe("dlg");
            let b = h.probe("btn").selectable().end_on(commands::OK);
            dialog(&mut h, d, b)?
        };
        let (script, source) = ScriptedSource::create();
        h.core.attach(RunContext::new(source).with_idle(move |core| {
            assert_eq!(core.focus_chain(), vec![core.root(), dlg, btn]);
            assert_eq!(core.top_view(), Some(dlg));
            assert!(core.get_state(dlg, State::MODAL));
            core.put_event(Event::command(commands::OK));
            Ok(())
        }));
        script.push_idle();

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::OK);
        Ok(())
    }

    /// A selectable leaf that journals its focus changes.
    struct Watcher {
        name: &'static str,
        log: Journal,
    }

    impl ViewKind for Watcher {
        fn options(&self) -> Options {
            Options::SELECTABLE
        }

        fn state_changed(&mut self, _ctx: &mut Ctx<'_>, flags: State, enable: bool) -> Result<()> {
            if flags.contains(State::FOCUSED) {
                self.log.record(format!("{} focused={enable}", self.name));
            }
            Ok(())
        }
    }

    #[test]
    fn restore_reselects_the_saved_current_only() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let log = Journal::new();
        let b = h.leaf(root, Rect::new(0, 0, 5, 1), Watcher { name: "b", log: log.clone() })?;
        let a = h.leaf(root, Rect::new(0, 1, 5, 1), Watcher { name: "a", log: log.clone() })?;
        h.core.select(b)?;
        assert_eq!(h.core.children(root)?, &[a, b]);
        let (dlg, _) = {
            let d = h.probe("dlg");
            let btn = h.probe("btn").selectable().end_on(commands::CANCEL);
            dialog(&mut h, d, btn)?
        };
        log.take();
        h.script.push(Event::command(commands::CANCEL));

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::CANCEL);
        assert_eq!(log.take(), vec!["b focused=false", "b focused=true"]);
        assert_eq!(h.core.node(root).and_then(|n| n.current()), Some(b));
        assert_eq!(h.core.focused(), Some(b));
        Ok(())
    }

    /// Fills itself with dots and runs a dialog when it sees command 100.
    struct Opener {
        dlg: ViewId,
        log: Journal,
    }

    impl ViewKind for Opener {
        fn options(&self) -> Options {
            Options::SELECTABLE
        }

        fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
            canvas.fill(canvas.area(), Cell::new('.', ctx.color(1)));
        }

        fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
            if event.is_command(Command(100)) {
                let root = ctx.core_ref().root();
                ctx.exec_view(root, Some(self.dlg))?;
                event.clear();
            }
            Ok(())
        }

        fn state_changed(&mut self, _ctx: &mut Ctx<'_>, flags: State, enable: bool) -> Result<()> {
            if flags.contains(State::FOCUSED) {
                self.log.record(format!("opener focused={enable}"));
            }
            Ok(())
        }
    }

    /// Moves the dialog down on command 101, notes screen row 0 and ends
    /// the modal loop.
    struct Mover {
        dlg: ViewId,
        screen: Arc<Mutex<Capture>>,
        log: Journal,
    }

    impl ViewKind for Mover {
        fn options(&self) -> Options {
            Options::SELECTABLE
        }

        fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
            if event.is_command(Command(101)) {
                ctx.core().move_to(self.dlg, 0, 3)?;
                let row = self.screen.lock().map(|c| c.row_text(0)).unwrap_or_default();
                self.log.record(row);
                ctx.end_modal(commands::OK)?;
                event.clear();
            }
            Ok(())
        }
    }

    #[test]
    fn dialog_run_from_a_handler_repaints_what_it_uncovers() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        let log = Journal::new();
        let dlg = h.core.add_group(Rect::new(10, 0, 4, 2), h.probe("dlg").fill('D'));
        let mover = Mover {
            dlg,
            screen: h.screen.clone(),
            log: log.clone(),
        };
        let btn = h.core.add(Rect::new(0, 1, 4, 1), mover);
        h.core.insert(dlg, btn)?;
        let opener = h.leaf(root, Rect::new(0, 0, 20, 5), Opener { dlg, log: log.clone() })?;
        assert_eq!(h.capture().row_text(0), ".".repeat(20));
        log.take();

        h.script.push(Event::command(Command(101)));
        assert!(h.send(Event::command(Command(100)))?.is_nothing());

        assert_eq!(
            log.take(),
            vec![
                ".".repeat(20),
                "opener focused=false".to_string(),
                "opener focused=true".to_string(),
            ]
        );
        assert!(!h.core.is_child(root, dlg));
        assert_eq!(h.core.focused(), Some(opener));
        assert_eq!(h.capture().row_text(0), ".".repeat(20));
        assert_eq!(h.capture().row_text(3), ".".repeat(20));
        Ok(())
    }

    #[test]
    fn stale_saved_current_is_dropped() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let a = h.leaf(root, Rect::new(0, 0, 5, 1), h.probe("a").selectable())?;
        let (dlg, _) = {
            let d = h.probe("dlg");
            let b = h.probe("btn").selectable().end_on(commands::OK);
            dialog(&mut h, d, b)?
        };
        let (script, source) = ScriptedSource::create();
        h.core.attach(RunContext::new(source).with_idle(move |core| {
            if core.is_child(core.root(), a) {
                let root = core.root();
                core.remove(root, a)?;
                core.destroy(a)?;
            }
            Ok(())
        }));
        script.push_idle();
        script.push(Event::command(commands::OK));

        assert_eq!(h.core.exec_view(root, Some(dlg))?, commands::OK);
        assert!(!h.core.contains(a));
        assert_eq!(h.core.node(root).and_then(|n| n.current()), None);
        Ok(())
    }

    #[test]
    fn exec_view_edge_cases() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        assert_eq!(h.core.exec_view(root, None)?, commands::CANCEL);

        let leaf = h.core.add(Rect::new(0, 0, 5, 1), PlainView::new());
        assert_eq!(h.core.exec_view(root, Some(leaf))?, commands::CANCEL);
        assert!(!h.core.is_child(root, leaf));
        assert!(!h.core.get_state(leaf, State::MODAL));

        let g = h.core.add_group(Rect::new(0, 0, 5, 1), PlainGroup::new());
        assert_eq!(h.core.exec_view(root, Some(g)), Err(Error::SourceClosed));
        assert!(!h.core.is_child(root, g));
        assert_eq!(h.core.top_view(), Some(root));
        Ok(())
    }

    #[test]
    fn end_modal_walks_to_the_modal_group() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let g = h.group(root, Rect::new(0, 0, 20, 5), PlainGroup::new())?;
        let v = h.leaf(g, Rect::new(0, 0, 5, 1), PlainView::new())?;

        h.core.end_modal(v, commands::YES)?;
        assert_eq!(h.core.node(root).and_then(|n| n.end_state()), Some(commands::YES));
        assert_eq!(h.core.node(g).and_then(|n| n.end_state()), None);

        let loose = h.core.add(Rect::new(0, 0, 1, 1), PlainView::new());
        h.core.end_modal(loose, commands::NO)?;
        assert_eq!(h.core.node(root).and_then(|n| n.end_state()), Some(commands::NO));
        Ok(())
    }

    #[test]
    fn end_modal_without_modal_view() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        h.core.set_state(root, State::MODAL, false)?;
        let loose = h.core.add(Rect::new(0, 0, 1, 1), PlainView::new());
        assert_eq!(h.core.end_modal(root, commands::OK), Err(Error::NoModalView));
        assert!(h.core.end_modal(loose, commands::OK).is_err());
        Ok(())
    }

    #[test]
    fn unhandled_input_is_offered_up_the_chain() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let (dlg, _) = {
            let d = h.probe("dlg").claim_errors();
            let b = h.probe("btn").selectable().end_on(commands::OK);
            dialog(&mut h, d, b)?
        };
        h.script.push(Event::key('k'));
        h.script.push(Event::broadcast(commands::OK, Info::None));
        h.script.push(Event::command(commands::OK));

        h.core.exec_view(root, Some(dlg))?;
        assert_eq!(
            h.journal(),
            vec![
                "btn key",
                "dlg key",
                "dlg error key",
                "btn command 10",
                "dlg valid 10",
                "btn valid 10",
            ]
        );
        Ok(())
    }

    #[test]
    fn run_ends_on_quit() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let root = h.root();
        h.leaf(root, Rect::new(0, 0, 3, 1), h.probe("a").selectable().fill('a'))?;
        h.capture().clear_log();
        h.script.push(Event::key('x'));
        h.script.push(Event::command(commands::QUIT));

        assert_eq!(h.core.run()?, commands::QUIT);
        assert!(h.capture().write_count() > 0);
        assert_eq!(h.capture().row_text(0).trim_end(), "aaa");
        assert_eq!(h.journal(), vec!["a key", "a command 1", "a valid 1"]);
        Ok(())
    }

    #[test]
    fn get_event_order() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        h.leaf(
            root,
            Rect::new(0, 0, 5, 1),
            h.probe("w").with_mask(EventClass::BROADCAST),
        )?;
        h.script.push(Event::key('s'));
        h.core.put_event(Event::command(commands::ZOOM));
        h.core.disable_commands(&[commands::HELP]);

        assert!(h.core.get_event()?.is_command(commands::ZOOM));
        assert!(h.journal().is_empty());
        assert!(h.core.get_event()?.as_key().is_some_and(|k| *k == 's'));
        assert_eq!(h.journal(), vec!["w broadcast 52"]);
        assert_eq!(h.core.get_event(), Err(Error::SourceClosed));
        assert!(h.journal().is_empty());

        h.core.detach();
        assert_eq!(h.core.get_event(), Err(Error::NotRunning));
        Ok(())
    }

    #[test]
    fn screen_resize_grows_the_root() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let pane = h.leaf(root, Rect::new(0, 0, 40, 20), PlainView::new())?;
        h.core.set_grow_mode(pane, GrowMode::HI_X | GrowMode::HI_Y)?;
        let size = Expanse::new(60, 30);
        h.script.push(Event::broadcast(commands::SCREEN_RESIZED, Info::Size(size)));

        let ev = h.core.get_event()?;
        assert_eq!(ev.resized(), Some(size));
        assert_eq!(h.core.node(root).map(|n| n.size()), Some(size));
        assert_eq!(h.core.node(pane).map(|n| n.bounds()), Some(Rect::new(0, 0, 60, 30)));
        Ok(())
    }

    #[test]
    fn idle_hook_runs_when_nothing_is_pending() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let (script, source) = ScriptedSource::create();
        h.core.attach(RunContext::new(source).with_idle(|core| {
            core.put_event(Event::command(commands::MENU));
            Ok(())
        }));
        script.push_idle();

        assert!(h.core.get_event()?.is_command(commands::MENU));
        assert!(script.is_empty());
        Ok(())
    }

    #[test]
    fn command_gating() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let root = h.root();
        let v = h.leaf(root, Rect::new(0, 0, 5, 1), PlainView::new())?;

        assert!(!h.core.command_enabled(commands::ZOOM));
        assert!(!h.core.post_command(v, commands::ZOOM));
        h.core.enable_commands(&[commands::ZOOM]);
        assert!(h.core.post_command(v, commands::ZOOM));
        let ev = h.core.get_event()?;
        assert!(ev.is_command(commands::ZOOM));
        assert_eq!(ev.message().map(|m| m.info), Some(Info::View(v)));

        h.core.set_cmd_state(commands::OK, false);
        assert!(!h.core.command_enabled(commands::OK));
        assert!(h.core.command_enabled(Command(256)));
        assert!(h.core.command_enabled(Command(4000)));
        h.core.disable_commands(&[Command(300)]);
        assert!(h.core.command_enabled(Command(300)));

        h.core.set_commands(&CommandSet::empty());
        assert!(!h.core.command_enabled(commands::QUIT));
        assert!(h.core.command_enabled(Command(256)));
        Ok(())
    }

    #[test]
    fn posting_from_a_handler() -> Result<()> {
        /// Turns every key into a command posted on its own behalf.
        struct Poster;

        impl ViewKind for Poster {
            fn options(&self) -> Options {
                Options::SELECTABLE
            }

            fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
                if event.as_key().is_some() && ctx.post_command(commands::HELP) {
                    event.clear();
                }
                Ok(())
            }
        }

        let mut h = Harness::new(40, 20);
        let root = h.root();
        let v = h.leaf(root, Rect::new(0, 0, 5, 1), Poster)?;
        h.send(Event::key('h'))?;
        let ev = h.core.get_event()?;
        assert!(ev.is_command(commands::HELP));
        assert_eq!(ev.message().map(|m| m.info), Some(Info::View(v)));
        Ok(())
    }
}
