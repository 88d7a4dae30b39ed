use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    init_tracing,
    probe::{Journal, Probe},
    screen::{Capture, CaptureScreen},
    source::{Script, ScriptedSource},
};
use crate::{
    Config, Core, RunContext, ViewId,
    core::{dispatch::Dispatch, view::ViewKind},
    error::Result,
    event::Event,
    geom::Rect,
};

/// A kernel wired to a recording screen, a scripted source and a journal.
/// Tests build a tree, script input and then inspect all three.
pub struct Harness {
    /// The kernel under test.
    pub core: Core,
    /// What the kernel wrote.
    pub screen: Arc<Mutex<Capture>>,
    /// Feeds the kernel's event source.
    pub script: Script,
    /// Shared by probes made with [`Harness::probe`].
    pub journal: Journal,
}

impl Harness {
    /// A harness with default settings and the given root size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(Config::default().with_size((width, height)))
    }

    /// A harness with custom settings.
    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let size = config.size;
        let mut core = Core::new(config);
        let (screen, writer) = CaptureScreen::create(size);
        core.set_screen(writer);
        let (script, source) = ScriptedSource::create();
        core.attach(RunContext::new(source));
        Self {
            core,
            screen,
            script,
            journal: Journal::new(),
        }
    }

    /// The root group.
    pub fn root(&self) -> ViewId {
        self.core.root()
    }

    /// A probe recording into the harness journal.
    pub fn probe(&self, name: &str) -> Probe {
        Probe::new(name, &self.journal)
    }

    /// Create a leaf and insert it at the front of `group`.
    pub fn leaf(
        &mut self,
        group: ViewId,
        bounds: Rect,
        kind: impl Into<Box<dyn ViewKind>>,
    ) -> Result<ViewId> {
        let id = self.core.add(bounds, kind);
        self.core.insert(group, id)?;
        Ok(id)
    }

    /// Create a group and insert it at the front of `group`.
    pub fn group(
        &mut self,
        group: ViewId,
        bounds: Rect,
        kind: impl Into<Box<dyn ViewKind>>,
    ) -> Result<ViewId> {
        let id = self.core.add_group(bounds, kind);
        self.core.insert(group, id)?;
        Ok(id)
    }

    /// Handle an event at the root and return what is left of it.
    pub fn send(&mut self, event: impl Into<Event>) -> Result<Event> {
        let mut event = event.into();
        let root = self.core.root();
        self.core.handle_event(root, &mut event)?;
        Ok(event)
    }

    /// Lock and return the screen record.
    pub fn capture(&self) -> MutexGuard<'_, Capture> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take the journal entries recorded so far.
    pub fn journal(&self) -> Vec<String> {
        self.journal.take()
    }
}
