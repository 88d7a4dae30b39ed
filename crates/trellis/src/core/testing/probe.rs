use std::sync::{Arc, Mutex};

use crate::{
    canvas::{Canvas, Cell},
    commands::Command,
    core::{context::Ctx, view::{DrawContext, ViewKind}},
    error::Result,
    event::{Event, EventClass, EventKind},
    flags::Options,
    palette::Palette,
};

/// Ordered record of what probes saw, shared between probes and the test.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    /// Entries in order.
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// An empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        if let Ok(mut e) = self.entries.lock() {
            e.push(entry.into());
        }
    }

    /// A copy of every entry.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Return and clear every entry.
    pub fn take(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

/// Short event label used in journal entries.
pub fn label(event: &Event) -> String {
    match event.kind() {
        EventKind::Nothing => "nothing".into(),
        EventKind::Mouse(_) => "mouse".into(),
        EventKind::Key(_) => "key".into(),
        EventKind::Command(m) => format!("command {}", m.command.0),
        EventKind::Broadcast(m) => format!("broadcast {}", m.command.0),
        EventKind::User(_, m) => format!("user {}", m.command.0),
    }
}

/// A view kind that journals every delivery in its event mask and reacts
/// as configured.
///
/// Entries have the form `"<name> <label>"` for deliveries,
/// `"<name> valid <n>"` for validation and `"<name> error <label>"` for
/// `event_error` offers.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Journal name.
    name: String,
    /// Shared journal.
    journal: Journal,
    /// Initial options.
    options: Options,
    /// Initial event mask.
    mask: EventClass,
    /// Classes consumed on delivery.
    consume: EventClass,
    /// Commands consumed on delivery.
    consume_commands: Vec<Command>,
    /// Commands that end the modal loop with themselves.
    end_on: Vec<Command>,
    /// Commands `valid` refuses.
    refuse: Vec<Command>,
    /// Claim every `event_error` offer.
    claim_errors: bool,
    /// Fill character.
    fill: char,
    /// Initial palette.
    palette: Option<Palette>,
}

impl Probe {
    /// A probe recording into `journal` under `name`.
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            options: Options::empty(),
            mask: EventClass::DEFAULT_MASK,
            consume: EventClass::empty(),
            consume_commands: Vec::new(),
            end_on: Vec::new(),
            refuse: Vec::new(),
            claim_errors: false,
            fill: ' ',
            palette: Some(Palette::transparent()),
        }
    }

    /// Add `SELECTABLE`.
    pub fn selectable(mut self) -> Self {
        self.options |= Options::SELECTABLE;
        self
    }

    /// Add option flags.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options |= options;
        self
    }

    /// Replace the event mask.
    pub fn with_mask(mut self, mask: EventClass) -> Self {
        self.mask = mask;
        self
    }

    /// Consume every delivered event of these classes.
    pub fn consume(mut self, classes: EventClass) -> Self {
        self.consume |= classes;
        self
    }

    /// Consume one command.
    pub fn consume_command(mut self, command: Command) -> Self {
        self.consume_commands.push(command);
        self
    }

    /// End the modal loop with `command` when it is delivered.
    pub fn end_on(mut self, command: Command) -> Self {
        self.end_on.push(command);
        self
    }

    /// Refuse `command` in `valid`.
    pub fn refuse(mut self, command: Command) -> Self {
        self.refuse.push(command);
        self
    }

    /// Claim unhandled events offered through `event_error`.
    pub fn claim_errors(mut self) -> Self {
        self.claim_errors = true;
        self
    }

    /// Draw with a character.
    pub fn fill(mut self, ch: char) -> Self {
        self.fill = ch;
        self
    }

    /// Start with a different palette.
    pub fn with_palette(mut self, palette: Option<Palette>) -> Self {
        self.palette = palette;
        self
    }

    /// Append an entry under this probe's name.
    fn note(&self, what: &str) {
        self.journal.record(format!("{} {}", self.name, what));
    }
}

impl ViewKind for Probe {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn palette(&self) -> Option<Palette> {
        self.palette.clone()
    }

    fn options(&self) -> Options {
        self.options
    }

    fn event_mask(&self) -> EventClass {
        self.mask
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
        canvas.fill(canvas.area(), Cell::new(self.fill, ctx.color(1)));
    }

    fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
        if !self.mask.intersects(event.class()) {
            return Ok(());
        }
        self.note(&label(event));
        if let Some(m) = event.message()
            && matches!(event.kind(), EventKind::Command(_))
        {
            let command = m.command;
            if self.end_on.contains(&command) {
                ctx.end_modal(command)?;
                event.clear();
                return Ok(());
            }
            if self.consume_commands.contains(&command) {
                event.clear();
                return Ok(());
            }
        }
        if self.consume.intersects(event.class()) {
            event.clear();
        }
        Ok(())
    }

    fn valid(&mut self, _ctx: &mut Ctx<'_>, command: Command) -> bool {
        self.note(&format!("valid {}", command.0));
        !self.refuse.contains(&command)
    }

    fn event_error(&mut self, _ctx: &mut Ctx<'_>, event: &Event) -> bool {
        self.note(&format!("error {}", label(event)));
        self.claim_errors
    }
}
