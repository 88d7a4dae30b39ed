//! The behavior trait attached to every view, and the minimal kinds the
//! kernel ships.

use std::any::{Any, type_name};

use crate::{
    canvas::{Canvas, Cell},
    commands::{self, Command},
    core::{context::Ctx, draw::Drawing, id::ViewId, node::ViewNode, world::Core},
    error::Result,
    event::{Event, EventClass},
    flags::{GrowMode, HC_NO_CONTEXT, HelpCtx, Options, State},
    geom::Expanse,
    palette::{Attr, Palette},
};

/// Read-only view of the kernel handed to `draw`.
pub struct DrawContext<'a> {
    /// Kernel being rendered.
    core: &'a Core,
    /// View being drawn.
    id: ViewId,
}

impl<'a> DrawContext<'a> {
    /// Build a context for drawing `id`.
    pub(crate) fn new(core: &'a Core, id: ViewId) -> Self {
        Self { core, id }
    }

    /// The view being drawn.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The kernel.
    pub fn core(&self) -> &'a Core {
        self.core
    }

    /// Arena data of the view being drawn.
    pub fn node(&self) -> Option<&'a ViewNode> {
        self.core.node(self.id)
    }

    /// Size of the view being drawn.
    pub fn size(&self) -> Expanse {
        self.node().map(ViewNode::size).unwrap_or_default()
    }

    /// State flags of the view being drawn.
    pub fn state(&self) -> State {
        self.node().map(ViewNode::state).unwrap_or_default()
    }

    /// Resolve a palette index of the view being drawn.
    pub fn color(&self, index: u8) -> Attr {
        self.core.get_color(self.id, index)
    }

    /// Blank cell in the given palette index.
    pub fn blank(&self, index: u8) -> Cell {
        Cell::new(' ', self.color(index))
    }
}

/// Behavior attached to a node in the view arena.
///
/// The kernel owns structure, state and geometry. A kind supplies
/// appearance, input handling and validation. Values returned by `options`,
/// `event_mask`, `grow_mode`, `help_ctx` and `palette` are copied into the
/// node when the view is created and may be changed through the kernel
/// afterwards.
pub trait ViewKind: Any + Send {
    /// Name used in logs.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }

    /// Palette mapping this view's color indices into its owner's.
    ///
    /// The default is the empty palette, which passes indices through.
    /// Returning `None` makes every lookup through this view resolve to the
    /// error attribute.
    fn palette(&self) -> Option<Palette> {
        Some(Palette::transparent())
    }

    /// Initial option flags.
    fn options(&self) -> Options {
        Options::empty()
    }

    /// Initial event mask.
    fn event_mask(&self) -> EventClass {
        EventClass::DEFAULT_MASK
    }

    /// Initial grow mode.
    fn grow_mode(&self) -> GrowMode {
        GrowMode::empty()
    }

    /// Initial help context.
    fn help_ctx(&self) -> HelpCtx {
        HC_NO_CONTEXT
    }

    /// Paint the view into a canvas in view-local coordinates.
    ///
    /// The canvas covers [`Canvas::area`], the part of the extent being
    /// rendered; writes elsewhere are dropped. For groups this is the
    /// background; children are composited on top.
    fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
        canvas.fill(canvas.area(), ctx.blank(1));
    }

    /// Handle an event after the kernel's base handling. Consume it with
    /// [`Event::clear`].
    fn handle_event(&mut self, _ctx: &mut Ctx<'_>, _event: &mut Event) -> Result<()> {
        Ok(())
    }

    /// May the view end a modal loop, release focus or close with `command`?
    fn valid(&mut self, _ctx: &mut Ctx<'_>, _command: Command) -> bool {
        true
    }

    /// Minimum and maximum size given the owner's size.
    fn size_limits(&self, owner: Expanse) -> (Expanse, Expanse) {
        (Expanse::new(0, 0), owner)
    }

    /// Offered focused or positional input no view consumed. Return true to
    /// claim it.
    fn event_error(&mut self, _ctx: &mut Ctx<'_>, _event: &Event) -> bool {
        false
    }

    /// Called after `set_state` has applied a change and its side effects.
    fn state_changed(&mut self, _ctx: &mut Ctx<'_>, _flags: State, _enable: bool) -> Result<()> {
        Ok(())
    }
}

/// Convert view kinds into boxed trait objects.
impl<K> From<K> for Box<dyn ViewKind>
where
    K: ViewKind + 'static,
{
    fn from(kind: K) -> Self {
        Box::new(kind)
    }
}

/// Upcast for downcasting kinds back to their concrete type.
pub(crate) fn as_any(kind: &dyn ViewKind) -> &dyn Any {
    kind
}

/// Mutable upcast for downcasting kinds back to their concrete type.
pub(crate) fn as_any_mut(kind: &mut dyn ViewKind) -> &mut dyn Any {
    kind
}

/// A leaf that fills its extent with a character in color index 1.
#[derive(Debug, Clone)]
pub struct PlainView {
    /// Fill character.
    fill: char,
    /// Option flags.
    options: Options,
}

impl Default for PlainView {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainView {
    /// A blank, unselectable view.
    pub fn new() -> Self {
        Self {
            fill: ' ',
            options: Options::empty(),
        }
    }

    /// Fill with a different character.
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    /// Start with different option flags.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl ViewKind for PlainView {
    fn options(&self) -> Options {
        self.options
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
        canvas.fill(canvas.area(), Cell::new(self.fill, ctx.color(1)));
    }
}

/// A group with no background of its own.
#[derive(Debug, Clone, Default)]
pub struct PlainGroup {
    /// Option flags.
    options: Options,
}

impl PlainGroup {
    /// A group with no options set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with different option flags.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl ViewKind for PlainGroup {
    fn options(&self) -> Options {
        self.options
    }

    fn event_mask(&self) -> EventClass {
        EventClass::all()
    }

    fn draw(&self, _canvas: &mut Canvas, _ctx: &DrawContext<'_>) {}
}

/// The root group. Owns the application palette and paints the background.
#[derive(Debug, Clone)]
pub struct RootView {
    /// Application palette.
    palette: Palette,
    /// Background character.
    background: char,
}

impl RootView {
    /// A root with the given application palette.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            background: ' ',
        }
    }
}

impl ViewKind for RootView {
    fn palette(&self) -> Option<Palette> {
        Some(self.palette.clone())
    }

    fn event_mask(&self) -> EventClass {
        EventClass::all()
    }

    fn grow_mode(&self) -> GrowMode {
        GrowMode::ALL
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &DrawContext<'_>) {
        canvas.fill(canvas.area(), Cell::new(self.background, ctx.color(1)));
    }

    fn handle_event(&mut self, ctx: &mut Ctx<'_>, event: &mut Event) -> Result<()> {
        if event.is_command(commands::QUIT) {
            ctx.end_modal(commands::QUIT)?;
            event.clear();
        }
        Ok(())
    }
}
